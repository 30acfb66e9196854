use std::path::Path;

use crate::TransferError;

/// Validates a remote path such as `/uploads/report.pdf`.
///
/// Rejects:
/// - Paths not starting with `/`
/// - A trailing `/` (except the root itself)
/// - Empty components (`//`)
/// - `.` and `..` components
/// - Control characters
pub fn validate_remote_path(remote: &str) -> Result<(), TransferError> {
    if !remote.starts_with('/') {
        return Err(TransferError::InvalidPath(format!(
            "must start with \"/\": {remote}"
        )));
    }
    if remote == "/" {
        return Ok(());
    }
    if remote.ends_with('/') {
        return Err(TransferError::InvalidPath(format!(
            "must not end with \"/\": {remote}"
        )));
    }
    if remote.chars().any(char::is_control) {
        return Err(TransferError::InvalidPath(format!(
            "control characters not allowed: {remote:?}"
        )));
    }

    for component in remote[1..].split('/') {
        match component {
            "" => {
                return Err(TransferError::InvalidPath(format!(
                    "must not contain \"//\": {remote}"
                )));
            }
            "." | ".." => {
                return Err(TransferError::InvalidPath(format!(
                    "relative component \"{component}\" not allowed: {remote}"
                )));
            }
            _ => {}
        }
    }

    Ok(())
}

/// Checks that the local source exists and is a regular file.
pub fn validate_local_file(path: &Path) -> Result<(), TransferError> {
    let metadata = match std::fs::metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(TransferError::InvalidPath(format!(
                "file does not exist: {}",
                path.display()
            )));
        }
        Err(e) => return Err(e.into()),
    };
    if !metadata.is_file() {
        return Err(TransferError::InvalidPath(format!(
            "not a file: {}",
            path.display()
        )));
    }
    Ok(())
}

/// Chooses the remote file name for `local`.
///
/// A custom name keeps its own spelling but gains the source extension when
/// it does not already end with it. Without a custom name the local base
/// name is used.
pub fn remote_file_name(local: &Path, custom: Option<&str>) -> Result<String, TransferError> {
    let base = local
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| {
            TransferError::InvalidPath(format!("no file name: {}", local.display()))
        })?;

    let Some(custom) = custom.filter(|c| !c.is_empty()) else {
        return Ok(base);
    };

    let ext = local
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_default();
    if ext.is_empty() || custom.ends_with(&ext) {
        Ok(custom.to_string())
    } else {
        Ok(format!("{custom}.{ext}"))
    }
}

/// Joins a remote folder and file name with exactly one separator.
pub fn remote_path(folder: &str, name: &str) -> String {
    if folder.ends_with('/') {
        format!("{folder}{name}")
    } else {
        format!("{folder}/{name}")
    }
}
