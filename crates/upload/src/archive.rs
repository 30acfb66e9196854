//! Directory archiving.
//!
//! A directory is packed into `<dir>.zip` next to itself before upload.
//! Entries are stored as `<dirname>/<relative path>` so the archive unpacks
//! into a folder of the same name.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use boxlift_transfer::TransferError;
use tracing::{debug, info, warn};
use zip::write::SimpleFileOptions;

use crate::error::UploadError;

/// The file actually uploaded for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedSource {
    path: PathBuf,
    temporary: bool,
}

impl PreparedSource {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `true` when the file is an archive created for this upload.
    pub fn is_temporary(&self) -> bool {
        self.temporary
    }

    /// Removes a temporary archive. Plain files are left alone.
    pub fn cleanup(&self) {
        if !self.temporary {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "removed temporary archive"),
            Err(e) => warn!(path = %self.path.display(), error = %e, "failed to remove archive"),
        }
    }
}

/// Archives `path` if it is a directory, otherwise passes it through.
///
/// Missing paths pass through so that validation can report them.
pub async fn prepare_source(path: &Path) -> Result<PreparedSource, UploadError> {
    if !path.is_dir() {
        return Ok(PreparedSource {
            path: path.to_path_buf(),
            temporary: false,
        });
    }

    let dir = path.to_path_buf();
    let archive = tokio::task::spawn_blocking(move || archive_directory(&dir))
        .await
        .map_err(|e| UploadError::Join(e.to_string()))??;

    Ok(PreparedSource {
        path: archive,
        temporary: true,
    })
}

/// Writes `<dir>.zip` beside `dir` and returns its path.
///
/// An existing archive of the same name is replaced.
pub fn archive_directory(dir: &Path) -> Result<PathBuf, UploadError> {
    let dir = dir.canonicalize()?;
    let (Some(parent), Some(name)) = (dir.parent(), dir.file_name()) else {
        return Err(TransferError::InvalidPath(format!(
            "cannot archive {}: no directory name",
            dir.display()
        ))
        .into());
    };
    let name = name.to_string_lossy().into_owned();
    let target = parent.join(format!("{name}.zip"));

    let mut files = Vec::new();
    walk_dir(&dir, &dir, &mut files)?;
    files.sort();

    info!(dir = %dir.display(), archive = %target.display(), files = files.len(), "archiving directory");

    let mut zip = zip::ZipWriter::new(BufWriter::new(File::create(&target)?));
    for rel in &files {
        let source = dir.join(rel);
        let size = std::fs::metadata(&source)?.len();
        let options = SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated)
            .large_file(size >= u32::MAX as u64);

        zip.start_file(format!("{name}/{rel}"), options)?;
        io::copy(&mut File::open(&source)?, &mut zip)?;
    }
    zip.finish()?;

    Ok(target)
}

/// Collects regular files under `current` as `/`-separated paths relative
/// to `root`.
fn walk_dir(root: &Path, current: &Path, files: &mut Vec<String>) -> Result<(), UploadError> {
    for entry in std::fs::read_dir(current)? {
        let entry = entry?;
        let path = entry.path();
        let metadata = entry.metadata()?;

        if metadata.is_dir() {
            walk_dir(root, &path, files)?;
        } else if metadata.is_file() {
            let rel = path.strip_prefix(root).map_err(io::Error::other)?;
            files.push(rel.to_string_lossy().replace('\\', "/"));
        }
    }
    Ok(())
}
