//! Data types for the upload flow.

use std::path::{Path, PathBuf};

use boxlift_transfer::{ChunkPlan, Strategy};
use chrono::{DateTime, SubsecRound, Utc};

use crate::controller::DEFAULT_MAX_ATTEMPTS;
use crate::link::LinkOutcome;

/// What happens when the remote path already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteMode {
    /// Keep the existing file and fail on conflict.
    Add,
    /// Replace the existing file.
    #[default]
    Overwrite,
}

/// Commit metadata attached to the final upload request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    pub path: String,
    pub mode: WriteMode,
    /// Modification time of the source file, whole seconds.
    pub client_modified: DateTime<Utc>,
}

impl CommitInfo {
    /// Builds overwrite-mode commit metadata from the local file's mtime.
    pub fn overwrite(remote_path: &str, local: &Path) -> std::io::Result<Self> {
        let modified = std::fs::metadata(local)?.modified()?;
        Ok(Self {
            path: remote_path.to_string(),
            mode: WriteMode::Overwrite,
            client_modified: DateTime::<Utc>::from(modified).trunc_subsecs(0),
        })
    }
}

/// Descriptor of a committed remote file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteFile {
    pub id: String,
    pub name: String,
    pub path_lower: String,
    pub path_display: String,
    pub size: u64,
    pub rev: String,
    pub content_hash: Option<String>,
}

/// A single upload as requested by the user.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Local file or directory.
    pub local_path: PathBuf,
    /// Remote folder, e.g. `/uploads`.
    pub remote_folder: String,
    /// Custom remote file name.
    pub remote_name: Option<String>,
}

/// Tunables for the upload engine.
#[derive(Debug, Clone, Copy)]
pub struct UploadOptions {
    pub plan: ChunkPlan,
    pub max_attempts: u32,
    /// Compare the remote content hash against the local file.
    pub verify_content_hash: bool,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            plan: ChunkPlan::default(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            verify_content_hash: true,
        }
    }
}

/// Result of a completed upload.
#[derive(Debug, Clone)]
pub struct UploadReport {
    pub remote: RemoteFile,
    pub strategy: Strategy,
    /// Whether the source was a directory archived before upload.
    pub archived: bool,
    pub link: LinkOutcome,
}

impl UploadReport {
    /// The shareable URL, if one could be produced.
    pub fn shared_link(&self) -> Option<&str> {
        self.link.url()
    }
}
