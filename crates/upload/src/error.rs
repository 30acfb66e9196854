//! Upload error types.

use boxlift_transfer::TransferError;

use crate::transport::Failure;

/// Errors that end an upload.
///
/// Transient transport failures never appear here unless the retry budget
/// ran out.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Transfer(#[from] TransferError),

    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("upload failed: {0}")]
    Fatal(String),

    /// The service rejected the access token.
    #[error("access token rejected: {0}")]
    Unauthorized(String),

    #[error("upload interrupted")]
    Interrupted,

    #[error("maxed out upload attempts ({attempts}); most recent error: {last}")]
    MaxAttemptsExhausted { attempts: u32, last: Failure },

    #[error("content hash mismatch: local {local}, remote {remote}")]
    IntegrityMismatch { local: String, remote: String },

    #[error("task join error: {0}")]
    Join(String),
}

impl UploadError {
    /// Returns `true` for bad local or remote paths.
    pub fn is_path_error(&self) -> bool {
        matches!(self, UploadError::Transfer(TransferError::InvalidPath(_)))
    }
}

impl From<Failure> for UploadError {
    /// Maps a non-retryable transport failure onto the matching error.
    fn from(failure: Failure) -> Self {
        match failure {
            Failure::Unauthorized(msg) => UploadError::Unauthorized(msg),
            Failure::Fatal(msg) => UploadError::Fatal(msg),
            other => UploadError::Fatal(other.to_string()),
        }
    }
}
