//! Chunked file transfer building blocks: strategy planning, chunk reading
//! with re-seek support, progress reporting, and path validation.

mod chunked;
mod plan;
mod progress;
mod types;
mod validation;

pub use chunked::{CONTENT_HASH_BLOCK_SIZE, ChunkReader, ContentHasher, content_hash_file};
pub use plan::{ChunkPlan, Strategy};
pub use progress::{ChunkProgress, ConsoleProgress, NoProgress, ProgressSink, format_progress};
pub use types::{Chunk, UploadSession};
pub use validation::{remote_file_name, remote_path, validate_local_file, validate_remote_path};

/// Default chunk size: 8 MiB.
///
/// The remote service requires non-final chunks to be a multiple of 4 MiB.
pub const DEFAULT_CHUNK_SIZE: u64 = 8 << 20;

/// Errors produced by the transfer crate.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("precondition failed: {0}")]
    Precondition(String),
}
