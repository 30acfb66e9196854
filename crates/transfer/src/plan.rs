//! Upload strategy selection.

use crate::{DEFAULT_CHUNK_SIZE, TransferError};

/// How a file is sent to the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// One request carrying the whole file.
    Simple,
    /// A start/append/finish session carrying one chunk per request.
    Chunked,
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Simple => f.write_str("simple"),
            Strategy::Chunked => f.write_str("chunked"),
        }
    }
}

/// Chunk size and the size up to which a single request is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPlan {
    chunk_size: u64,
    simple_threshold: u64,
}

impl Default for ChunkPlan {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            simple_threshold: DEFAULT_CHUNK_SIZE * 2,
        }
    }
}

impl ChunkPlan {
    /// Creates a plan with the default threshold of two chunks.
    pub fn new(chunk_size: u64) -> Result<Self, TransferError> {
        if chunk_size == 0 {
            return Err(TransferError::Precondition(
                "chunk size must be greater than zero".into(),
            ));
        }
        Ok(Self {
            chunk_size,
            simple_threshold: chunk_size.saturating_mul(2),
        })
    }

    /// Overrides the simple-upload threshold.
    pub fn with_simple_threshold(mut self, threshold: u64) -> Self {
        self.simple_threshold = threshold;
        self
    }

    pub fn chunk_size(&self) -> u64 {
        self.chunk_size
    }

    pub fn simple_threshold(&self) -> u64 {
        self.simple_threshold
    }

    /// Picks the strategy for a file of `file_size` bytes.
    ///
    /// Files up to the threshold go in one request. Larger files are
    /// chunked, which requires at least one full chunk.
    pub fn strategy(&self, file_size: u64) -> Result<Strategy, TransferError> {
        if file_size <= self.simple_threshold {
            return Ok(Strategy::Simple);
        }
        self.check_chunked(file_size)?;
        Ok(Strategy::Chunked)
    }

    /// Fails unless a chunked upload of `file_size` bytes is possible.
    pub fn check_chunked(&self, file_size: u64) -> Result<(), TransferError> {
        if file_size < self.chunk_size {
            return Err(TransferError::Precondition(format!(
                "file of {file_size} bytes is smaller than one chunk ({} bytes); use a simple upload",
                self.chunk_size
            )));
        }
        Ok(())
    }
}
