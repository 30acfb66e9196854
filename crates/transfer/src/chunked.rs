use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::TransferError;
use crate::types::Chunk;

/// Block size used by the remote content hash: 4 MiB.
pub const CONTENT_HASH_BLOCK_SIZE: usize = 4 << 20;

// ---------------------------------------------------------------------------
// ChunkReader
// ---------------------------------------------------------------------------

/// Reads byte ranges of a file on demand.
///
/// The reader is opened once per upload and re-seeked before every phase,
/// since a failed call may have consumed bytes the server never accepted.
pub struct ChunkReader {
    file: File,
    offset: u64,
    file_size: u64,
}

impl ChunkReader {
    /// Opens `path` for chunked reading.
    pub fn open(path: &Path) -> Result<Self, TransferError> {
        let file = File::open(path)?;
        let file_size = file.metadata()?.len();
        Ok(Self {
            file,
            offset: 0,
            file_size,
        })
    }

    /// Seeks to the given byte offset.
    pub fn seek_to(&mut self, offset: u64) -> Result<(), TransferError> {
        if offset > self.file_size {
            return Err(TransferError::Precondition(format!(
                "offset {offset} is past end of file ({} bytes)",
                self.file_size
            )));
        }
        self.file.seek(SeekFrom::Start(offset))?;
        self.offset = offset;
        Ok(())
    }

    /// Reads up to `max_len` bytes from the current offset.
    ///
    /// Returns a shorter chunk only when the end of the file is reached,
    /// and an empty chunk at EOF.
    pub fn read_chunk(&mut self, max_len: u64) -> Result<Chunk, TransferError> {
        let len = max_len.min(self.remaining());
        let mut data = vec![0u8; len as usize];
        self.file.read_exact(&mut data)?;

        let chunk = Chunk {
            offset: self.offset,
            data,
        };
        self.offset += len;
        Ok(chunk)
    }

    /// Current byte offset.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Total file size in bytes.
    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    /// Bytes remaining to read.
    pub fn remaining(&self) -> u64 {
        self.file_size - self.offset
    }
}

// ---------------------------------------------------------------------------
// Content hash
// ---------------------------------------------------------------------------

/// Incremental remote content hash: SHA-256 over the concatenated SHA-256
/// digests of each 4 MiB block.
pub struct ContentHasher {
    overall: Sha256,
    block: Sha256,
    block_len: usize,
}

impl ContentHasher {
    pub fn new() -> Self {
        Self {
            overall: Sha256::new(),
            block: Sha256::new(),
            block_len: 0,
        }
    }

    pub fn update(&mut self, mut data: &[u8]) {
        while !data.is_empty() {
            let take = data.len().min(CONTENT_HASH_BLOCK_SIZE - self.block_len);
            self.block.update(&data[..take]);
            self.block_len += take;
            data = &data[take..];

            if self.block_len == CONTENT_HASH_BLOCK_SIZE {
                let digest = std::mem::take(&mut self.block).finalize();
                self.overall.update(digest);
                self.block_len = 0;
            }
        }
    }

    /// Returns the hex-encoded hash.
    pub fn finalize(mut self) -> String {
        if self.block_len > 0 {
            self.overall.update(self.block.finalize());
        }
        hex::encode(self.overall.finalize())
    }
}

impl Default for ContentHasher {
    fn default() -> Self {
        Self::new()
    }
}

/// Computes the remote content hash of an entire file.
pub fn content_hash_file(path: &Path) -> Result<String, TransferError> {
    let mut file = File::open(path)?;
    let mut hasher = ContentHasher::new();
    let mut buf = vec![0u8; 64 * 1024];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hasher.finalize())
}
