/// A contiguous byte range of the source file, read into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Byte offset within the file.
    pub offset: u64,
    /// Raw chunk data.
    pub data: Vec<u8>,
}

impl Chunk {
    /// Number of bytes in this chunk.
    pub fn len(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// An in-progress chunked transfer bound to a remote session.
///
/// Created by a successful start call and owned by a single upload
/// invocation. Never persisted: if the process exits mid-upload the
/// session is abandoned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSession {
    session_id: String,
    committed_offset: u64,
}

impl UploadSession {
    /// Creates a session whose first `committed_offset` bytes are accepted.
    pub fn new(session_id: String, committed_offset: u64) -> Self {
        Self {
            session_id,
            committed_offset,
        }
    }

    /// Returns the opaque session token assigned by the remote service.
    pub fn id(&self) -> &str {
        &self.session_id
    }

    /// Bytes believed to be durably accepted by the remote service.
    pub fn committed_offset(&self) -> u64 {
        self.committed_offset
    }

    /// Records `bytes` more accepted bytes.
    pub fn advance(&mut self, bytes: u64) {
        self.committed_offset += bytes;
    }

    /// Replaces the committed offset with the one reported by the server.
    pub fn resync(&mut self, offset: u64) {
        self.committed_offset = offset;
    }
}
