//! Capability traits for the remote content store.
//!
//! A client crate implements these on top of its HTTP API. Keeping them as
//! traits leaves retry logic decoupled from the wire and testable with an
//! in-memory remote.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use boxlift_transfer::{Chunk, ChunkProgress};

use crate::types::{CommitInfo, RemoteFile};

/// Boxed future returned by every transport call.
pub type TransportFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, Failure>> + Send + 'a>>;

/// Classified failure of a single transport call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Failure {
    /// Connection or timeout trouble with no offset information.
    #[error("network error: {0}")]
    NetworkTransient(String),

    /// The service asked for the call to be retried after a delay.
    #[error("retry advised after {} ms", .0.as_millis())]
    RetryAdvised(Duration),

    /// The service holds a different number of session bytes than we sent.
    #[error("incorrect offset; service expects {0}")]
    OffsetMismatch(u64),

    /// Permission, quota or malformed request. Never retried.
    #[error("{0}")]
    Fatal(String),

    /// The access token was rejected. Never retried.
    #[error("unauthorized: {0}")]
    Unauthorized(String),
}

impl Failure {
    /// `true` for failures that end the upload without using the budget.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Failure::Fatal(_) | Failure::Unauthorized(_))
    }
}

/// The three chunked-session calls plus the single-request upload.
///
/// Implementations may report partial byte counts through the
/// [`ChunkProgress`] they are given; the controller reports the full chunk
/// once a call succeeds.
pub trait SessionTransport: Send + Sync {
    /// Opens a session carrying the first chunk. Returns the session id.
    fn start_session<'a>(
        &'a self,
        chunk: &'a Chunk,
        progress: ChunkProgress<'a>,
    ) -> TransportFuture<'a, String>;

    /// Appends `chunk` at `chunk.offset` to an open session.
    fn append_chunk<'a>(
        &'a self,
        session_id: &'a str,
        chunk: &'a Chunk,
        progress: ChunkProgress<'a>,
    ) -> TransportFuture<'a, ()>;

    /// Sends the tail bytes and commits the session to `commit.path`.
    fn finish_session<'a>(
        &'a self,
        session_id: &'a str,
        chunk: &'a Chunk,
        commit: &'a CommitInfo,
        progress: ChunkProgress<'a>,
    ) -> TransportFuture<'a, RemoteFile>;

    /// Uploads a whole file in one request.
    fn upload_simple<'a>(
        &'a self,
        data: &'a [u8],
        commit: &'a CommitInfo,
        progress: ChunkProgress<'a>,
    ) -> TransportFuture<'a, RemoteFile>;
}

/// Shared-link operations.
///
/// Implementations create links with public visibility and the widest
/// access level the account allows.
pub trait LinkSharer: Send + Sync {
    /// Creates a new shared link and returns its URL.
    fn create_link<'a>(&'a self, remote_path: &'a str) -> TransportFuture<'a, String>;

    /// Lists URLs of links that already exist for `remote_path`.
    fn list_links<'a>(&'a self, remote_path: &'a str) -> TransportFuture<'a, Vec<String>>;
}
