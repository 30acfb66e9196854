//! Resumable upload engine.
//!
//! This crate drives a remote content store through a three-phase session
//! protocol and owns every retry decision. It has no network code of its
//! own: a client crate implements [`SessionTransport`] and [`LinkSharer`]
//! on top of the real API.
//!
//! # Pipeline
//!
//! 1. **Prepare**: archive a directory source into a single zip file
//! 2. **Validate**: check the remote path and the local file
//! 3. **Plan**: pick a single-request or chunked upload
//! 4. **Upload**: run the start/append/finish session with retries
//! 5. **Share**: create a public link, falling back to an existing one
//! 6. **Clean up**: remove the temporary archive

pub mod archive;
pub mod controller;
pub mod error;
pub mod link;
pub mod orchestrator;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use archive::{PreparedSource, archive_directory, prepare_source};
pub use controller::{DEFAULT_MAX_ATTEMPTS, Phase, RetryController, RetryState};
pub use error::UploadError;
pub use link::{LinkOutcome, share_link};
pub use orchestrator::UploadOrchestrator;
pub use transport::{Failure, LinkSharer, SessionTransport, TransportFuture};
pub use types::{CommitInfo, RemoteFile, UploadOptions, UploadReport, UploadRequest, WriteMode};
