//! Shared-link acquisition.

use tracing::{debug, warn};

use crate::transport::LinkSharer;

/// How the shareable URL for an upload was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    /// A new public link was created.
    Created(String),
    /// Creation failed; an existing link was reused.
    Existing(String),
    /// No link could be produced. The upload itself still succeeded.
    Unavailable(String),
}

impl LinkOutcome {
    pub fn url(&self) -> Option<&str> {
        match self {
            LinkOutcome::Created(url) | LinkOutcome::Existing(url) => Some(url),
            LinkOutcome::Unavailable(_) => None,
        }
    }
}

/// Creates a public link for `remote_path`, falling back to the first
/// existing link when creation is refused.
///
/// Never fails: a missing link does not undo a committed upload.
pub async fn share_link(sharer: &dyn LinkSharer, remote_path: &str) -> LinkOutcome {
    let create_err = match sharer.create_link(remote_path).await {
        Ok(url) => {
            debug!(path = remote_path, %url, "shared link created");
            return LinkOutcome::Created(url);
        }
        Err(err) => err,
    };

    debug!(path = remote_path, error = %create_err, "link creation failed, listing existing links");

    match sharer.list_links(remote_path).await {
        Ok(links) => match links.into_iter().next() {
            Some(url) => LinkOutcome::Existing(url),
            None => {
                warn!(path = remote_path, error = %create_err, "no shared link available");
                LinkOutcome::Unavailable(create_err.to_string())
            }
        },
        Err(list_err) => {
            warn!(
                path = remote_path,
                create = %create_err,
                list = %list_err,
                "could not obtain a shared link"
            );
            LinkOutcome::Unavailable(list_err.to_string())
        }
    }
}
