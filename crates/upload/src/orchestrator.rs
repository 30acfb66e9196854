//! End-to-end upload of one local path.

use std::path::Path;

use boxlift_transfer::{
    ProgressSink, Strategy, content_hash_file, remote_file_name, remote_path,
    validate_local_file, validate_remote_path,
};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::archive::{PreparedSource, prepare_source};
use crate::controller::RetryController;
use crate::error::UploadError;
use crate::link::share_link;
use crate::transport::{LinkSharer, SessionTransport};
use crate::types::{CommitInfo, RemoteFile, UploadOptions, UploadReport, UploadRequest};

/// Composes archiving, validation, strategy choice, the retrying upload and
/// link sharing.
pub struct UploadOrchestrator<'a> {
    transport: &'a dyn SessionTransport,
    links: &'a dyn LinkSharer,
    progress: &'a dyn ProgressSink,
    options: UploadOptions,
    cancel: CancellationToken,
}

impl<'a> UploadOrchestrator<'a> {
    pub fn new(
        transport: &'a dyn SessionTransport,
        links: &'a dyn LinkSharer,
        progress: &'a dyn ProgressSink,
        options: UploadOptions,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            transport,
            links,
            progress,
            options,
            cancel,
        }
    }

    /// Uploads `request.local_path` and returns the committed file and link.
    ///
    /// A temporary archive is removed once the file is committed. If the
    /// upload fails it is kept for inspection.
    pub async fn upload(&self, request: &UploadRequest) -> Result<UploadReport, UploadError> {
        let source = prepare_source(&request.local_path).await?;

        match self.upload_prepared(request, &source).await {
            Ok(report) => {
                source.cleanup();
                Ok(report)
            }
            Err(e) => {
                if source.is_temporary() {
                    warn!(archive = %source.path().display(), "upload failed, keeping archive");
                }
                Err(e)
            }
        }
    }

    async fn upload_prepared(
        &self,
        request: &UploadRequest,
        source: &PreparedSource,
    ) -> Result<UploadReport, UploadError> {
        let local = source.path();
        let name = remote_file_name(local, request.remote_name.as_deref())?;
        let target = remote_path(&request.remote_folder, &name);
        validate_remote_path(&target)?;
        validate_local_file(local)?;

        let size = tokio::fs::metadata(local).await?.len();
        let strategy = self.options.plan.strategy(size)?;
        let commit = CommitInfo::overwrite(&target, local)?;

        info!(
            local = %local.display(),
            remote = %target,
            size,
            %strategy,
            "uploading"
        );

        let controller = RetryController::new(
            self.transport,
            self.progress,
            self.options.plan,
            self.options.max_attempts,
            self.cancel.clone(),
        );
        let remote = match strategy {
            Strategy::Simple => controller.upload_simple(local, &commit).await?,
            Strategy::Chunked => controller.chunked_upload_file(local, &commit).await?,
        };

        if self.options.verify_content_hash {
            verify_content_hash(local, &remote).await?;
        }

        let link_path = if remote.path_lower.is_empty() {
            commit.path.as_str()
        } else {
            remote.path_lower.as_str()
        };
        let link = share_link(self.links, link_path).await;

        Ok(UploadReport {
            remote,
            strategy,
            archived: source.is_temporary(),
            link,
        })
    }
}

/// Compares the remote content hash, when present, with the local file's.
async fn verify_content_hash(local: &Path, remote: &RemoteFile) -> Result<(), UploadError> {
    let Some(expected) = remote.content_hash.clone() else {
        return Ok(());
    };

    let path = local.to_path_buf();
    let actual = tokio::task::spawn_blocking(move || content_hash_file(&path))
        .await
        .map_err(|e| UploadError::Join(e.to_string()))??;

    if !actual.eq_ignore_ascii_case(&expected) {
        return Err(UploadError::IntegrityMismatch {
            local: actual,
            remote: expected,
        });
    }
    Ok(())
}
