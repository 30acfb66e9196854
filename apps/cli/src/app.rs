//! Command dispatch.

use std::future::Future;
use std::path::PathBuf;

use anyhow::Context;
use boxlift_dropbox::DropboxClient;
use boxlift_transfer::ConsoleProgress;
use boxlift_upload::{LinkOutcome, UploadError, UploadOrchestrator, UploadReport, UploadRequest};
use tokio_util::sync::CancellationToken;

use crate::auth;
use crate::cli::{Cli, Command};
use crate::config::{self, Config, CredentialStore};

/// Runs one CLI command to completion.
pub async fn run(cli: Cli, cancel: CancellationToken) -> anyhow::Result<()> {
    let dir = config::config_dir()?;
    let mut config = Config::load_from(&dir)?;
    config.validate()?;
    let store = CredentialStore::new(&dir);

    match cli.command {
        Command::Authorize => {
            auth::authorize(&mut config, &dir, &store).await?;
            println!("Authorization saved.");
            Ok(())
        }
        Command::Upload {
            local_path,
            remote_folder,
            remote_name,
        } => {
            let credentials = match store.load()? {
                Some(credentials) => credentials,
                None => auth::authorize(&mut config, &dir, &store).await?,
            };
            let client = DropboxClient::new(&credentials)?;

            let account = client
                .current_account()
                .await
                .context("could not read the linked account")?;
            println!("Linked account: {account}");

            let request = build_request(&config, local_path, remote_folder, remote_name);
            let progress = ConsoleProgress;
            let orchestrator = UploadOrchestrator::new(
                &client,
                &client,
                &progress,
                config.upload_options()?,
                cancel,
            );
            let report = orchestrator.upload(&request).await?;
            for line in summary(&report) {
                println!("{line}");
            }
            Ok(())
        }
    }
}

fn build_request(
    config: &Config,
    local_path: PathBuf,
    remote_folder: Option<String>,
    remote_name: Option<String>,
) -> UploadRequest {
    UploadRequest {
        local_path,
        remote_folder: remote_folder.unwrap_or_else(|| config.default_remote_folder.clone()),
        remote_name,
    }
}

/// Lines printed after a successful upload.
fn summary(report: &UploadReport) -> Vec<String> {
    let mut lines = vec![format!(
        "Uploaded {} ({} bytes, {} upload)",
        report.remote.path_display, report.remote.size, report.strategy
    )];
    match &report.link {
        LinkOutcome::Created(url) | LinkOutcome::Existing(url) => {
            lines.push(format!("Shared link: {url}"));
        }
        LinkOutcome::Unavailable(reason) => {
            lines.push(format!("Note: no shared link could be created ({reason})"));
        }
    }
    lines
}

/// Drives `work` until it finishes or `cancel` fires.
///
/// Cancellation drops `work` wherever it is waiting (a prompt, an HTTP
/// request) and ends the run as [`UploadError::Interrupted`].
pub async fn run_until_cancelled<F>(work: F, cancel: &CancellationToken) -> anyhow::Result<()>
where
    F: Future<Output = anyhow::Result<()>>,
{
    tokio::select! {
        result = work => result,
        () = cancel.cancelled() => Err(UploadError::Interrupted.into()),
    }
}

/// `true` when the error means the stored token is no longer accepted.
pub fn needs_reauthorization(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        if let Some(e) = cause.downcast_ref::<boxlift_dropbox::Error>() {
            return e.is_auth();
        }
        matches!(
            cause.downcast_ref::<UploadError>(),
            Some(UploadError::Unauthorized(_))
        )
    })
}
