//! Interactive account linking.

use std::path::Path;

use anyhow::{Context, bail};
use boxlift_dropbox::{Credentials, authorize_url, exchange_code};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::config::{Config, CredentialStore};

/// Walks the user through the code flow and stores the resulting token.
///
/// Missing app credentials are prompted for and saved in the config.
pub async fn authorize(
    config: &mut Config,
    config_dir: &Path,
    store: &CredentialStore,
) -> anyhow::Result<Credentials> {
    let mut input = BufReader::new(tokio::io::stdin());

    let mut changed = false;
    let app_key = match config.app_key.clone() {
        Some(key) => key,
        None => {
            changed = true;
            prompt(&mut input, "Dropbox app key: ").await?
        }
    };
    let app_secret = match config.app_secret.clone() {
        Some(secret) => secret,
        None => {
            changed = true;
            prompt(&mut input, "Dropbox app secret: ").await?
        }
    };
    if changed {
        config.app_key = Some(app_key.clone());
        config.app_secret = Some(app_secret.clone());
        config.save_to(config_dir)?;
    }

    println!("1. Go to: {}", authorize_url(&app_key));
    println!("2. Click \"Allow\" (you might have to log in first).");
    println!("3. Copy the authorization code.");
    let code = prompt(&mut input, "Enter the authorization code here: ").await?;

    let credentials = exchange_code(&app_key, &app_secret, &code)
        .await
        .context("authorization failed")?;
    store.save(&credentials)?;
    Ok(credentials)
}

/// Prints `label` and reads one non-empty line.
async fn prompt<R: AsyncBufRead + Unpin>(input: &mut R, label: &str) -> anyhow::Result<String> {
    use std::io::Write;

    print!("{label}");
    std::io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line).await? == 0 {
        bail!("no input provided");
    }
    let value = line.trim();
    if value.is_empty() {
        bail!("no input provided");
    }
    Ok(value.to_string())
}
