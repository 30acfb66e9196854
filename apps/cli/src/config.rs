//! Configuration and credential storage.
//!
//! Both files live in one directory:
//! - Linux: `~/.config/boxlift/`
//! - Windows: `%APPDATA%/boxlift/`
//!
//! `BOXLIFT_CONFIG_DIR` overrides the location.

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use boxlift_dropbox::Credentials;
use boxlift_transfer::{ChunkPlan, validate_remote_path};
use boxlift_upload::UploadOptions;
use serde::{Deserialize, Serialize};

const CONFIG_FILE: &str = "config.toml";
const AUTH_FILE: &str = "auth.toml";

/// Upload chunks must be a multiple of this many MiB.
const CHUNK_ALIGNMENT_MIB: u64 = 4;

/// User configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Chunk size for session uploads, in MiB.
    #[serde(default = "default_chunk_size_mib")]
    pub chunk_size_mib: u64,

    /// Largest file sent in one request, in MiB (two chunks when unset).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simple_threshold_mib: Option<u64>,

    /// Retry budget per upload.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Folder used when none is given on the command line.
    #[serde(default = "default_remote_folder")]
    pub default_remote_folder: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_secret: Option<String>,
}

fn default_chunk_size_mib() -> u64 {
    8
}

fn default_max_attempts() -> u32 {
    boxlift_upload::DEFAULT_MAX_ATTEMPTS
}

fn default_remote_folder() -> String {
    "/uploads".into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chunk_size_mib: default_chunk_size_mib(),
            simple_threshold_mib: None,
            max_attempts: default_max_attempts(),
            default_remote_folder: default_remote_folder(),
            app_key: None,
            app_secret: None,
        }
    }
}

impl Config {
    /// Loads the configuration from `dir`, creating a default file if none
    /// exists.
    pub fn load_from(dir: &Path) -> anyhow::Result<Self> {
        let path = dir.join(CONFIG_FILE);

        if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("parsing {}", path.display()))?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(dir)?;
            Ok(config)
        }
    }

    /// Writes the configuration into `dir`.
    pub fn save_to(&self, dir: &Path) -> anyhow::Result<()> {
        let path = dir.join(CONFIG_FILE);
        write_private(&path, &toml::to_string_pretty(self)?)?;
        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }

    /// Rejects values the upload engine cannot work with.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.chunk_size_mib == 0 || self.chunk_size_mib % CHUNK_ALIGNMENT_MIB != 0 {
            bail!(
                "chunk_size_mib must be a non-zero multiple of {CHUNK_ALIGNMENT_MIB}, got {}",
                self.chunk_size_mib
            );
        }
        if self.simple_threshold_mib == Some(0) {
            bail!("simple_threshold_mib must be greater than zero");
        }
        if self.max_attempts == 0 {
            bail!("max_attempts must be at least 1");
        }
        validate_remote_path(&self.default_remote_folder)
            .with_context(|| "invalid default_remote_folder")?;
        Ok(())
    }

    /// Engine options derived from this configuration.
    pub fn upload_options(&self) -> anyhow::Result<UploadOptions> {
        let mut plan = ChunkPlan::new(self.chunk_size_mib << 20)?;
        if let Some(threshold) = self.simple_threshold_mib {
            plan = plan.with_simple_threshold(threshold << 20);
        }
        Ok(UploadOptions {
            plan,
            max_attempts: self.max_attempts,
            ..UploadOptions::default()
        })
    }
}

/// Stored access token, kept apart from the main configuration.
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(AUTH_FILE),
        }
    }

    pub fn load(&self) -> anyhow::Result<Option<Credentials>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)?;
        let credentials: Credentials = toml::from_str(&content)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        if credentials.access_token.is_empty() {
            return Ok(None);
        }
        Ok(Some(credentials))
    }

    pub fn save(&self, credentials: &Credentials) -> anyhow::Result<()> {
        write_private(&self.path, &toml::to_string_pretty(credentials)?)?;
        tracing::info!(path = %self.path.display(), "credentials saved");
        Ok(())
    }
}

/// Returns the configuration directory.
pub fn config_dir() -> anyhow::Result<PathBuf> {
    if let Some(dir) = std::env::var_os("BOXLIFT_CONFIG_DIR") {
        return Ok(PathBuf::from(dir));
    }

    #[cfg(target_os = "windows")]
    {
        let appdata = std::env::var("APPDATA").context("APPDATA is not set")?;
        Ok(PathBuf::from(appdata).join("boxlift"))
    }

    #[cfg(not(target_os = "windows"))]
    {
        let home = std::env::var("HOME").context("HOME is not set")?;
        Ok(PathBuf::from(home).join(".config").join("boxlift"))
    }
}

/// Writes `content` to `path`, readable only by the owner on Unix.
fn write_private(path: &Path, content: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    }
    Ok(())
}
