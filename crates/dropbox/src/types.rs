//! Dropbox v2 wire types.

use boxlift_upload::{CommitInfo, RemoteFile, WriteMode};
use serde::{Deserialize, Serialize};

/// Dropbox timestamps carry whole seconds and a `Z` suffix.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WriteModeTag {
    Add,
    Overwrite,
}

impl From<WriteMode> for WriteModeTag {
    fn from(mode: WriteMode) -> Self {
        match mode {
            WriteMode::Add => WriteModeTag::Add,
            WriteMode::Overwrite => WriteModeTag::Overwrite,
        }
    }
}

/// Argument of `files/upload` and the `commit` part of a session finish.
#[derive(Debug, Clone, Serialize)]
pub struct CommitArg<'a> {
    pub path: &'a str,
    pub mode: WriteModeTag,
    pub autorename: bool,
    pub client_modified: String,
    pub mute: bool,
    pub strict_conflict: bool,
}

impl<'a> From<&'a CommitInfo> for CommitArg<'a> {
    fn from(commit: &'a CommitInfo) -> Self {
        Self {
            path: &commit.path,
            mode: commit.mode.into(),
            autorename: false,
            client_modified: commit.client_modified.format(TIMESTAMP_FORMAT).to_string(),
            mute: false,
            strict_conflict: false,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionStartArg {
    pub close: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionStartResult {
    pub session_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionCursor<'a> {
    pub session_id: &'a str,
    pub offset: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionAppendArg<'a> {
    pub cursor: SessionCursor<'a>,
    pub close: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionFinishArg<'a> {
    pub cursor: SessionCursor<'a>,
    pub commit: CommitArg<'a>,
}

/// File metadata returned by upload and finish calls.
#[derive(Debug, Clone, Deserialize)]
pub struct FileMetadata {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub path_lower: Option<String>,
    #[serde(default)]
    pub path_display: Option<String>,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub rev: String,
    #[serde(default)]
    pub content_hash: Option<String>,
}

impl From<FileMetadata> for RemoteFile {
    fn from(meta: FileMetadata) -> Self {
        RemoteFile {
            id: meta.id,
            name: meta.name,
            path_lower: meta.path_lower.unwrap_or_default(),
            path_display: meta.path_display.unwrap_or_default(),
            size: meta.size,
            rev: meta.rev,
            content_hash: meta.content_hash,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RequestedVisibility {
    Public,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RequestedLinkAccessLevel {
    Max,
}

#[derive(Debug, Clone, Serialize)]
pub struct SharedLinkSettings {
    pub requested_visibility: RequestedVisibility,
    pub access: RequestedLinkAccessLevel,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateSharedLinkArg<'a> {
    pub path: &'a str,
    pub settings: SharedLinkSettings,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListSharedLinksArg<'a> {
    pub path: &'a str,
    pub direct_only: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SharedLinkMetadata {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListSharedLinksResult {
    #[serde(default)]
    pub links: Vec<SharedLinkMetadata>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccountName {
    pub display_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FullAccount {
    pub account_id: String,
    pub name: AccountName,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub account_id: Option<String>,
}

/// Body of a non-2xx response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error_summary: String,
    #[serde(default)]
    pub error: serde_json::Value,
}

impl ApiErrorBody {
    /// Parses an error body; plain-text bodies become the summary.
    pub fn parse(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_else(|_| Self {
            error_summary: body.trim().to_string(),
            error: serde_json::Value::Null,
        })
    }

    /// The service's committed offset for `incorrect_offset` errors, either
    /// at the top level (append) or under `lookup_failed` (finish).
    pub fn correct_offset(&self) -> Option<u64> {
        let incorrect = |v: &serde_json::Value| {
            (v.get(".tag")?.as_str()? == "incorrect_offset")
                .then(|| v.get("correct_offset")?.as_u64())
                .flatten()
        };
        incorrect(&self.error).or_else(|| incorrect(self.error.get("lookup_failed")?))
    }

    /// `error.retry_after` in seconds, as sent with rate-limit errors.
    pub fn retry_after(&self) -> Option<u64> {
        self.error.get("retry_after")?.as_u64()
    }
}
