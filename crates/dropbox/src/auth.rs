//! OAuth2 code flow without a redirect URI.
//!
//! The user opens [`authorize_url`] in a browser, approves the app and
//! pastes the displayed code back; [`exchange_code`] turns it into a
//! long-lived bearer token.

use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::client::{Error, REQUEST_TIMEOUT};
use crate::types::TokenResponse;

const AUTHORIZE_URL: &str = "https://www.dropbox.com/oauth2/authorize";
const TOKEN_URL: &str = "https://api.dropboxapi.com/oauth2/token";

pub const DEFAULT_API_HOST: &str = "api.dropboxapi.com";
pub const DEFAULT_CONTENT_HOST: &str = "content.dropboxapi.com";

/// API hosts a token is valid for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Host {
    #[serde(rename = "api_host")]
    pub api: String,
    #[serde(rename = "content_host")]
    pub content: String,
}

impl Default for Host {
    fn default() -> Self {
        Self {
            api: DEFAULT_API_HOST.into(),
            content: DEFAULT_CONTENT_HOST.into(),
        }
    }
}

/// Stored authorization for API calls.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub access_token: String,
    #[serde(flatten, default)]
    pub host: Host,
}

impl Credentials {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            host: Host::default(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &"***")
            .field("host", &self.host)
            .finish()
    }
}

/// Builds the URL the user visits to obtain an authorization code.
pub fn authorize_url(app_key: &str) -> String {
    format!(
        "{AUTHORIZE_URL}?client_id={}&response_type=code",
        utf8_percent_encode(app_key, NON_ALPHANUMERIC)
    )
}

/// Exchanges an authorization code for credentials.
pub async fn exchange_code(app_key: &str, app_secret: &str, code: &str) -> Result<Credentials, Error> {
    exchange_code_at(TOKEN_URL, app_key, app_secret, code).await
}

pub(crate) async fn exchange_code_at(
    token_url: &str,
    app_key: &str,
    app_secret: &str,
    code: &str,
) -> Result<Credentials, Error> {
    let params = [
        ("grant_type", "authorization_code"),
        ("code", code.trim()),
        ("client_id", app_key),
        ("client_secret", app_secret),
    ];

    let resp = reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()?
        .post(token_url)
        .form(&params)
        .send()
        .await?;
    let status = resp.status();
    let body = resp.text().await?;

    if !status.is_success() {
        return Err(Error::from_response(status.as_u16(), &body));
    }

    let token: TokenResponse = serde_json::from_str(&body)?;
    info!(account = token.account_id.as_deref().unwrap_or("?"), "authorization code exchanged");
    Ok(Credentials::new(token.access_token))
}
