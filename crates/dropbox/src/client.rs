//! Dropbox v2 API client.
//!
//! Async HTTP client using `reqwest` with Bearer token authentication.
//! Implements the upload engine's [`SessionTransport`] and [`LinkSharer`]
//! traits. The client never retries: every non-2xx response is classified
//! into a [`Failure`] and handed back to the retry controller.

use std::time::Duration;

use boxlift_transfer::{Chunk, ChunkProgress};
use boxlift_upload::{
    CommitInfo, Failure, LinkSharer, RemoteFile, SessionTransport, TransportFuture,
};
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, RETRY_AFTER};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::auth::Credentials;
use crate::types::{
    ApiErrorBody, CommitArg, CreateSharedLinkArg, FileMetadata, FullAccount, ListSharedLinksArg,
    ListSharedLinksResult, RequestedLinkAccessLevel, RequestedVisibility, SessionAppendArg,
    SessionCursor, SessionFinishArg, SessionStartArg, SessionStartResult, SharedLinkMetadata,
    SharedLinkSettings,
};

const API_ARG_HEADER: &str = "Dropbox-API-Arg";
const OCTET_STREAM: &str = "application/octet-stream";

/// Delay used when the service asks for a retry without saying how long.
const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Upper bound for one request, body included.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

/// Errors from the account and authorization endpoints.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {summary}")]
    Api { status: u16, summary: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("access token rejected")]
    Unauthorized,

    #[error("invalid access token")]
    InvalidToken,
}

impl Error {
    pub(crate) fn from_response(status: u16, body: &str) -> Self {
        if status == 401 {
            return Error::Unauthorized;
        }
        let parsed = ApiErrorBody::parse(body);
        let summary = if parsed.error_summary.is_empty() {
            body.trim().to_string()
        } else {
            parsed.error_summary
        };
        Error::Api { status, summary }
    }

    /// `true` when the stored token should be replaced.
    pub fn is_auth(&self) -> bool {
        matches!(self, Error::Unauthorized | Error::InvalidToken)
    }
}

/// Dropbox API client.
pub struct DropboxClient {
    http: reqwest::Client,
    api_base: String,
    content_base: String,
}

impl DropboxClient {
    /// Creates a client for the given credentials.
    pub fn new(credentials: &Credentials) -> Result<Self, Error> {
        Self::with_timeout(credentials, REQUEST_TIMEOUT)
    }

    /// Creates a client whose requests give up after `timeout`.
    ///
    /// A stalled request fails as [`Failure::NetworkTransient`] and is retried
    /// by the controller like any other connection error.
    pub fn with_timeout(credentials: &Credentials, timeout: Duration) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", credentials.access_token))
                .map_err(|_| Error::InvalidToken)?,
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT.min(timeout))
            .build()?;

        Ok(Self {
            http,
            api_base: format!("https://{}/2", credentials.host.api),
            content_base: format!("https://{}/2", credentials.host.content),
        })
    }

    /// Points both hosts at a custom base URL (for testing).
    #[cfg(test)]
    pub(crate) fn with_base_url(mut self, url: &str) -> Self {
        self.api_base = format!("{url}/2");
        self.content_base = format!("{url}/2");
        self
    }

    /// Returns the display name of the authorized account.
    pub async fn current_account(&self) -> Result<String, Error> {
        let url = format!("{}/users/get_current_account", self.api_base);
        let resp = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .body("null")
            .send()
            .await?;
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(Error::from_response(status.as_u16(), &body));
        }

        let account: FullAccount = serde_json::from_str(&body)?;
        debug!(account = %account.account_id, "fetched current account");
        Ok(account.name.display_name)
    }

    /// Calls a content endpoint with the argument in the API-arg header.
    async fn content_call<A: Serialize, R: DeserializeOwned>(
        &self,
        route: &str,
        arg: &A,
        body: Vec<u8>,
    ) -> Result<R, Failure> {
        let url = format!("{}/{route}", self.content_base);
        let arg = api_arg(arg)?;
        debug!(route, bytes = body.len(), "content call");

        let resp = self
            .http
            .post(&url)
            .header(API_ARG_HEADER, arg)
            .header(CONTENT_TYPE, OCTET_STREAM)
            .body(body)
            .send()
            .await
            .map_err(network_failure)?;
        decode(resp).await
    }

    /// Calls an RPC endpoint with a JSON body.
    async fn rpc_call<A: Serialize, R: DeserializeOwned>(
        &self,
        route: &str,
        arg: &A,
    ) -> Result<R, Failure> {
        let url = format!("{}/{route}", self.api_base);
        debug!(route, "rpc call");

        let resp = self
            .http
            .post(&url)
            .json(arg)
            .send()
            .await
            .map_err(network_failure)?;
        decode(resp).await
    }
}

impl SessionTransport for DropboxClient {
    fn start_session<'a>(
        &'a self,
        chunk: &'a Chunk,
        progress: ChunkProgress<'a>,
    ) -> TransportFuture<'a, String> {
        Box::pin(async move {
            progress.sent(0);
            let result: SessionStartResult = self
                .content_call(
                    "files/upload_session/start",
                    &SessionStartArg { close: false },
                    chunk.data.clone(),
                )
                .await?;
            Ok(result.session_id)
        })
    }

    fn append_chunk<'a>(
        &'a self,
        session_id: &'a str,
        chunk: &'a Chunk,
        progress: ChunkProgress<'a>,
    ) -> TransportFuture<'a, ()> {
        Box::pin(async move {
            progress.sent(0);
            let arg = SessionAppendArg {
                cursor: SessionCursor {
                    session_id,
                    offset: chunk.offset,
                },
                close: false,
            };
            // append_v2 answers with a JSON `null`.
            let _: serde_json::Value = self
                .content_call("files/upload_session/append_v2", &arg, chunk.data.clone())
                .await?;
            Ok(())
        })
    }

    fn finish_session<'a>(
        &'a self,
        session_id: &'a str,
        chunk: &'a Chunk,
        commit: &'a CommitInfo,
        progress: ChunkProgress<'a>,
    ) -> TransportFuture<'a, RemoteFile> {
        Box::pin(async move {
            progress.sent(0);
            let arg = SessionFinishArg {
                cursor: SessionCursor {
                    session_id,
                    offset: chunk.offset,
                },
                commit: CommitArg::from(commit),
            };
            let meta: FileMetadata = self
                .content_call("files/upload_session/finish", &arg, chunk.data.clone())
                .await?;
            Ok(meta.into())
        })
    }

    fn upload_simple<'a>(
        &'a self,
        data: &'a [u8],
        commit: &'a CommitInfo,
        progress: ChunkProgress<'a>,
    ) -> TransportFuture<'a, RemoteFile> {
        Box::pin(async move {
            progress.sent(0);
            let meta: FileMetadata = self
                .content_call("files/upload", &CommitArg::from(commit), data.to_vec())
                .await?;
            Ok(meta.into())
        })
    }
}

impl LinkSharer for DropboxClient {
    fn create_link<'a>(&'a self, remote_path: &'a str) -> TransportFuture<'a, String> {
        Box::pin(async move {
            let arg = CreateSharedLinkArg {
                path: remote_path,
                settings: SharedLinkSettings {
                    requested_visibility: RequestedVisibility::Public,
                    access: RequestedLinkAccessLevel::Max,
                },
            };
            let link: SharedLinkMetadata = self
                .rpc_call("sharing/create_shared_link_with_settings", &arg)
                .await?;
            Ok(link.url)
        })
    }

    fn list_links<'a>(&'a self, remote_path: &'a str) -> TransportFuture<'a, Vec<String>> {
        Box::pin(async move {
            let arg = ListSharedLinksArg {
                path: remote_path,
                direct_only: true,
            };
            let result: ListSharedLinksResult =
                self.rpc_call("sharing/list_shared_links", &arg).await?;
            Ok(result.links.into_iter().map(|l| l.url).collect())
        })
    }
}

/// Serializes a header argument, escaping everything outside ASCII.
///
/// HTTP header values must be ASCII, so non-ASCII characters are written
/// as `\uXXXX` JSON escapes (surrogate pairs above the BMP).
fn api_arg<A: Serialize>(arg: &A) -> Result<String, Failure> {
    let json = serde_json::to_string(arg)
        .map_err(|e| Failure::Fatal(format!("cannot encode request argument: {e}")))?;

    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        if c.is_ascii() {
            out.push(c);
        } else {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                out.push_str(&format!("\\u{unit:04x}"));
            }
        }
    }
    Ok(out)
}

fn network_failure(err: reqwest::Error) -> Failure {
    Failure::NetworkTransient(err.to_string())
}

/// Reads a response, decoding success bodies and classifying the rest.
async fn decode<R: DeserializeOwned>(resp: reqwest::Response) -> Result<R, Failure> {
    let status = resp.status();
    let retry_after = resp
        .headers()
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok());
    let body = resp.text().await.map_err(network_failure)?;

    if !status.is_success() {
        return Err(classify(status, retry_after, &body));
    }

    serde_json::from_str(&body)
        .map_err(|e| Failure::Fatal(format!("unexpected response from service: {e}")))
}

/// Maps a non-2xx response onto the retry controller's failure classes.
pub fn classify(status: StatusCode, retry_after_secs: Option<u64>, body: &str) -> Failure {
    let error = ApiErrorBody::parse(body);
    let summary = if error.error_summary.is_empty() {
        status.to_string()
    } else {
        error.error_summary.clone()
    };

    let advised = retry_after_secs.or_else(|| error.retry_after());
    match status.as_u16() {
        429 => Failure::RetryAdvised(advised.map_or(DEFAULT_RETRY_DELAY, Duration::from_secs)),
        503 if advised.is_some() => {
            Failure::RetryAdvised(advised.map_or(DEFAULT_RETRY_DELAY, Duration::from_secs))
        }
        500..=599 => Failure::NetworkTransient(format!("server error {status}: {summary}")),
        409 => match error.correct_offset() {
            Some(offset) => Failure::OffsetMismatch(offset),
            None => Failure::Fatal(summary),
        },
        401 => Failure::Unauthorized(summary),
        _ => Failure::Fatal(summary),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use boxlift_transfer::NoProgress;
    use boxlift_upload::WriteMode;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Starts a mock HTTP server answering one request.
    ///
    /// The handle resolves to the raw request text.
    pub(crate) async fn mock_server(
        status: u16,
        headers: &[(&str, &str)],
        body: &str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let url = format!("http://127.0.0.1:{port}");
        let body = body.to_string();
        let extra: String = headers
            .iter()
            .map(|(k, v)| format!("{k}: {v}\r\n"))
            .collect();

        let handle = tokio::spawn(async move {
            let Ok((mut stream, _)) = listener.accept().await else {
                return String::new();
            };
            let request = read_request(&mut stream).await;

            let resp = format!(
                "HTTP/1.1 {status} Mock\r\nContent-Type: application/json\r\n{extra}Content-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            let _ = stream.write_all(resp.as_bytes()).await;
            let _ = stream.shutdown().await;
            request
        });

        (url, handle)
    }

    /// Reads headers and a `Content-Length` body.
    async fn read_request(stream: &mut tokio::net::TcpStream) -> String {
        let mut data = Vec::new();
        let mut buf = [0u8; 8192];
        loop {
            let n = stream.read(&mut buf).await.unwrap_or(0);
            if n == 0 {
                break;
            }
            data.extend_from_slice(&buf[..n]);

            let text = String::from_utf8_lossy(&data);
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .find_map(|l| {
                        let (k, v) = l.split_once(':')?;
                        k.eq_ignore_ascii_case("content-length")
                            .then(|| v.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if data.len() >= end + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&data).into_owned()
    }

    fn client(url: &str) -> DropboxClient {
        DropboxClient::new(&Credentials::new("test-token"))
            .unwrap()
            .with_base_url(url)
    }

    fn chunk(offset: u64, data: &[u8]) -> Chunk {
        Chunk {
            offset,
            data: data.to_vec(),
        }
    }

    fn commit() -> CommitInfo {
        CommitInfo {
            path: "/uploads/a.bin".into(),
            mode: WriteMode::Overwrite,
            client_modified: chrono::DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        }
    }

    const FILE_JSON: &str = r#"{".tag":"file","id":"id:1","name":"a.bin","path_lower":"/uploads/a.bin","path_display":"/uploads/a.bin","size":12,"rev":"01","content_hash":"abc"}"#;

    #[tokio::test]
    async fn start_session_returns_id() {
        let (url, handle) = mock_server(200, &[], r#"{"session_id":"sess-1"}"#).await;

        let progress = ChunkProgress::new(&NoProgress, 0, 12);
        let id = client(&url)
            .start_session(&chunk(0, b"hello"), progress)
            .await
            .unwrap();
        assert_eq!(id, "sess-1");

        let request = handle.await.unwrap();
        let lower = request.to_lowercase();
        assert!(request.starts_with("POST /2/files/upload_session/start"));
        assert!(lower.contains("authorization: bearer test-token"));
        assert!(lower.contains("dropbox-api-arg: {\"close\":false}"));
        assert!(lower.contains("content-type: application/octet-stream"));
        assert!(request.ends_with("hello"));
    }

    #[tokio::test]
    async fn append_sends_cursor() {
        let (url, handle) = mock_server(200, &[], "null").await;

        let progress = ChunkProgress::new(&NoProgress, 8, 12);
        client(&url)
            .append_chunk("sess-1", &chunk(8, b"abcd"), progress)
            .await
            .unwrap();

        let request = handle.await.unwrap();
        assert!(request.starts_with("POST /2/files/upload_session/append_v2"));
        assert!(request.contains(r#""cursor":{"session_id":"sess-1","offset":8}"#));
    }

    #[tokio::test]
    async fn append_incorrect_offset_is_mismatch() {
        let (url, handle) = mock_server(
            409,
            &[],
            r#"{"error_summary":"incorrect_offset/.","error":{".tag":"incorrect_offset","correct_offset":4}}"#,
        )
        .await;

        let progress = ChunkProgress::new(&NoProgress, 8, 12);
        let err = client(&url)
            .append_chunk("sess-1", &chunk(8, b"abcd"), progress)
            .await
            .unwrap_err();
        assert_eq!(err, Failure::OffsetMismatch(4));
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn finish_returns_remote_file() {
        let (url, handle) = mock_server(200, &[], FILE_JSON).await;

        let progress = ChunkProgress::new(&NoProgress, 8, 12);
        let commit = commit();
        let file = client(&url)
            .finish_session("sess-1", &chunk(8, b"tail"), &commit, progress)
            .await
            .unwrap();
        assert_eq!(file.path_display, "/uploads/a.bin");
        assert_eq!(file.size, 12);

        let request = handle.await.unwrap();
        assert!(request.starts_with("POST /2/files/upload_session/finish"));
        assert!(request.contains(r#""mode":"overwrite""#));
        assert!(request.contains(r#""client_modified":"2023-11-14T22:13:20Z""#));
    }

    #[tokio::test]
    async fn simple_upload_rate_limited() {
        let (url, handle) = mock_server(
            429,
            &[("Retry-After", "7")],
            r#"{"error_summary":"too_many_requests/..","error":{"reason":{".tag":"too_many_requests"},"retry_after":3}}"#,
        )
        .await;

        let progress = ChunkProgress::new(&NoProgress, 0, 3);
        let commit = commit();
        let err = client(&url)
            .upload_simple(b"abc", &commit, progress)
            .await
            .unwrap_err();
        assert_eq!(err, Failure::RetryAdvised(Duration::from_secs(7)));
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn simple_upload_posts_to_upload() {
        let (url, handle) = mock_server(200, &[], FILE_JSON).await;

        let progress = ChunkProgress::new(&NoProgress, 0, 3);
        let commit = commit();
        client(&url)
            .upload_simple(b"abc", &commit, progress)
            .await
            .unwrap();

        let request = handle.await.unwrap();
        assert!(request.starts_with("POST /2/files/upload "));
    }

    #[tokio::test]
    async fn connection_refused_is_transient() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let progress = ChunkProgress::new(&NoProgress, 0, 5);
        let err = client(&format!("http://127.0.0.1:{port}"))
            .start_session(&chunk(0, b"hello"), progress)
            .await
            .unwrap_err();
        assert!(matches!(err, Failure::NetworkTransient(_)));
    }

    #[tokio::test]
    async fn stalled_server_times_out_as_transient() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let _ = read_request(&mut stream).await;
            // Hold the connection open without answering.
            tokio::time::sleep(Duration::from_secs(30)).await;
        });

        let client = DropboxClient::with_timeout(
            &Credentials::new("test-token"),
            Duration::from_millis(300),
        )
        .unwrap()
        .with_base_url(&format!("http://127.0.0.1:{port}"));

        let progress = ChunkProgress::new(&NoProgress, 0, 5);
        let result = tokio::time::timeout(
            Duration::from_secs(10),
            client.start_session(&chunk(0, b"hello"), progress),
        )
        .await
        .expect("request should give up on its own");
        assert!(matches!(result, Err(Failure::NetworkTransient(_))));
        server.abort();
    }

    #[tokio::test]
    async fn create_link_requests_public_max() {
        let (url, handle) = mock_server(
            200,
            &[],
            r#"{".tag":"file","url":"https://www.dropbox.com/s/xyz/a.bin?dl=0","name":"a.bin"}"#,
        )
        .await;

        let link = client(&url).create_link("/uploads/a.bin").await.unwrap();
        assert_eq!(link, "https://www.dropbox.com/s/xyz/a.bin?dl=0");

        let request = handle.await.unwrap();
        assert!(request.starts_with("POST /2/sharing/create_shared_link_with_settings"));
        assert!(request.contains(r#""requested_visibility":"public""#));
        assert!(request.contains(r#""access":"max""#));
    }

    #[tokio::test]
    async fn create_link_conflict_is_fatal() {
        let (url, handle) = mock_server(
            409,
            &[],
            r#"{"error_summary":"shared_link_already_exists/..","error":{".tag":"shared_link_already_exists"}}"#,
        )
        .await;

        let err = client(&url).create_link("/uploads/a.bin").await.unwrap_err();
        assert_eq!(err, Failure::Fatal("shared_link_already_exists/..".into()));
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn list_links_returns_urls() {
        let (url, handle) = mock_server(
            200,
            &[],
            r#"{"links":[{"url":"https://www.dropbox.com/s/old/a.bin?dl=0","name":"a.bin"}],"has_more":false}"#,
        )
        .await;

        let links = client(&url).list_links("/uploads/a.bin").await.unwrap();
        assert_eq!(links, vec!["https://www.dropbox.com/s/old/a.bin?dl=0"]);

        let request = handle.await.unwrap();
        assert!(request.contains(r#""direct_only":true"#));
    }

    #[tokio::test]
    async fn current_account_display_name() {
        let (url, handle) = mock_server(
            200,
            &[],
            r#"{"account_id":"dbid:1","name":{"given_name":"Ada","surname":"L","display_name":"Ada L"},"email":"a@example.com"}"#,
        )
        .await;

        let name = client(&url).current_account().await.unwrap();
        assert_eq!(name, "Ada L");
        assert!(handle.await.unwrap().starts_with("POST /2/users/get_current_account"));
    }

    #[tokio::test]
    async fn current_account_unauthorized() {
        let (url, handle) = mock_server(401, &[], r#"{"error_summary":"invalid_access_token/.."}"#).await;

        let err = client(&url).current_account().await.unwrap_err();
        assert!(matches!(err, Error::Unauthorized));
        assert!(err.is_auth());
        handle.await.unwrap();
    }

    #[test]
    fn new_rejects_invalid_token() {
        let err = DropboxClient::new(&Credentials::new("bad\ntoken")).err().unwrap();
        assert!(matches!(err, Error::InvalidToken));
    }

    #[test]
    fn api_arg_escapes_non_ascii() {
        #[derive(Serialize)]
        struct Arg<'a> {
            path: &'a str,
        }
        let arg = api_arg(&Arg { path: "/Fotos/ñ😀.jpg" }).unwrap();
        assert_eq!(arg, r#"{"path":"/Fotos/\u00f1\ud83d\ude00.jpg"}"#);
        assert!(arg.is_ascii());
    }

    #[test]
    fn classify_retry_advised() {
        assert_eq!(
            classify(StatusCode::TOO_MANY_REQUESTS, None, "{}"),
            Failure::RetryAdvised(DEFAULT_RETRY_DELAY)
        );
        assert_eq!(
            classify(
                StatusCode::SERVICE_UNAVAILABLE,
                None,
                r#"{"error_summary":"x","error":{"retry_after":5}}"#
            ),
            Failure::RetryAdvised(Duration::from_secs(5))
        );
        assert_eq!(
            classify(StatusCode::SERVICE_UNAVAILABLE, Some(2), ""),
            Failure::RetryAdvised(Duration::from_secs(2))
        );
    }

    #[test]
    fn classify_server_errors_are_transient() {
        assert!(matches!(
            classify(StatusCode::SERVICE_UNAVAILABLE, None, ""),
            Failure::NetworkTransient(_)
        ));
        assert!(matches!(
            classify(StatusCode::INTERNAL_SERVER_ERROR, None, "oops"),
            Failure::NetworkTransient(_)
        ));
    }

    #[test]
    fn classify_fatal() {
        assert_eq!(
            classify(StatusCode::UNAUTHORIZED, None, r#"{"error_summary":"expired_access_token/"}"#),
            Failure::Unauthorized("expired_access_token/".into())
        );
        assert_eq!(
            classify(
                StatusCode::CONFLICT,
                None,
                r#"{"error_summary":"path/insufficient_space/..","error":{".tag":"path"}}"#
            ),
            Failure::Fatal("path/insufficient_space/..".into())
        );
        assert_eq!(
            classify(StatusCode::BAD_REQUEST, None, "Error in call to API function"),
            Failure::Fatal("Error in call to API function".into())
        );
    }

    #[test]
    fn classify_finish_lookup_failed() {
        assert_eq!(
            classify(
                StatusCode::CONFLICT,
                None,
                r#"{"error_summary":"lookup_failed/incorrect_offset/..","error":{".tag":"lookup_failed","lookup_failed":{".tag":"incorrect_offset","correct_offset":16}}}"#
            ),
            Failure::OffsetMismatch(16)
        );
    }
}
