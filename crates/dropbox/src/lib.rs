//! Dropbox transport for boxlift.
//!
//! Wraps the Dropbox v2 HTTP API behind the upload engine's transport and
//! link-sharing traits, plus the OAuth code flow used to obtain a token.

pub mod auth;
pub mod client;
pub mod types;

pub use auth::{Credentials, Host, authorize_url, exchange_code};
pub use client::{DropboxClient, Error, classify};
