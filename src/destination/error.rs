use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DestinationError {
    #[error("http error: {0}")]
    Http(#[from] ureq::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid proxy `{url}`: {reason}")]
    Proxy { url: String, reason: String },

    #[error("token file {path} could not be read: {reason}")]
    TokenFile { path: PathBuf, reason: String },

    #[error("token refresh rejected: {0}")]
    TokenRefresh(String),

    #[error("malformed response: {0}")]
    Malformed(String),
}
