use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The photo API answered with an `error` object, usually a bad token or album id.
    #[error("photo API request failed ({code}): {message}")]
    AuthOrRequest { code: i64, message: String },

    #[error("photo {photo_id} has no renditions")]
    MalformedPhoto { photo_id: i64 },

    #[error("malformed response from {endpoint}: {reason}")]
    MalformedResponse { endpoint: String, reason: String },

    #[error("no upload href returned for '{path}': {reason}")]
    MissingUploadHref { path: String, reason: String },

    #[error("folder '{0}' already exists")]
    FolderExists(String),

    #[error("file '{0}' already exists")]
    FileExists(String),

    #[error("unexpected status {status} while {context}")]
    UnexpectedStatus { status: StatusCode, context: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
