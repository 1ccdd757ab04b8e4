//! Transport errors from the palette API and the error value kept in state.

use std::fmt;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("palette api request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("palette api returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("failed to decode palette api response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid palette api url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("palette api unavailable: {0}")]
    Unavailable(String),
}

impl ClientError {
    /// Message recorded in [`AppError`]. Server-provided error text is kept
    /// verbatim; everything else uses the display form.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Status { message, .. } => message.clone(),
            ClientError::Unavailable(message) => message.clone(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Fetching or cleaning palettes and folders failed.
    Fetch,
    DeleteFolder,
    DeletePalette,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorKind::Fetch => "fetch",
            ErrorKind::DeleteFolder => "delete folder",
            ErrorKind::DeletePalette => "delete palette",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} failed: {message}")]
pub struct AppError {
    kind: ErrorKind,
    message: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn from_client(kind: ErrorKind, err: &ClientError) -> Self {
        Self::new(kind, err.user_message())
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
