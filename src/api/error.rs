use thiserror::Error;

/// Which side of the wire a request failed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Network-level failure (timeout, DNS, connection refused).
    Transport,
    /// The service answered with a non-success status.
    Status,
    /// The body could not be decoded into catalog types.
    Parse,
}

/// The single error type that crosses from the network into the rest of Shelf.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub status: Option<u16>,
    pub message: String,
}

impl ApiError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Transport,
            status: None,
            message: message.into(),
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            kind: ApiErrorKind::Status,
            status: Some(status),
            message: format!("HTTP error! status: {status}"),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Parse,
            status: None,
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::parse(format!("invalid response body: {err}"))
        } else if let Some(status) = err.status() {
            ApiError::status(status.as_u16())
        } else {
            ApiError::transport(err.to_string())
        }
    }
}
