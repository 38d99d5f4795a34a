use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure; the store falls back to the local snapshot
    #[error("Backend unreachable: {0}")]
    Unreachable(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Server responded {status}: {message}")]
    Status { status: u16, message: String },

    #[error("{kind} records cannot be {operation}")]
    Unsupported {
        kind: &'static str,
        operation: &'static str,
    },

    #[error("Invalid input: {0}")]
    Invalid(#[from] crate::models::ValidationError),

    #[error("Local store IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to decode data: {0}")]
    DecodeError(#[from] serde_json::Error),
}

impl ClientError {
    /// Whether the local fallback should take over.
    /// Client-side mistakes (404, 4xx, invalid input) are surfaced instead.
    pub fn falls_back(&self) -> bool {
        match self {
            ClientError::Unreachable(_) => true,
            ClientError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Status {
                status: err.status().map(|s| s.as_u16()).unwrap_or(0),
                message: err.to_string(),
            }
        } else {
            ClientError::Unreachable(err.to_string())
        }
    }
}
