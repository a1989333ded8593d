//! Error types for landwatch-client

use landwatch_core::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Could not build HTTP client: {0}")]
    Build(String),

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected status {status}")]
    Status { status: u16 },

    #[error("Could not decode response: {message}")]
    Decode { message: String },
}

pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    /// Map a transaction API failure into the core error
    pub fn into_upstream(self) -> CoreError {
        match self {
            ClientError::Status { status } => CoreError::UpstreamStatus { status },
            ClientError::Decode { message } => CoreError::InvalidResponse { message },
            other => CoreError::UpstreamUnavailable {
                message: other.to_string(),
            },
        }
    }

    /// Map a keyword store failure into the core error
    pub fn into_store(self) -> CoreError {
        CoreError::StoreError {
            message: self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use landwatch_core::ErrorCode;

    #[test]
    fn test_upstream_mapping() {
        assert_eq!(ClientError::Status { status: 502 }.into_upstream().code(), ErrorCode::UpstreamStatus);
        assert_eq!(
            ClientError::Decode { message: "eof".into() }.into_upstream().code(),
            ErrorCode::InvalidResponse
        );
        assert_eq!(ClientError::Build("tls".into()).into_upstream().code(), ErrorCode::UpstreamUnavailable);
    }

    #[test]
    fn test_store_mapping_keeps_message() {
        let err = ClientError::Status { status: 401 }.into_store();
        assert!(matches!(err, CoreError::StoreError { ref message } if message.contains("401")));
    }
}
