//! Error types for landwatch-core
//!
//! Every call to an external collaborator (transaction API, keyword store,
//! region dataset) comes back as a typed `CoreError`, so the views can tell a
//! failed request apart from an empty result.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Network failure talking to the transaction API
    UpstreamUnavailable,
    /// Transaction API answered with a non-2xx status
    UpstreamStatus,
    /// Response body could not be understood
    InvalidResponse,
    /// Keyword store request failed
    StoreError,
    /// Operation needs a signed-in identity
    Unauthenticated,
    /// Another request for the same component is still outstanding
    Busy,
    /// Caller supplied an unusable value
    InvalidInput,
    /// Region dataset could not be read
    DatasetError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::UpstreamUnavailable => write!(f, "UPSTREAM_UNAVAILABLE"),
            ErrorCode::UpstreamStatus => write!(f, "UPSTREAM_STATUS"),
            ErrorCode::InvalidResponse => write!(f, "INVALID_RESPONSE"),
            ErrorCode::StoreError => write!(f, "STORE_ERROR"),
            ErrorCode::Unauthenticated => write!(f, "UNAUTHENTICATED"),
            ErrorCode::Busy => write!(f, "BUSY"),
            ErrorCode::InvalidInput => write!(f, "INVALID_INPUT"),
            ErrorCode::DatasetError => write!(f, "DATASET_ERROR"),
        }
    }
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Suggestions for resolution
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    /// Create a new error detail
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            suggestions: vec![],
        }
    }

    /// Add detail information
    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.details = Some(detail);
        self
    }

    /// Add a suggestion
    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, "\nDetails: {}", details)?;
        }
        if !self.suggestions.is_empty() {
            write!(f, "\nSuggestions:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n  - {}", suggestion)?;
            }
        }
        Ok(())
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "info"),
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
        }
    }
}

/// Main error type for landwatch-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Transaction API unavailable: {message}")]
    UpstreamUnavailable { message: String },

    #[error("Transaction API returned status {status}")]
    UpstreamStatus { status: u16 },

    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    #[error("Keyword store error: {message}")]
    StoreError { message: String },

    #[error("Sign-in required")]
    Unauthenticated,

    #[error("A request is already in progress")]
    Busy,

    #[error("Region dataset error: {message}")]
    DatasetError { message: String },
}

impl CoreError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::UpstreamUnavailable { .. } => ErrorCode::UpstreamUnavailable,
            CoreError::UpstreamStatus { .. } => ErrorCode::UpstreamStatus,
            CoreError::InvalidResponse { .. } => ErrorCode::InvalidResponse,
            CoreError::StoreError { .. } => ErrorCode::StoreError,
            CoreError::Unauthenticated => ErrorCode::Unauthenticated,
            CoreError::Busy => ErrorCode::Busy,
            CoreError::DatasetError { .. } => ErrorCode::DatasetError,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::UpstreamUnavailable { .. } => ErrorSeverity::Error,
            CoreError::UpstreamStatus { .. } => ErrorSeverity::Error,
            CoreError::InvalidResponse { .. } => ErrorSeverity::Error,
            CoreError::StoreError { .. } => ErrorSeverity::Error,
            CoreError::Unauthenticated => ErrorSeverity::Info,
            CoreError::Busy => ErrorSeverity::Info,
            CoreError::DatasetError { .. } => ErrorSeverity::Warning,
        }
    }

    /// Message shown to the user in the page
    pub fn user_message(&self) -> String {
        match self {
            CoreError::UpstreamUnavailable { .. } => "실거래 API에 연결할 수 없습니다.".to_string(),
            CoreError::UpstreamStatus { status } => format!("실거래 API 호출 실패 (HTTP {})", status),
            CoreError::InvalidResponse { .. } => "실거래 API 응답을 해석할 수 없습니다.".to_string(),
            CoreError::StoreError { .. } => "키워드 저장소 요청이 실패했습니다.".to_string(),
            CoreError::Unauthenticated => "로그인 후 이용할 수 있습니다.".to_string(),
            CoreError::Busy => "이전 요청을 처리 중입니다.".to_string(),
            CoreError::DatasetError { .. } => "법정동코드 데이터를 불러오지 못했습니다.".to_string(),
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::UpstreamUnavailable { .. } => {
                details = details.with_suggestion(
                    "Check network access to upstream.base_url.".to_string(),
                );
            }
            CoreError::UpstreamStatus { status } => {
                details = details.with_detail(serde_json::json!({ "status": status }));
                details = details.with_suggestion(
                    "Check the filter values; the API rejects malformed dates and codes.".to_string(),
                );
            }
            CoreError::InvalidResponse { message } => {
                details = details.with_detail(serde_json::json!({ "decode_message": message }));
            }
            CoreError::StoreError { .. } => {
                details = details.with_suggestion(
                    "Check store.url, store.api_key and that the table exists.".to_string(),
                );
            }
            CoreError::DatasetError { .. } => {
                details = details.with_suggestion(
                    "Check regions.path points at the legal-dong code CSV.".to_string(),
                );
            }
            _ => {}
        }

        details
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

/// Error context for reporting
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// User identity (if signed in)
    pub user_id: Option<String>,
    /// Operation being performed
    pub operation: String,
}

impl ErrorContext {
    pub fn new(operation: &str) -> Self {
        Self {
            user_id: None,
            operation: operation.to_string(),
        }
    }

    pub fn with_user_id(mut self, user_id: &str) -> Self {
        self.user_id = Some(user_id.to_string());
        self
    }
}

/// Error logger trait
pub trait ErrorLogger {
    fn log_error(&self, error: &CoreError, context: &ErrorContext);
}

/// Default error logger using log crate
#[derive(Default)]
pub struct DefaultErrorLogger;

impl ErrorLogger for DefaultErrorLogger {
    fn log_error(&self, error: &CoreError, context: &ErrorContext) {
        match error.severity() {
            ErrorSeverity::Error => log::error!(
                target: "landwatch::error",
                "[{}] {} - Operation: {} - User: {:?}",
                error.code(),
                error,
                context.operation,
                context.user_id
            ),
            ErrorSeverity::Warning => log::warn!(
                target: "landwatch::error",
                "[{}] {} - Operation: {} - User: {:?}",
                error.code(),
                error,
                context.operation,
                context.user_id
            ),
            ErrorSeverity::Info => log::debug!(
                target: "landwatch::error",
                "[{}] {} - Operation: {}",
                error.code(),
                error,
                context.operation
            ),
        }
    }
}
