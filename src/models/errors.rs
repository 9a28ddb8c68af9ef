//! Centralized Error Handling Module
//!
//! Every failure carries a unique error code so logs and API responses
//! can be matched without parsing messages.
//!
//! Error codes follow pattern: CATEGORY_SPECIFIC_ERROR
//! - SCHEMA_xxx: Model schema loading errors
//! - CFG_xxx: Configuration errors
//! - API_xxx: API errors
//!
//! The scoring path never produces an `AppError`; only schema loading,
//! configuration and the HTTP surface do.

use std::fmt;

/// Application-wide error type
#[derive(Debug)]
pub struct AppError {
    /// Unique error code for logging/monitoring
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Optional underlying error
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new AppError
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Create AppError with source error
    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Get error code as string (for logging)
    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Unique error codes for monitoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // ============================================
    // Schema Errors (1xx)
    // ============================================
    /// Schema file could not be read
    SchemaReadFailed,
    /// Schema JSON is malformed or missing fields
    SchemaParseFailed,
    /// Feature list, importances and scaler arrays disagree (strict mode only)
    SchemaMisaligned,

    // ============================================
    // Configuration Errors (2xx)
    // ============================================
    /// Invalid configuration value
    ConfigInvalidValue,

    // ============================================
    // API Errors (3xx)
    // ============================================
    /// Invalid request format
    ApiBadRequest,
    /// Resource not found
    ApiNotFound,

    // ============================================
    // Generic Errors (9xx)
    // ============================================
    /// Unknown error
    Unknown,
}

impl ErrorCode {
    /// Get string representation of error code
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SchemaReadFailed => "SCHEMA_READ_FAILED",
            Self::SchemaParseFailed => "SCHEMA_PARSE_FAILED",
            Self::SchemaMisaligned => "SCHEMA_MISALIGNED",

            Self::ConfigInvalidValue => "CFG_INVALID_VALUE",

            Self::ApiBadRequest => "API_BAD_REQUEST",
            Self::ApiNotFound => "API_NOT_FOUND",

            Self::Unknown => "UNKNOWN_ERROR",
        }
    }

    /// Get HTTP status code for API responses
    pub fn http_status(&self) -> u16 {
        match self {
            Self::ApiBadRequest | Self::ConfigInvalidValue => 400,
            Self::ApiNotFound => 404,
            _ => 500,
        }
    }
}

// ============================================
// Convenience constructors
// ============================================

impl AppError {
    /// Schema failed alignment validation
    pub fn schema_misaligned(issue_count: usize) -> Self {
        Self::new(
            ErrorCode::SchemaMisaligned,
            format!("Model schema has {} alignment issue(s)", issue_count),
        )
    }

    /// Invalid configuration value for an environment variable
    pub fn invalid_config(key: &str, value: &str) -> Self {
        Self::new(
            ErrorCode::ConfigInvalidValue,
            format!("Invalid value for {}: {:?}", key, value),
        )
    }

    /// API bad request
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ApiBadRequest, msg)
    }

    /// API resource not found
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ApiNotFound, msg)
    }
}

// ============================================
// Result type alias
// ============================================

/// Application Result type
pub type AppResult<T> = Result<T, AppError>;

// ============================================
// Conversion from common error types
// ============================================

impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        Self::new(ErrorCode::Unknown, err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorCode::SchemaReadFailed, "IO error", err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(ErrorCode::SchemaParseFailed, "JSON parse error", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = AppError::schema_misaligned(3);
        assert_eq!(err.code, ErrorCode::SchemaMisaligned);
        assert_eq!(err.code_str(), "SCHEMA_MISALIGNED");
        assert!(err.to_string().contains("3 alignment issue"));
    }

    #[test]
    fn test_http_status() {
        assert_eq!(ErrorCode::ApiBadRequest.http_status(), 400);
        assert_eq!(ErrorCode::ApiNotFound.http_status(), 404);
        assert_eq!(ErrorCode::SchemaParseFailed.http_status(), 500);
    }

    #[test]
    fn test_json_error_keeps_source() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: AppError = json_err.into();
        assert_eq!(err.code, ErrorCode::SchemaParseFailed);
        assert!(std::error::Error::source(&err).is_some());
    }
}
