//! API Request/Response Types

use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::models::errors::AppError;
use crate::models::schema::SchemaIssue;
use crate::models::types::EnhancedTransaction;
use crate::utils::cache::CacheStats;
use crate::utils::telemetry::TelemetryStats;

/// API Response wrapper
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
    pub latency_ms: f64,
    pub timestamp: i64,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T, latency_ms: f64) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            latency_ms,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

impl ApiResponse<()> {
    pub fn error(error: ApiError, latency_ms: f64) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
            latency_ms,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

/// Error half of every fallible handler
pub type ApiFailure = (StatusCode, Json<ApiResponse<()>>);

/// Handler result: enveloped data or an enveloped error with its status
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiFailure>;

/// Convert an application error into a status code and error envelope
pub fn failure(err: &AppError, latency_ms: f64) -> ApiFailure {
    let status =
        StatusCode::from_u16(err.code.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ApiResponse::error(ApiError::from(err), latency_ms)))
}

/// API Error
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl From<&AppError> for ApiError {
    fn from(err: &AppError) -> Self {
        Self {
            code: err.code_str().to_string(),
            message: err.message.clone(),
            details: err.source.as_ref().map(|source| source.to_string()),
        }
    }
}

// ============================================
// Queries
// ============================================

#[derive(Debug, Default, Deserialize)]
pub struct TransactionsQuery {
    /// Batch size, defaults to the configured sample count
    pub count: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SampleQuery {
    #[serde(default)]
    pub fraudulent: bool,
}

// ============================================
// Model
// ============================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelFeatureInfo {
    pub name: String,
    pub display_name: String,
    pub importance: f64,
    pub mean: f64,
    pub scale: f64,
    /// False for names that always extract as 0
    pub mapped: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfoData {
    pub model_type: String,
    pub feature_count: usize,
    pub features: Vec<ModelFeatureInfo>,
    pub label_encoders: Vec<String>,
    pub issues: Vec<SchemaIssue>,
}

// ============================================
// Transactions
// ============================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionsData {
    pub count: usize,
    pub flagged: usize,
    pub transactions: Vec<EnhancedTransaction>,
}

impl TransactionsData {
    pub fn new(transactions: Vec<EnhancedTransaction>) -> Self {
        Self {
            count: transactions.len(),
            flagged: transactions
                .iter()
                .filter(|t| t.ml_prediction.is_fraud)
                .count(),
            transactions,
        }
    }
}

// ============================================
// Stats / Telemetry
// ============================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsData {
    pub telemetry: TelemetryStats,
    pub cache: CacheStats,
    pub uptime_seconds: u64,
    pub api_version: String,
}

// ============================================
// Health Check
// ============================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthData {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub model_type: String,
    pub feature_count: usize,
}
