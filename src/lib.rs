//! SithWash Library
//!
//! Heuristic fraud scoring for the SithWash AML dashboard:
//! - Feature extraction from sparse per-address transaction attributes
//! - Standardization with a static model schema
//! - Weighted rule ensemble mapped to a probability, confidence and reasoning
//! - Synthetic transactions, telemetry and a JSON API for the dashboard

pub mod api;
pub mod core;
pub mod models;
pub mod utils;

pub use crate::core::{
    FeatureExtractor, FeatureScaler, HeuristicScorer, RiskRule, SampleGenerator, SithEngine,
};
pub use models::{
    AppConfig, AppError, AppResult, Confidence, EnhancedTransaction, ErrorCode,
    FeatureContribution, FraudPrediction, ModelSchema, RiskLevel, SchemaIssue,
    TransactionFeatures,
};
pub use utils::{CacheStats, ScoringTelemetry, TelemetryStats, TransactionCache};
