//! API Request Handlers

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Json, Path, Query, State};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use super::types::*;
use crate::core::enrichment::{
    analyze_transaction, generate_enhanced_transactions, generate_real_world_transactions,
    AnalysisResult,
};
use crate::core::features::rule_for;
use crate::core::sampler::SampleGenerator;
use crate::core::SithEngine;
use crate::models::config::AppConfig;
use crate::models::errors::AppError;
use crate::models::types::{EnhancedTransaction, FraudPrediction, TransactionFeatures};
use crate::utils::cache::TransactionCache;
use crate::utils::constants::{APP_VERSION, CACHE_CLEANUP_INTERVAL_SECS, MAX_SAMPLE_COUNT};
use crate::utils::format::format_feature_name;
use crate::utils::telemetry::ScoringTelemetry;

/// Shared application state
pub struct AppState {
    pub engine: SithEngine,
    pub config: AppConfig,
    pub telemetry: Arc<ScoringTelemetry>,
    pub cache: TransactionCache,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(engine: SithEngine, config: AppConfig, telemetry: Arc<ScoringTelemetry>) -> Self {
        let cache = TransactionCache::new(config.cache_ttl, config.cache_max_entries);
        Self {
            engine,
            config,
            telemetry,
            cache,
            start_time: Instant::now(),
        }
    }

    /// Background task evicting expired cache entries
    pub fn spawn_cache_cleanup(&self) -> JoinHandle<()> {
        let cache = self.cache.clone();
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(Duration::from_secs(CACHE_CLEANUP_INTERVAL_SECS));
            loop {
                interval.tick().await;
                cache.cleanup_expired();
            }
        })
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

fn reject(err: AppError, start: Instant) -> ApiFailure {
    warn!("⚠️ {}", err);
    failure(&err, elapsed_ms(start))
}

// ============================================
// Health Check
// ============================================

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<ApiResponse<HealthData>> {
    let start = Instant::now();
    let schema = state.engine.schema();

    let data = HealthData {
        status: "healthy".to_string(),
        version: APP_VERSION.to_string(),
        uptime_seconds: state.uptime_seconds(),
        model_type: schema.model_type.clone(),
        feature_count: schema.len(),
    };

    Json(ApiResponse::success(data, elapsed_ms(start)))
}

// ============================================
// Model
// ============================================

pub async fn model_info(State(state): State<Arc<AppState>>) -> Json<ApiResponse<ModelInfoData>> {
    let start = Instant::now();
    let schema = state.engine.schema();

    let features = schema
        .selected_features
        .iter()
        .enumerate()
        .map(|(index, name)| ModelFeatureInfo {
            name: name.clone(),
            display_name: format_feature_name(name),
            importance: schema.importance(name),
            mean: schema.mean_at(index),
            scale: schema.scale_at(index),
            mapped: rule_for(name).is_some(),
        })
        .collect();

    let data = ModelInfoData {
        model_type: schema.model_type.clone(),
        feature_count: schema.len(),
        features,
        label_encoders: schema.label_encoders.keys().cloned().collect(),
        issues: schema.validate(),
    };

    Json(ApiResponse::success(data, elapsed_ms(start)))
}

// ============================================
// Scoring
// ============================================

pub async fn predict(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TransactionFeatures>, JsonRejection>,
) -> ApiResult<FraudPrediction> {
    let start = Instant::now();
    let Json(features) =
        payload.map_err(|rejection| reject(AppError::bad_request(rejection.body_text()), start))?;

    let prediction = state.engine.predict_fraud(&features);
    state.telemetry.record(&prediction, start.elapsed());

    if prediction.is_fraud {
        info!(
            "🚨 Flagged record: risk {} ({})",
            prediction.risk_score,
            prediction.confidence.as_str()
        );
    }

    Ok(Json(ApiResponse::success(prediction, elapsed_ms(start))))
}

pub async fn analyze(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TransactionFeatures>, JsonRejection>,
) -> ApiResult<AnalysisResult> {
    let start = Instant::now();
    let Json(features) =
        payload.map_err(|rejection| reject(AppError::bad_request(rejection.body_text()), start))?;

    let mut generator = SampleGenerator::from_entropy();
    let result = analyze_transaction(&state.engine, &mut generator, features);

    state.telemetry.record(&result.ml_prediction, start.elapsed());
    state.cache.insert(result.transaction.clone());

    Ok(Json(ApiResponse::success(result, elapsed_ms(start))))
}

// ============================================
// Transactions
// ============================================

pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    query: Result<Query<TransactionsQuery>, QueryRejection>,
) -> ApiResult<TransactionsData> {
    let start = Instant::now();
    let Query(query) =
        query.map_err(|rejection| reject(AppError::bad_request(rejection.body_text()), start))?;

    let count = query.count.unwrap_or(state.config.sample_count);
    if count == 0 || count > MAX_SAMPLE_COUNT {
        return Err(reject(
            AppError::bad_request(format!(
                "count must be between 1 and {}, got {}",
                MAX_SAMPLE_COUNT, count
            )),
            start,
        ));
    }

    let mut generator = SampleGenerator::from_entropy();
    let transactions = generate_enhanced_transactions(
        &state.engine,
        &mut generator,
        count,
        state.config.fraud_rate,
    );

    state.telemetry.record_batch(&transactions, start.elapsed());
    state.cache.insert_many(&transactions);

    Ok(Json(ApiResponse::success(
        TransactionsData::new(transactions),
        elapsed_ms(start),
    )))
}

pub async fn real_world_transactions(
    State(state): State<Arc<AppState>>,
) -> Json<ApiResponse<TransactionsData>> {
    let start = Instant::now();

    let mut generator = SampleGenerator::from_entropy();
    let transactions = generate_real_world_transactions(&state.engine, &mut generator);

    state.telemetry.record_batch(&transactions, start.elapsed());
    state.cache.insert_many(&transactions);

    Json(ApiResponse::success(
        TransactionsData::new(transactions),
        elapsed_ms(start),
    ))
}

pub async fn get_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<EnhancedTransaction> {
    let start = Instant::now();

    match state.cache.get(&id) {
        Some(transaction) => Ok(Json(ApiResponse::success(transaction, elapsed_ms(start)))),
        None => Err(reject(
            AppError::not_found(format!("Transaction {} not found or expired", id)),
            start,
        )),
    }
}

pub async fn sample(
    query: Result<Query<SampleQuery>, QueryRejection>,
) -> ApiResult<TransactionFeatures> {
    let start = Instant::now();
    let Query(query) =
        query.map_err(|rejection| reject(AppError::bad_request(rejection.body_text()), start))?;

    let features = SampleGenerator::from_entropy().generate_sample_transaction(query.fraudulent);

    Ok(Json(ApiResponse::success(features, elapsed_ms(start))))
}

// ============================================
// Stats
// ============================================

pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<ApiResponse<StatsData>> {
    let start = Instant::now();

    let data = StatsData {
        telemetry: state.telemetry.get_stats(),
        cache: state.cache.stats(),
        uptime_seconds: state.uptime_seconds(),
        api_version: APP_VERSION.to_string(),
    };

    Json(ApiResponse::success(data, elapsed_ms(start)))
}
