//! Scoring Telemetry
//!
//! In-process counters over scored transactions: volume, flagged share, risk
//! level distribution and scoring latency. Only aggregates are kept, never
//! addresses or feature values.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::Duration;

use chrono::Utc;

use crate::models::types::{EnhancedTransaction, FraudPrediction, RiskLevel};
use crate::utils::constants::{APP_NAME, TELEMETRY_EXPORT_DIR};

/// Aggregated statistics for reporting
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryStats {
    pub total_analyzed: u64,
    pub total_flagged: u64,
    /// Flagged share in percent
    pub flagged_rate: f64,
    /// Every level is present, zero when unseen
    pub by_risk_level: BTreeMap<String, u64>,
    pub avg_latency_ms: f64,
    /// Unix seconds
    pub period_start: i64,
    pub period_end: i64,
}

impl TelemetryStats {
    pub fn count_for(&self, level: RiskLevel) -> u64 {
        self.by_risk_level.get(level.as_str()).copied().unwrap_or(0)
    }

    /// Boxed text report for the CLI and shutdown log
    pub fn summary(&self) -> String {
        let period_mins = (self.period_end - self.period_start).max(0) / 60;

        format!(
            r#"
╔══════════════════════════════════════════════════════════════════╗
║           🧿 {} - SCORING REPORT
╠══════════════════════════════════════════════════════════════════╣
║   📊 Period: {} minutes
║
║   🔍 Transactions Analyzed:    {:>10}
║   🚨 Flagged as Fraud:         {:>10} ({:.1}%)
║
║   💀 Critical:                 {:>10}
║   🔴 High:                     {:>10}
║   🟡 Medium:                   {:>10}
║   🟢 Low:                      {:>10}
║
║   ⚡ Avg Scoring Latency:      {:>10.3}ms
╚══════════════════════════════════════════════════════════════════╝
"#,
            APP_NAME,
            period_mins,
            self.total_analyzed,
            self.total_flagged,
            self.flagged_rate,
            self.count_for(RiskLevel::Critical),
            self.count_for(RiskLevel::High),
            self.count_for(RiskLevel::Medium),
            self.count_for(RiskLevel::Low),
            self.avg_latency_ms,
        )
    }
}

/// Thread-safe collector shared by the API handlers and the CLI
pub struct ScoringTelemetry {
    total_analyzed: AtomicU64,
    total_flagged: AtomicU64,
    total_latency_us: AtomicU64,
    risk_counts: RwLock<HashMap<RiskLevel, u64>>,
    session_start: i64,
    export_dir: PathBuf,
}

impl ScoringTelemetry {
    pub fn new() -> Self {
        Self::with_export_dir(PathBuf::from(TELEMETRY_EXPORT_DIR))
    }

    pub fn with_export_dir(export_dir: PathBuf) -> Self {
        Self {
            total_analyzed: AtomicU64::new(0),
            total_flagged: AtomicU64::new(0),
            total_latency_us: AtomicU64::new(0),
            risk_counts: RwLock::new(HashMap::new()),
            session_start: Utc::now().timestamp(),
            export_dir,
        }
    }

    /// Record one scored prediction and how long it took
    pub fn record(&self, prediction: &FraudPrediction, latency: Duration) {
        self.record_level(
            RiskLevel::from_prediction(prediction),
            prediction.is_fraud,
            latency,
        );
    }

    /// Record a scored batch; the elapsed time is spread evenly over it
    pub fn record_batch(&self, transactions: &[EnhancedTransaction], elapsed: Duration) {
        if transactions.is_empty() {
            return;
        }
        let per_item = elapsed / transactions.len() as u32;
        for tx in transactions {
            self.record_level(tx.risk_level, tx.ml_prediction.is_fraud, per_item);
        }
    }

    fn record_level(&self, level: RiskLevel, flagged: bool, latency: Duration) {
        self.total_analyzed.fetch_add(1, Ordering::Relaxed);
        if flagged {
            self.total_flagged.fetch_add(1, Ordering::Relaxed);
        }
        self.total_latency_us
            .fetch_add(latency.as_micros() as u64, Ordering::Relaxed);

        if let Ok(mut counts) = self.risk_counts.write() {
            *counts.entry(level).or_insert(0) += 1;
        }
    }

    pub fn get_stats(&self) -> TelemetryStats {
        let total_analyzed = self.total_analyzed.load(Ordering::Relaxed);
        let total_flagged = self.total_flagged.load(Ordering::Relaxed);
        let total_latency_us = self.total_latency_us.load(Ordering::Relaxed);

        let (avg_latency_ms, flagged_rate) = if total_analyzed > 0 {
            (
                total_latency_us as f64 / total_analyzed as f64 / 1000.0,
                total_flagged as f64 / total_analyzed as f64 * 100.0,
            )
        } else {
            (0.0, 0.0)
        };

        let by_risk_level = self
            .risk_counts
            .read()
            .map(|counts| {
                RiskLevel::ALL
                    .iter()
                    .map(|level| {
                        (
                            level.as_str().to_string(),
                            counts.get(level).copied().unwrap_or(0),
                        )
                    })
                    .collect()
            })
            .unwrap_or_default();

        TelemetryStats {
            total_analyzed,
            total_flagged,
            flagged_rate,
            by_risk_level,
            avg_latency_ms,
            period_start: self.session_start,
            period_end: Utc::now().timestamp(),
        }
    }

    /// Write the current stats to `<export_dir>/stats_<unix>.json`
    pub fn export_stats_json(&self) -> Result<PathBuf, std::io::Error> {
        fs::create_dir_all(&self.export_dir)?;

        let stats = self.get_stats();
        let filename = format!("stats_{}.json", stats.period_end);
        let path = self.export_dir.join(filename);

        let json = serde_json::to_string_pretty(&stats)?;
        fs::write(&path, json)?;

        Ok(path)
    }

    pub fn reset(&self) {
        self.total_analyzed.store(0, Ordering::Relaxed);
        self.total_flagged.store(0, Ordering::Relaxed);
        self.total_latency_us.store(0, Ordering::Relaxed);

        if let Ok(mut counts) = self.risk_counts.write() {
            counts.clear();
        }
    }
}

impl Default for ScoringTelemetry {
    fn default() -> Self {
        Self::new()
    }
}
