//! Scoring Engine
//!
//! Facade wiring extraction, scaling and scoring over one shared schema.
//! Cheap to clone; every component holds the same `Arc<ModelSchema>`.

use std::sync::Arc;
use tracing::debug;

use crate::models::schema::ModelSchema;
use crate::models::types::{FraudPrediction, TransactionFeatures};

use super::features::FeatureExtractor;
use super::scaler::FeatureScaler;
use super::scorer::HeuristicScorer;

#[derive(Debug, Clone)]
pub struct SithEngine {
    schema: Arc<ModelSchema>,
    extractor: FeatureExtractor,
    scaler: FeatureScaler,
    scorer: HeuristicScorer,
}

impl SithEngine {
    pub fn new(schema: Arc<ModelSchema>) -> Self {
        Self {
            extractor: FeatureExtractor::new(Arc::clone(&schema)),
            scaler: FeatureScaler::new(Arc::clone(&schema)),
            scorer: HeuristicScorer::new(Arc::clone(&schema)),
            schema,
        }
    }

    pub fn schema(&self) -> &ModelSchema {
        &self.schema
    }

    /// Raw feature vector in schema order
    pub fn extract_features(&self, tx: &TransactionFeatures) -> Vec<f64> {
        self.extractor.extract(tx)
    }

    /// Standardized feature vector
    pub fn scale_features(&self, features: &[f64]) -> Vec<f64> {
        self.scaler.scale(features)
    }

    /// Score one attribute record. Pure: same input, same prediction.
    pub fn predict_fraud(&self, tx: &TransactionFeatures) -> FraudPrediction {
        let raw = self.extract_features(tx);
        let scaled = self.scale_features(&raw);
        let prediction = self.scorer.score(&scaled, tx);

        debug!(
            "🔍 Prediction: fraud={} risk={} confidence={}",
            prediction.is_fraud,
            prediction.risk_score,
            prediction.confidence.as_str()
        );

        prediction
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::types::Confidence;

    fn engine() -> SithEngine {
        SithEngine::new(Arc::new(ModelSchema::builtin().unwrap()))
    }

    #[test]
    fn test_high_risk_record() {
        let tx = TransactionFeatures {
            total_erc20_tnxs: Some(250.0),
            erc20_uniq_rec_addr: Some(45.0),
            max_value_received: Some(50000.0),
            avg_value_received: Some(850.0),
            ..Default::default()
        };
        let prediction = engine().predict_fraud(&tx);

        assert!(prediction.is_fraud);
        assert!(prediction.probability > 0.8);
        assert!(prediction.risk_score > 80);
        assert_eq!(prediction.confidence, Confidence::High);
        assert!(prediction.reasoning[0].starts_with("🚨 HIGH FRAUD RISK"));
        assert!(prediction
            .reasoning
            .contains(&"• Unusually high ERC20 activity (250 transactions)".to_string()));
    }

    #[test]
    fn test_empty_record_is_low_risk() {
        let prediction = engine().predict_fraud(&TransactionFeatures::default());

        assert!(!prediction.is_fraud);
        assert!(prediction.risk_score < 50);
        assert!(prediction.probability > 0.0 && prediction.probability < 0.3);
        assert_eq!(
            prediction.reasoning[0],
            "✅ VERY LOW FRAUD RISK: Transaction appears legitimate"
        );
        assert_eq!(prediction.top_features.len(), 5);
    }

    #[test]
    fn test_prediction_is_deterministic() {
        let engine = engine();
        let tx = TransactionFeatures {
            total_erc20_tnxs: Some(80.0),
            erc20_most_sent_token_type: Some("USDT".to_string()),
            erc20_most_rec_token_type: Some("USDC".to_string()),
            ..Default::default()
        };
        assert_eq!(engine.predict_fraud(&tx), engine.predict_fraud(&tx));
    }

    #[test]
    fn test_vectors_follow_schema_length() {
        let engine = engine();
        let raw = engine.extract_features(&TransactionFeatures::default());
        assert_eq!(raw.len(), engine.schema().len());
        assert_eq!(engine.scale_features(&raw).len(), raw.len());
    }
}
