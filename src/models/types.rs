//! Type definitions for SithWash
//! Attribute records, predictions and enriched dashboard transactions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-address transaction history attributes.
///
/// Every field is optional. Absent numeric fields are read as `0.0` and
/// absent token labels as the empty string when features are extracted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransactionFeatures {
    // Core transaction features
    pub avg_min_between_sent_tnx: Option<f64>,
    pub avg_min_between_received_tnx: Option<f64>,
    pub time_diff_between_first_and_last: Option<f64>,
    pub sent_tnx: Option<f64>,
    pub received_tnx: Option<f64>,
    pub unique_received_from_addresses: Option<f64>,
    pub unique_sent_to_addresses: Option<f64>,

    // Value features
    pub min_value_received: Option<f64>,
    pub max_value_received: Option<f64>,
    pub avg_value_received: Option<f64>,
    pub min_value_sent: Option<f64>,
    pub max_value_sent: Option<f64>,
    pub avg_value_sent: Option<f64>,

    // ERC20 features
    #[serde(rename = "totalERC20Tnxs")]
    pub total_erc20_tnxs: Option<f64>,
    pub erc20_total_ether_received: Option<f64>,
    pub erc20_total_ether_sent: Option<f64>,
    pub erc20_uniq_rec_addr: Option<f64>,
    pub erc20_uniq_sent_addr: Option<f64>,
    pub erc20_uniq_rec_contract_addr: Option<f64>,
    pub erc20_most_sent_token_type: Option<String>,
    pub erc20_most_rec_token_type: Option<String>,

    // Balance
    pub total_ether_balance: Option<f64>,
    pub total_ether_sent: Option<f64>,
    pub total_ether_received: Option<f64>,
}

impl TransactionFeatures {
    /// Fill the numeric fields the dashboard always displays with explicit zeros.
    ///
    /// Scoring is unaffected: an absent field and a zero field extract identically.
    pub fn with_numeric_defaults(self) -> Self {
        let zero = Some(0.0);
        Self {
            avg_min_between_sent_tnx: self.avg_min_between_sent_tnx.or(zero),
            avg_min_between_received_tnx: self.avg_min_between_received_tnx.or(zero),
            time_diff_between_first_and_last: self.time_diff_between_first_and_last.or(zero),
            sent_tnx: self.sent_tnx.or(zero),
            received_tnx: self.received_tnx.or(zero),
            unique_received_from_addresses: self.unique_received_from_addresses.or(zero),
            unique_sent_to_addresses: self.unique_sent_to_addresses.or(zero),
            total_erc20_tnxs: self.total_erc20_tnxs.or(zero),
            erc20_total_ether_received: self.erc20_total_ether_received.or(zero),
            erc20_total_ether_sent: self.erc20_total_ether_sent.or(zero),
            erc20_uniq_rec_addr: self.erc20_uniq_rec_addr.or(zero),
            erc20_uniq_sent_addr: self.erc20_uniq_sent_addr.or(zero),
            erc20_uniq_rec_contract_addr: self.erc20_uniq_rec_contract_addr.or(zero),
            max_value_received: self.max_value_received.or(zero),
            avg_value_received: self.avg_value_received.or(zero),
            min_value_sent: self.min_value_sent.or(zero),
            ..self
        }
    }
}

/// Read an optional numeric attribute, absent meaning zero.
#[inline]
pub fn num(value: Option<f64>) -> f64 {
    value.unwrap_or(0.0)
}

/// Read an optional categorical attribute, absent meaning empty.
#[inline]
pub fn label(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

/// Confidence band derived from the distance of the probability to 0.5
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn from_probability(probability: f64) -> Self {
        let distance = (probability - 0.5).abs();
        if distance > 0.3 {
            Self::High
        } else if distance > 0.15 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        }
    }
}

/// One ranked entry of the "top contributing features" list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureContribution {
    /// Display name of the feature
    pub feature: String,
    /// Importance weight from the model schema
    pub importance: f64,
    /// Normalized (scaled) value
    pub value: f64,
    /// importance * |value|
    pub contribution: f64,
}

/// Output of the heuristic scorer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FraudPrediction {
    pub is_fraud: bool,
    /// Fraud probability in [0, 1]
    pub probability: f64,
    pub confidence: Confidence,
    /// round(probability * 100)
    pub risk_score: u8,
    /// At most five entries, highest contribution first
    pub top_features: Vec<FeatureContribution>,
    pub reasoning: Vec<String>,
}

/// Four-level dashboard risk label
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// critical: fraud and p > 0.8, high: fraud, medium: p > 0.3, else low
    pub fn from_prediction(prediction: &FraudPrediction) -> Self {
        if prediction.is_fraud {
            if prediction.probability > 0.8 {
                RiskLevel::Critical
            } else {
                RiskLevel::High
            }
        } else if prediction.probability > 0.3 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            RiskLevel::Low => "🟢",
            RiskLevel::Medium => "🟡",
            RiskLevel::High => "🔴",
            RiskLevel::Critical => "💀",
        }
    }

    pub const ALL: [RiskLevel; 4] = [
        RiskLevel::Low,
        RiskLevel::Medium,
        RiskLevel::High,
        RiskLevel::Critical,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Incoming,
    Outgoing,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Confirmed,
    Pending,
    Failed,
}

/// Scored transaction with presentation metadata, as listed on the dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedTransaction {
    pub id: String,
    pub address: String,
    pub timestamp: DateTime<Utc>,
    /// e.g. "12.345678 ETH"
    pub amount: String,
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub tx_type: TransactionType,
    pub status: TransactionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_used: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<String>,
    pub features: TransactionFeatures,
    pub ml_prediction: FraudPrediction,
    pub risk_level: RiskLevel,
    /// Reasoning lines, present only when the transaction is flagged
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flagged_reason: Option<Vec<String>>,
}

impl EnhancedTransaction {
    /// One-line summary for logs and the CLI report
    pub fn summary(&self) -> String {
        format!(
            "{} {:<8} | {} | Risk: {:>3} | Confidence: {:<6} | {}",
            self.risk_level.emoji(),
            self.risk_level.as_str().to_uppercase(),
            self.id,
            self.ml_prediction.risk_score,
            self.ml_prediction.confidence.as_str(),
            self.amount,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prediction(is_fraud: bool, probability: f64) -> FraudPrediction {
        FraudPrediction {
            is_fraud,
            probability,
            confidence: Confidence::from_probability(probability),
            risk_score: (probability * 100.0).round() as u8,
            top_features: vec![],
            reasoning: vec![],
        }
    }

    #[test]
    fn test_confidence_bands() {
        assert_eq!(Confidence::from_probability(0.5), Confidence::Low);
        assert_eq!(Confidence::from_probability(0.64), Confidence::Low);
        assert_eq!(Confidence::from_probability(0.66), Confidence::Medium);
        assert_eq!(Confidence::from_probability(0.79), Confidence::Medium);
        assert_eq!(Confidence::from_probability(0.81), Confidence::High);
        assert_eq!(Confidence::from_probability(0.1), Confidence::High);
    }

    #[test]
    fn test_risk_level_mapping() {
        assert_eq!(RiskLevel::from_prediction(&prediction(true, 0.9)), RiskLevel::Critical);
        assert_eq!(RiskLevel::from_prediction(&prediction(true, 0.8)), RiskLevel::High);
        assert_eq!(RiskLevel::from_prediction(&prediction(true, 0.55)), RiskLevel::High);
        assert_eq!(RiskLevel::from_prediction(&prediction(false, 0.45)), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_prediction(&prediction(false, 0.3)), RiskLevel::Low);
    }

    #[test]
    fn test_risk_level_ordering() {
        assert!(RiskLevel::Low < RiskLevel::Medium);
        assert!(RiskLevel::Medium < RiskLevel::High);
        assert!(RiskLevel::High < RiskLevel::Critical);
    }

    #[test]
    fn test_features_wire_names() {
        let json = r#"{"totalERC20Tnxs": 250, "erc20UniqRecAddr": 45, "erc20MostSentTokenType": "Unknown"}"#;
        let features: TransactionFeatures = serde_json::from_str(json).unwrap();
        assert_eq!(features.total_erc20_tnxs, Some(250.0));
        assert_eq!(features.erc20_uniq_rec_addr, Some(45.0));
        assert_eq!(label(&features.erc20_most_sent_token_type), "Unknown");
        assert_eq!(num(features.max_value_received), 0.0);
    }

    #[test]
    fn test_numeric_defaults_keep_given_values() {
        let features = TransactionFeatures {
            total_erc20_tnxs: Some(80.0),
            ..Default::default()
        }
        .with_numeric_defaults();
        assert_eq!(features.total_erc20_tnxs, Some(80.0));
        assert_eq!(features.sent_tnx, Some(0.0));
        assert_eq!(features.erc20_most_sent_token_type, None);
        assert_eq!(features.total_ether_balance, None);
    }
}
