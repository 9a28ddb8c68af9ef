//! Heuristic Fraud Scorer
//!
//! Explicit rule ensemble shaped like a classifier's output. Nothing here is
//! learned from data: a fixed table of weighted risk rules is evaluated on the
//! attribute record, a small term from the scaled feature vector is added, and
//! the sum is mapped to a probability with a logistic curve.
//!
//! Scoring Algorithm:
//! 1. Sum the weights of every tripped [`RiskRule`]
//! 2. Add `0.1 * mean(|scaled feature|)`
//! 3. `p = 1 / (1 + e^(-4 * (score - 0.5)))`, clamped to [0, 1]
//! 4. Confidence band from `|p - 0.5|`
//! 5. Top-5 features by `importance * |scaled value|`
//! 6. Reasoning: severity line, one line per tripped rule, primary factor

use std::cmp::Ordering;
use std::sync::Arc;
use tracing::debug;

use crate::models::schema::ModelSchema;
use crate::models::types::{
    label, num, Confidence, FeatureContribution, FraudPrediction, TransactionFeatures,
};
use crate::utils::constants::{SUSPICIOUS_TOKEN_TYPES, TOP_FEATURE_COUNT};
use crate::utils::format::format_feature_name;

use super::features::safe_ratio;

// ============================================
// RULE WEIGHTS
// ============================================

/// Weight added when a rule trips
pub mod rule_weights {
    pub const HIGH_ERC20_ACTIVITY: f64 = 0.30;
    pub const UNUSUAL_VALUE_PATTERNS: f64 = 0.25;
    pub const HIGH_ADDRESS_DIVERSITY: f64 = 0.20;
    pub const SUSPICIOUS_TOKEN_TYPES: f64 = 0.15;
    pub const LONG_TIME_SPAN: f64 = 0.10;
}

/// Strict lower bounds for each rule
pub mod rule_thresholds {
    /// Total ERC20 transactions
    pub const ERC20_TNX_COUNT: f64 = 100.0;
    /// max value received / avg value received
    pub const MAX_TO_AVG_RECEIVED: f64 = 50.0;
    /// Unique ERC20 receiving addresses
    pub const ERC20_UNIQ_REC_ADDR: f64 = 20.0;
    /// Minutes between first and last transaction
    pub const TIME_SPAN_MINS: f64 = 100_000.0;
}

/// Logistic combination parameters
pub mod logistic {
    pub const CENTER: f64 = 0.5;
    pub const STEEPNESS: f64 = 4.0;
    /// Multiplier on the mean absolute scaled feature value
    pub const FEATURE_DEVIATION_WEIGHT: f64 = 0.1;
    /// Probability above which a record is flagged
    pub const FRAUD_THRESHOLD: f64 = 0.5;
}

// ============================================
// RULE TABLE
// ============================================

/// One weighted boolean check over the attribute record
#[derive(Clone, Copy)]
pub struct RiskRule {
    pub name: &'static str,
    pub weight: f64,
    pub check: fn(&TransactionFeatures) -> bool,
    /// Reasoning bullet shown when the rule trips
    pub explain: fn(&TransactionFeatures) -> String,
}

impl std::fmt::Debug for RiskRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RiskRule")
            .field("name", &self.name)
            .field("weight", &self.weight)
            .finish()
    }
}

fn max_to_avg_received(tx: &TransactionFeatures) -> f64 {
    safe_ratio(tx.max_value_received, tx.avg_value_received)
}

fn is_suspicious_token(token: &str) -> bool {
    SUSPICIOUS_TOKEN_TYPES.contains(&token)
}

fn token_display(token: &str) -> &str {
    if token.is_empty() {
        "unspecified"
    } else {
        token
    }
}

/// Default rule table; reasoning bullets follow this order
pub const RISK_RULES: [RiskRule; 5] = [
    RiskRule {
        name: "High ERC20 activity",
        weight: rule_weights::HIGH_ERC20_ACTIVITY,
        check: |tx| num(tx.total_erc20_tnxs) > rule_thresholds::ERC20_TNX_COUNT,
        explain: |tx| {
            format!(
                "• Unusually high ERC20 activity ({} transactions)",
                num(tx.total_erc20_tnxs)
            )
        },
    },
    RiskRule {
        name: "High address diversity",
        weight: rule_weights::HIGH_ADDRESS_DIVERSITY,
        check: |tx| num(tx.erc20_uniq_rec_addr) > rule_thresholds::ERC20_UNIQ_REC_ADDR,
        explain: |tx| {
            format!(
                "• High address diversity ({} unique recipients)",
                num(tx.erc20_uniq_rec_addr)
            )
        },
    },
    RiskRule {
        name: "Unusual value patterns",
        weight: rule_weights::UNUSUAL_VALUE_PATTERNS,
        check: |tx| max_to_avg_received(tx) > rule_thresholds::MAX_TO_AVG_RECEIVED,
        explain: |tx| {
            format!(
                "• Extreme value variance (max {:.1}x larger than average)",
                max_to_avg_received(tx)
            )
        },
    },
    RiskRule {
        name: "Suspicious token types",
        weight: rule_weights::SUSPICIOUS_TOKEN_TYPES,
        check: |tx| {
            is_suspicious_token(label(&tx.erc20_most_sent_token_type))
                || is_suspicious_token(label(&tx.erc20_most_rec_token_type))
        },
        explain: |tx| {
            format!(
                "• Suspicious token types (most sent: {}, most received: {})",
                token_display(label(&tx.erc20_most_sent_token_type)),
                token_display(label(&tx.erc20_most_rec_token_type))
            )
        },
    },
    RiskRule {
        name: "Long time span",
        weight: rule_weights::LONG_TIME_SPAN,
        check: |tx| num(tx.time_diff_between_first_and_last) > rule_thresholds::TIME_SPAN_MINS,
        explain: |tx| {
            format!(
                "• Long activity span ({:.0} minutes between first and last transaction)",
                num(tx.time_diff_between_first_and_last)
            )
        },
    },
];

/// `1 / (1 + e^(-k (score - c)))`, clamped to [0, 1]
pub fn logistic_probability(score: f64) -> f64 {
    let probability = 1.0 / (1.0 + (-logistic::STEEPNESS * (score - logistic::CENTER)).exp());
    if probability.is_nan() {
        return 0.0;
    }
    probability.clamp(0.0, 1.0)
}

/// Mean of absolute values, 0 for an empty vector
pub fn mean_abs(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().map(|v| v.abs()).sum::<f64>() / values.len() as f64
}

fn severity_line(probability: f64) -> &'static str {
    if probability > 0.7 {
        "🚨 HIGH FRAUD RISK: Multiple suspicious patterns detected"
    } else if probability > 0.5 {
        "⚠️ MODERATE FRAUD RISK: Some concerning indicators present"
    } else if probability > 0.3 {
        "⚡ LOW FRAUD RISK: Few suspicious indicators detected"
    } else {
        "✅ VERY LOW FRAUD RISK: Transaction appears legitimate"
    }
}

// ============================================
// SCORER
// ============================================

/// Rule-ensemble scorer over a shared model schema
#[derive(Debug, Clone)]
pub struct HeuristicScorer {
    schema: Arc<ModelSchema>,
    rules: Vec<RiskRule>,
}

impl HeuristicScorer {
    /// Scorer with the default rule table
    pub fn new(schema: Arc<ModelSchema>) -> Self {
        Self::with_rules(schema, RISK_RULES.to_vec())
    }

    /// Scorer with a custom rule table
    pub fn with_rules(schema: Arc<ModelSchema>, rules: Vec<RiskRule>) -> Self {
        Self { schema, rules }
    }

    /// Rules that trip for this record, in table order
    pub fn tripped_rules(&self, tx: &TransactionFeatures) -> Vec<&RiskRule> {
        self.rules.iter().filter(|rule| (rule.check)(tx)).collect()
    }

    /// Produce the full prediction for a scaled vector and its source record
    pub fn score(&self, scaled: &[f64], tx: &TransactionFeatures) -> FraudPrediction {
        let tripped = self.tripped_rules(tx);
        let rule_score: f64 = tripped.iter().map(|rule| rule.weight).sum();
        let deviation = mean_abs(scaled);
        let raw_score = rule_score + logistic::FEATURE_DEVIATION_WEIGHT * deviation;

        let probability = logistic_probability(raw_score);
        let is_fraud = probability > logistic::FRAUD_THRESHOLD;
        let risk_score = (probability * 100.0).round() as u8;
        let confidence = Confidence::from_probability(probability);

        let top_features = self.top_contributing_features(scaled);
        let reasoning = self.generate_reasoning(tx, &tripped, &top_features, probability);

        debug!(
            "🧮 Fraud score: p={:.3} (rules {:.2} from {} tripped, deviation {:.3})",
            probability,
            rule_score,
            tripped.len(),
            deviation
        );

        FraudPrediction {
            is_fraud,
            probability,
            confidence,
            risk_score,
            top_features,
            reasoning,
        }
    }

    /// Rank schema features by `importance * |scaled value|`, keep the top five
    pub fn top_contributing_features(&self, scaled: &[f64]) -> Vec<FeatureContribution> {
        let mut contributions: Vec<FeatureContribution> = self
            .schema
            .selected_features
            .iter()
            .enumerate()
            .map(|(index, name)| {
                let importance = self.schema.importance(name);
                let value = scaled.get(index).copied().unwrap_or(0.0);
                FeatureContribution {
                    feature: format_feature_name(name),
                    importance,
                    value,
                    contribution: importance * value.abs(),
                }
            })
            .collect();

        // Stable: ties keep schema order
        contributions.sort_by(|a, b| {
            b.contribution
                .partial_cmp(&a.contribution)
                .unwrap_or(Ordering::Equal)
        });
        contributions.truncate(TOP_FEATURE_COUNT);
        contributions
    }

    fn generate_reasoning(
        &self,
        tx: &TransactionFeatures,
        tripped: &[&RiskRule],
        top_features: &[FeatureContribution],
        probability: f64,
    ) -> Vec<String> {
        let mut reasoning = vec![severity_line(probability).to_string()];

        reasoning.extend(tripped.iter().map(|rule| (rule.explain)(tx)));

        if let Some(top) = top_features.first() {
            reasoning.push(format!("• Primary risk factor: {}", top.feature));
        }

        reasoning
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer() -> HeuristicScorer {
        HeuristicScorer::new(Arc::new(ModelSchema::builtin().unwrap()))
    }

    fn laundering_pattern() -> TransactionFeatures {
        TransactionFeatures {
            total_erc20_tnxs: Some(250.0),
            erc20_uniq_rec_addr: Some(45.0),
            max_value_received: Some(50000.0),
            avg_value_received: Some(850.0),
            erc20_most_sent_token_type: Some("USDT".to_string()),
            erc20_most_rec_token_type: Some("Ethereum".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_logistic_midpoint_and_bounds() {
        assert!((logistic_probability(0.5) - 0.5).abs() < 1e-12);
        assert!(logistic_probability(10.0) <= 1.0);
        assert!(logistic_probability(-10.0) >= 0.0);
        assert!(logistic_probability(0.9) > logistic_probability(0.6));
    }

    #[test]
    fn test_mean_abs() {
        assert_eq!(mean_abs(&[]), 0.0);
        assert_eq!(mean_abs(&[-1.0, 3.0]), 2.0);
    }

    #[test]
    fn test_rule_table_weights() {
        let total: f64 = RISK_RULES.iter().map(|r| r.weight).sum();
        assert!((total - 1.0).abs() < 1e-12);
        assert_eq!(RISK_RULES[0].name, "High ERC20 activity");
    }

    #[test]
    fn test_rules_are_strict_thresholds() {
        let scorer = scorer();
        let at_threshold = TransactionFeatures {
            total_erc20_tnxs: Some(100.0),
            erc20_uniq_rec_addr: Some(20.0),
            time_diff_between_first_and_last: Some(100_000.0),
            max_value_received: Some(5000.0),
            avg_value_received: Some(100.0),
            erc20_most_sent_token_type: Some("USDT".to_string()),
            erc20_most_rec_token_type: Some("USDC".to_string()),
            ..Default::default()
        };
        assert!(scorer.tripped_rules(&at_threshold).is_empty());
    }

    #[test]
    fn test_suspicious_tokens_either_side() {
        let scorer = scorer();
        let tx = TransactionFeatures {
            erc20_most_sent_token_type: Some("USDT".to_string()),
            erc20_most_rec_token_type: Some("None".to_string()),
            ..Default::default()
        };
        let names: Vec<_> = scorer.tripped_rules(&tx).iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Suspicious token types"]);

        // Absent labels read as empty, which is suspicious
        let names: Vec<_> = scorer
            .tripped_rules(&TransactionFeatures::default())
            .iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["Suspicious token types"]);
    }

    #[test]
    fn test_laundering_pattern_reasoning() {
        let scorer = scorer();
        let tx = laundering_pattern();
        let scaled = vec![0.0; 20];
        let prediction = scorer.score(&scaled, &tx);

        // 0.30 + 0.20 + 0.25 = 0.75 -> p = 1 / (1 + e^-1)
        assert!((prediction.probability - 0.731_058_578_6).abs() < 1e-6);
        assert!(prediction.is_fraud);
        assert_eq!(prediction.risk_score, 73);
        assert_eq!(prediction.confidence, Confidence::Medium);

        assert_eq!(
            prediction.reasoning[0],
            "🚨 HIGH FRAUD RISK: Multiple suspicious patterns detected"
        );
        assert_eq!(
            prediction.reasoning[1],
            "• Unusually high ERC20 activity (250 transactions)"
        );
        assert_eq!(
            prediction.reasoning[2],
            "• High address diversity (45 unique recipients)"
        );
        assert_eq!(
            prediction.reasoning[3],
            "• Extreme value variance (max 58.8x larger than average)"
        );
        assert!(prediction.reasoning[4].starts_with("• Primary risk factor: "));
        assert_eq!(prediction.reasoning.len(), 5);
    }

    #[test]
    fn test_top_features_sorted_and_limited() {
        let scorer = scorer();
        let mut scaled = vec![0.0; 20];
        scaled[3] = -4.0; // Time Diff (importance 0.0964)
        scaled[9] = 2.0; // Total ERC20 tnxs (importance 0.0836)
        scaled[0] = 1.0; // Unnamed: 0 (importance 0.0412)

        let top = scorer.top_contributing_features(&scaled);
        assert_eq!(top.len(), 5);
        assert_eq!(top[0].feature, "Time Diff Between First And Last (Mins)");
        assert_eq!(top[0].value, -4.0);
        assert!((top[0].contribution - 0.3856).abs() < 1e-9);
        assert_eq!(top[1].feature, "Total ERC20 Transactions");
        assert_eq!(top[2].feature, "Unnamed: 0");
        assert!(top.windows(2).all(|w| w[0].contribution >= w[1].contribution));
    }

    #[test]
    fn test_custom_rule_table() {
        let schema = Arc::new(ModelSchema::builtin().unwrap());
        let always = RiskRule {
            name: "Always",
            weight: 1.0,
            check: |_| true,
            explain: |_| "• Always trips".to_string(),
        };
        let scorer = HeuristicScorer::with_rules(schema, vec![always]);
        let prediction = scorer.score(&[0.0; 20], &TransactionFeatures::default());

        assert!(prediction.is_fraud);
        assert_eq!(prediction.reasoning[1], "• Always trips");
    }

    #[test]
    fn test_empty_schema_scores_without_features() {
        let schema = ModelSchema::from_json_str(
            r#"{"selected_features": [], "feature_importances": {}, "scaler_mean": [], "scaler_scale": []}"#,
        )
        .unwrap();
        let scorer = HeuristicScorer::new(Arc::new(schema));
        let prediction = scorer.score(&[], &laundering_pattern());

        assert!(prediction.top_features.is_empty());
        assert!(prediction.probability.is_finite());
        assert!(!prediction.reasoning.iter().any(|r| r.contains("Primary risk factor")));
    }
}
