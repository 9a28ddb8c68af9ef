//! Feature Extraction
//!
//! Maps a sparse [`TransactionFeatures`] record onto the numeric vector the
//! model schema expects. Every schema name is resolved through a fixed table of
//! rules (direct copy, guarded ratio, or hashed token label); names without a
//! rule read as 0. The output always has exactly `schema.len()` entries.

use std::sync::Arc;

use crate::models::schema::ModelSchema;
use crate::models::types::{num, TransactionFeatures};
use crate::utils::constants::TOKEN_HASH_MODULUS;

/// Numeric attribute accessor
type Field = fn(&TransactionFeatures) -> Option<f64>;

/// How one schema feature is computed from the attribute record
#[derive(Clone, Copy)]
pub enum FeatureRule {
    /// Copy an attribute (absent reads as 0)
    Direct(Field),
    /// `numerator / denominator` through [`safe_ratio`]
    Ratio(Field, Field),
    /// Attribute divided by a hashed token label
    RatioToToken(Field, fn(&TransactionFeatures) -> Option<&str>),
    /// Hashed token label via [`encode_token_type`]
    Token(fn(&TransactionFeatures) -> Option<&str>),
}

impl FeatureRule {
    pub fn evaluate(&self, tx: &TransactionFeatures) -> f64 {
        match *self {
            FeatureRule::Direct(field) => num(field(tx)),
            FeatureRule::Ratio(numerator, denominator) => safe_ratio(numerator(tx), denominator(tx)),
            FeatureRule::RatioToToken(numerator, token) => {
                safe_ratio(numerator(tx), Some(encode_token_type(token(tx))))
            }
            FeatureRule::Token(token) => encode_token_type(token(tx)),
        }
    }
}

fn most_sent_token(tx: &TransactionFeatures) -> Option<&str> {
    tx.erc20_most_sent_token_type.as_deref()
}

fn most_rec_token(tx: &TransactionFeatures) -> Option<&str> {
    tx.erc20_most_rec_token_type.as_deref()
}

/// Schema feature name → computation rule.
///
/// "Unnamed: 0" (the training row index) deliberately has no rule.
pub const FEATURE_RULES: &[(&str, FeatureRule)] = &[
    (
        "ERC20 most sent token type",
        FeatureRule::Token(most_sent_token),
    ),
    (
        "avg val received_to_min val sent_ratio",
        FeatureRule::Ratio(|t| t.avg_value_received, |t| t.min_value_sent),
    ),
    (
        "Time Diff between first and last (Mins)",
        FeatureRule::Direct(|t| t.time_diff_between_first_and_last),
    ),
    (
        "max value received_to_min val sent_ratio",
        FeatureRule::Ratio(|t| t.max_value_received, |t| t.min_value_sent),
    ),
    (
        "ERC20 total Ether received_to_ERC20 total ether sent_ratio",
        FeatureRule::Ratio(|t| t.erc20_total_ether_received, |t| t.erc20_total_ether_sent),
    ),
    (
        "ERC20 uniq rec addr",
        FeatureRule::Direct(|t| t.erc20_uniq_rec_addr),
    ),
    (
        "ERC20 total Ether received",
        FeatureRule::Direct(|t| t.erc20_total_ether_received),
    ),
    (
        "Received Tnx_to_Unique Received From Addresses_ratio",
        FeatureRule::Ratio(|t| t.received_tnx, |t| t.unique_received_from_addresses),
    ),
    (
        "Total ERC20 tnxs",
        FeatureRule::Direct(|t| t.total_erc20_tnxs),
    ),
    (
        "ERC20 total Ether received_to_ERC20 most sent token type_ratio",
        FeatureRule::RatioToToken(|t| t.erc20_total_ether_received, most_sent_token),
    ),
    (
        "Received Tnx_to_min val sent_ratio",
        FeatureRule::Ratio(|t| t.received_tnx, |t| t.min_value_sent),
    ),
    (
        "ERC20 uniq rec contract addr",
        FeatureRule::Direct(|t| t.erc20_uniq_rec_contract_addr),
    ),
    (
        "ERC20_most_rec_token_type",
        FeatureRule::Token(most_rec_token),
    ),
    (
        "max value received",
        FeatureRule::Direct(|t| t.max_value_received),
    ),
    (
        "avg val received_to_ERC20 total ether sent_ratio",
        FeatureRule::Ratio(|t| t.avg_value_received, |t| t.erc20_total_ether_sent),
    ),
    (
        "max value received_to_avg val received_ratio",
        FeatureRule::Ratio(|t| t.max_value_received, |t| t.avg_value_received),
    ),
    (
        "Avg min between received tnx_to_Unique Received From Addresses_ratio",
        FeatureRule::Ratio(|t| t.avg_min_between_received_tnx, |t| t.unique_received_from_addresses),
    ),
    (
        "total ether received_to_ERC20 total ether sent_ratio",
        FeatureRule::Ratio(|t| t.total_ether_received, |t| t.erc20_total_ether_sent),
    ),
    (
        "max value received_to_ERC20 min val sent_ratio",
        FeatureRule::Ratio(|t| t.max_value_received, |t| t.min_value_sent),
    ),
];

/// Look up the rule for a schema feature name
pub fn rule_for(feature: &str) -> Option<&'static FeatureRule> {
    FEATURE_RULES
        .iter()
        .find(|(name, _)| *name == feature)
        .map(|(_, rule)| rule)
}

/// Division that never yields NaN or infinity.
///
/// Returns 0 when either operand is absent, the numerator is 0, the
/// denominator is 0, or the quotient is not finite.
pub fn safe_ratio(numerator: Option<f64>, denominator: Option<f64>) -> f64 {
    match (numerator, denominator) {
        (Some(n), Some(d)) if n != 0.0 && d != 0.0 => {
            let ratio = n / d;
            if ratio.is_finite() {
                ratio
            } else {
                0.0
            }
        }
        _ => 0.0,
    }
}

/// Stable integer code for a token label in `[0, 1000)`.
///
/// 32-bit rolling hash over UTF-16 code units (`h = h * 31 + c`, wrapping),
/// absolute value reduced modulo 1000. Absent or empty labels encode as 0.
pub fn encode_token_type(token_type: Option<&str>) -> f64 {
    let token_type = match token_type {
        Some(t) if !t.is_empty() => t,
        _ => return 0.0,
    };

    let hash = token_type.encode_utf16().fold(0i32, |hash, unit| {
        (hash << 5).wrapping_sub(hash).wrapping_add(unit as i32)
    });

    ((hash as i64).abs() % TOKEN_HASH_MODULUS) as f64
}

/// Builds raw feature vectors in schema order
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    schema: Arc<ModelSchema>,
}

impl FeatureExtractor {
    pub fn new(schema: Arc<ModelSchema>) -> Self {
        Self { schema }
    }

    /// Raw (unscaled) feature vector, one entry per schema feature
    pub fn extract(&self, tx: &TransactionFeatures) -> Vec<f64> {
        self.schema
            .selected_features
            .iter()
            .map(|name| rule_for(name).map_or(0.0, |rule| rule.evaluate(tx)))
            .collect()
    }

    /// Schema features that have no extraction rule (always 0)
    pub fn unmapped_features(&self) -> Vec<&str> {
        self.schema
            .selected_features
            .iter()
            .filter(|name| rule_for(name).is_none())
            .map(String::as_str)
            .collect()
    }
}
