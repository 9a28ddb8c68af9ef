//! Transaction Enrichment
//!
//! Wraps scored attribute records into dashboard transactions: synthetic
//! batches, single ad-hoc analyses and the three fixed dataset patterns.

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::models::types::{
    EnhancedTransaction, FraudPrediction, RiskLevel, TransactionFeatures, TransactionStatus,
    TransactionType,
};

use super::engine::SithEngine;
use super::sampler::SampleGenerator;

/// Result of analysing one caller-supplied record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub transaction: EnhancedTransaction,
    pub ml_prediction: FraudPrediction,
}

fn flagged_reason(prediction: &FraudPrediction) -> Option<Vec<String>> {
    prediction.is_fraud.then(|| prediction.reasoning.clone())
}

/// Highest risk level first, newest first within a level
pub fn sort_by_risk(transactions: &mut [EnhancedTransaction]) {
    transactions.sort_by(|a, b| {
        b.risk_level
            .cmp(&a.risk_level)
            .then_with(|| b.timestamp.cmp(&a.timestamp))
    });
}

/// Score `count` synthetic records, each fraudulent with probability `fraud_rate`
pub fn generate_enhanced_transactions<R: Rng>(
    engine: &SithEngine,
    generator: &mut SampleGenerator<R>,
    count: usize,
    fraud_rate: f64,
) -> Vec<EnhancedTransaction> {
    let now = Utc::now();

    let mut transactions: Vec<EnhancedTransaction> = (0..count)
        .map(|index| {
            let should_be_fraudulent = generator.chance(fraud_rate);
            let features = generator.generate_sample_transaction(should_be_fraudulent);
            let prediction = engine.predict_fraud(&features);

            EnhancedTransaction {
                id: generator.transaction_id(index),
                address: generator.random_address(),
                timestamp: generator.timestamp_before(now),
                amount: generator.transaction_amount(),
                from: generator.random_address(),
                to: generator.random_address(),
                tx_type: generator.transaction_type(),
                status: generator.transaction_status(),
                gas_used: Some(generator.gas_used()),
                gas_price: Some(generator.gas_price()),
                features,
                risk_level: RiskLevel::from_prediction(&prediction),
                flagged_reason: flagged_reason(&prediction),
                ml_prediction: prediction,
            }
        })
        .collect();

    sort_by_risk(&mut transactions);

    let flagged = transactions.iter().filter(|t| t.ml_prediction.is_fraud).count();
    info!("🧪 Generated {} synthetic transactions ({} flagged)", count, flagged);

    transactions
}

/// Score a partial record; absent numeric attributes are filled with 0
pub fn analyze_transaction<R: Rng>(
    engine: &SithEngine,
    generator: &mut SampleGenerator<R>,
    partial: TransactionFeatures,
) -> AnalysisResult {
    let features = partial.with_numeric_defaults();
    let prediction = engine.predict_fraud(&features);

    let transaction = EnhancedTransaction {
        id: generator.single_transaction_id(),
        address: generator.random_address(),
        timestamp: Utc::now(),
        amount: generator.transaction_amount(),
        from: generator.random_address(),
        to: generator.random_address(),
        tx_type: TransactionType::Incoming,
        status: TransactionStatus::Confirmed,
        gas_used: None,
        gas_price: None,
        features,
        risk_level: RiskLevel::from_prediction(&prediction),
        flagged_reason: flagged_reason(&prediction),
        ml_prediction: prediction.clone(),
    };

    AnalysisResult {
        transaction,
        ml_prediction: prediction,
    }
}

/// Fixed patterns taken from the labelled dataset: laundering, unusual, normal
pub fn real_world_patterns() -> [TransactionFeatures; 3] {
    let pattern = |tnxs, rec_addr, received, sent, max, avg, token: &str, span| TransactionFeatures {
        total_erc20_tnxs: Some(tnxs),
        erc20_uniq_rec_addr: Some(rec_addr),
        erc20_total_ether_received: Some(received),
        erc20_total_ether_sent: Some(sent),
        max_value_received: Some(max),
        avg_value_received: Some(avg),
        erc20_most_sent_token_type: Some(token.to_string()),
        time_diff_between_first_and_last: Some(span),
        ..Default::default()
    };

    [
        pattern(250.0, 45.0, 890_000.0, 920_000.0, 50_000.0, 850.0, "Unknown", 450_000.0),
        pattern(80.0, 15.0, 120_000.0, 125_000.0, 8_000.0, 340.0, "USDT", 85_000.0),
        pattern(25.0, 5.0, 45_000.0, 47_000.0, 2_000.0, 180.0, "Ethereum", 28_000.0),
    ]
}

/// Analyse the fixed patterns; ids become `real_<n>_<id>` and addresses
/// start with the zero-padded pattern index
pub fn generate_real_world_transactions<R: Rng>(
    engine: &SithEngine,
    generator: &mut SampleGenerator<R>,
) -> Vec<EnhancedTransaction> {
    real_world_patterns()
        .into_iter()
        .enumerate()
        .map(|(index, pattern)| {
            let mut transaction = analyze_transaction(engine, generator, pattern).transaction;
            transaction.id = format!("real_{}_{}", index + 1, transaction.id);
            transaction.address = format!("0x{:04}{}", index, &transaction.address[6..]);
            transaction
        })
        .collect()
}
