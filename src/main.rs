//! SithWash - heuristic AML transaction fraud scoring
//!
//! Demo report: scores a synthetic batch and the fixed dataset patterns,
//! then prints the telemetry summary.

use sithwash::core::enrichment::{generate_enhanced_transactions, generate_real_world_transactions};
use sithwash::utils::format::{format_feature_name, format_feature_value, format_probability};
use sithwash::{AppConfig, ModelSchema, SampleGenerator, ScoringTelemetry, SithEngine};

use eyre::Result;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() -> Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    println!(
        r#"
    ╔══════════════════════════════════════════════════════════════╗
    ║                 🧿  S I T H W A S H                          ║
    ║        Heuristic AML Transaction Fraud Scoring               ║
    ╚══════════════════════════════════════════════════════════════╝
    "#
    );

    let config = AppConfig::from_env()?;
    let schema = ModelSchema::load(config.model_path.as_deref(), config.strict_schema)?;
    let engine = SithEngine::new(Arc::new(schema));
    let telemetry = ScoringTelemetry::new();
    let mut generator = SampleGenerator::from_entropy();

    // Synthetic batch
    let start = Instant::now();
    let batch = generate_enhanced_transactions(
        &engine,
        &mut generator,
        config.sample_count,
        config.fraud_rate,
    );
    telemetry.record_batch(&batch, start.elapsed());

    println!("\n📋 Synthetic transactions ({}):", batch.len());
    for tx in &batch {
        println!("   {}", tx.summary());
    }

    // Fixed dataset patterns
    let start = Instant::now();
    let real_world = generate_real_world_transactions(&engine, &mut generator);
    telemetry.record_batch(&real_world, start.elapsed());

    println!("\n🌍 Real-world patterns:");
    for tx in &real_world {
        println!("\n   {}", tx.summary());
        println!(
            "   Fraud probability: {}",
            format_probability(tx.ml_prediction.probability)
        );
        for line in &tx.ml_prediction.reasoning {
            println!("      {}", line);
        }
        for feature in &tx.ml_prediction.top_features {
            println!("      {:<60} z = {:+.3}", feature.feature, feature.value);
        }

        let raw = engine.extract_features(&tx.features);
        println!("      Raw features:");
        for (name, value) in engine.schema().selected_features.iter().zip(raw) {
            if value != 0.0 {
                println!(
                    "         {:<60} {}",
                    format_feature_name(name),
                    format_feature_value(name, value)
                );
            }
        }
    }

    let stats = telemetry.get_stats();
    println!("{}", stats.summary());
    info!(
        "📊 Scored {} transactions, {} flagged",
        stats.total_analyzed, stats.total_flagged
    );

    Ok(())
}
