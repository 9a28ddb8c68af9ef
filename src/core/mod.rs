//! Core Module - Scoring Pipeline
//!
//! Feature extraction, scaling and heuristic scoring, plus the synthetic
//! data used to populate the dashboard.

pub mod engine;
pub mod enrichment;
pub mod features;
pub mod sampler;
pub mod scaler;
pub mod scorer;

pub use engine::*;
pub use enrichment::*;
pub use features::*;
pub use sampler::*;
pub use scaler::*;
pub use scorer::*;
