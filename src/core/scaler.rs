//! Feature Scaling
//!
//! Per-position standardization `(value - mean[i]) / scale[i]` with the
//! schema's scaler parameters. A missing mean reads as 0 and a missing or zero
//! scale as 1, so the output never contains a division by zero.

use std::sync::Arc;

use crate::models::schema::ModelSchema;

#[derive(Debug, Clone)]
pub struct FeatureScaler {
    schema: Arc<ModelSchema>,
}

impl FeatureScaler {
    pub fn new(schema: Arc<ModelSchema>) -> Self {
        Self { schema }
    }

    /// Standardize a raw feature vector; output has the same length as the input
    pub fn scale(&self, features: &[f64]) -> Vec<f64> {
        features
            .iter()
            .enumerate()
            .map(|(index, value)| (value - self.schema.mean_at(index)) / self.schema.scale_at(index))
            .collect()
    }
}
