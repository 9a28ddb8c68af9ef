//! Model Schema
//!
//! Static description of the fraud "model": ordered feature names, importance
//! weights and per-feature standardization parameters. Loaded once at startup
//! and shared read-only (`Arc<ModelSchema>`) with the extractor, scaler and scorer.
//!
//! Misalignment between the feature list, importances and scaler arrays is
//! reported by [`ModelSchema::validate`] but never repaired: scoring keeps
//! zero-filling missing entries. Strict mode (see `AppConfig`) turns the
//! report into a load error instead.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, warn};

use super::errors::{AppError, AppResult, ErrorCode};

/// Built-in schema shipped with the crate
const BUILTIN_SCHEMA_JSON: &str = include_str!("../../assets/ml-model-info.json");

/// Classes of a categorical encoder exported alongside the model.
///
/// Token types are hash-encoded during extraction; these classes are
/// carried for inspection only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelEncoder {
    #[serde(default)]
    pub classes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSchema {
    #[serde(default = "default_model_type")]
    pub model_type: String,
    #[serde(default)]
    pub feature_count: Option<usize>,
    /// Defines vector order and length
    pub selected_features: Vec<String>,
    pub feature_importances: BTreeMap<String, f64>,
    /// Indexed positionally against `selected_features`
    pub scaler_mean: Vec<f64>,
    /// Indexed positionally against `selected_features`
    pub scaler_scale: Vec<f64>,
    #[serde(default)]
    pub label_encoders: BTreeMap<String, LabelEncoder>,
}

fn default_model_type() -> String {
    "Unknown".to_string()
}

/// A single alignment problem found by [`ModelSchema::validate`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SchemaIssue {
    /// `scaler_mean` length differs from the feature list
    MeanLengthMismatch { features: usize, means: usize },
    /// `scaler_scale` length differs from the feature list
    ScaleLengthMismatch { features: usize, scales: usize },
    /// Declared `feature_count` differs from the feature list
    FeatureCountMismatch { declared: usize, actual: usize },
    /// Feature has no importance weight (contributes 0)
    MissingImportance { feature: String },
    /// Importance weight for a name that is not a selected feature
    UnknownImportance { feature: String },
    /// Zero or negative scale (treated as 1 when scaling)
    NonPositiveScale { index: usize, scale: f64 },
}

impl SchemaIssue {
    pub fn description(&self) -> String {
        match self {
            SchemaIssue::MeanLengthMismatch { features, means } => {
                format!("scaler_mean has {} entries for {} features", means, features)
            }
            SchemaIssue::ScaleLengthMismatch { features, scales } => {
                format!("scaler_scale has {} entries for {} features", scales, features)
            }
            SchemaIssue::FeatureCountMismatch { declared, actual } => {
                format!("feature_count declares {} but {} features are listed", declared, actual)
            }
            SchemaIssue::MissingImportance { feature } => {
                format!("no importance weight for feature {:?}", feature)
            }
            SchemaIssue::UnknownImportance { feature } => {
                format!("importance weight for unlisted feature {:?}", feature)
            }
            SchemaIssue::NonPositiveScale { index, scale } => {
                format!("scaler_scale[{}] = {} is not positive", index, scale)
            }
        }
    }
}

impl ModelSchema {
    /// Parse the schema bundled with the crate
    pub fn builtin() -> AppResult<Self> {
        Self::from_json_str(BUILTIN_SCHEMA_JSON)
    }

    pub fn from_json_str(json: &str) -> AppResult<Self> {
        serde_json::from_str(json).map_err(|e| {
            AppError::with_source(ErrorCode::SchemaParseFailed, "Invalid model schema JSON", e)
        })
    }

    pub fn from_path(path: &Path) -> AppResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            AppError::with_source(
                ErrorCode::SchemaReadFailed,
                format!("Cannot read model schema at {}", path.display()),
                e,
            )
        })?;
        Self::from_json_str(&json)
    }

    /// Load from `path` (or the built-in schema), validate, and either warn
    /// about issues or reject them when `strict` is set.
    pub fn load(path: Option<&Path>, strict: bool) -> AppResult<Self> {
        let schema = match path {
            Some(path) => Self::from_path(path)?,
            None => Self::builtin()?,
        };

        let issues = schema.validate();
        for issue in &issues {
            warn!(issue = %issue.description(), "Model schema misalignment");
        }
        if strict && !issues.is_empty() {
            return Err(AppError::schema_misaligned(issues.len()));
        }

        info!(
            model_type = %schema.model_type,
            features = schema.len(),
            issues = issues.len(),
            source = %path.map(|p| p.display().to_string()).unwrap_or_else(|| "builtin".to_string()),
            "Model schema loaded"
        );

        Ok(schema)
    }

    /// Number of features (vector length)
    pub fn len(&self) -> usize {
        self.selected_features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected_features.is_empty()
    }

    /// Importance for a feature name, 0 when absent
    pub fn importance(&self, feature: &str) -> f64 {
        self.feature_importances.get(feature).copied().unwrap_or(0.0)
    }

    /// Mean at position `index`, 0 when absent
    pub fn mean_at(&self, index: usize) -> f64 {
        self.scaler_mean.get(index).copied().unwrap_or(0.0)
    }

    /// Scale at position `index`; absent or zero reads as 1
    pub fn scale_at(&self, index: usize) -> f64 {
        match self.scaler_scale.get(index).copied() {
            Some(scale) if scale != 0.0 && scale.is_finite() => scale,
            _ => 1.0,
        }
    }

    /// Report alignment issues without changing any behaviour
    pub fn validate(&self) -> Vec<SchemaIssue> {
        let mut issues = Vec::new();
        let features = self.selected_features.len();

        if self.scaler_mean.len() != features {
            issues.push(SchemaIssue::MeanLengthMismatch {
                features,
                means: self.scaler_mean.len(),
            });
        }
        if self.scaler_scale.len() != features {
            issues.push(SchemaIssue::ScaleLengthMismatch {
                features,
                scales: self.scaler_scale.len(),
            });
        }
        if let Some(declared) = self.feature_count {
            if declared != features {
                issues.push(SchemaIssue::FeatureCountMismatch {
                    declared,
                    actual: features,
                });
            }
        }

        for feature in &self.selected_features {
            if !self.feature_importances.contains_key(feature) {
                issues.push(SchemaIssue::MissingImportance {
                    feature: feature.clone(),
                });
            }
        }
        for feature in self.feature_importances.keys() {
            if !self.selected_features.contains(feature) {
                issues.push(SchemaIssue::UnknownImportance {
                    feature: feature.clone(),
                });
            }
        }

        for (index, &scale) in self.scaler_scale.iter().enumerate() {
            if scale <= 0.0 {
                issues.push(SchemaIssue::NonPositiveScale { index, scale });
            }
        }

        issues
    }
}
