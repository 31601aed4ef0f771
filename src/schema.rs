//! Canonical feature schema
//!
//! Single source of truth for the seven input features and their order.
//! Generation, training, artifact serialization, and serving all project
//! feature maps through this schema so that model input columns line up
//! regardless of the order a caller supplied fields in.

use crate::error::{Result, SkycastError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The seven input features, in canonical model-input order.
pub const FEATURE_NAMES: [&str; 7] = [
    "temperature",
    "humidity",
    "wind_speed",
    "visibility",
    "clouds",
    "pressure",
    "rain_1h",
];

/// Ordered feature names persisted alongside the trained models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    names: Vec<String>,
}

impl Default for FeatureSchema {
    fn default() -> Self {
        Self::canonical()
    }
}

impl FeatureSchema {
    /// The canonical seven-feature schema.
    pub fn canonical() -> Self {
        Self {
            names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Feature names in model-input order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of features.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Build a model input row from a name-to-value map, following schema
    /// order independently of the map's own ordering.
    ///
    /// Fails with [`SkycastError::ValidationError`] naming the first missing
    /// field (in schema order) before any value is read, so a short vector
    /// never reaches a classifier.
    pub fn ordered_vector(&self, features: &HashMap<String, f64>) -> Result<Vec<f64>> {
        for name in &self.names {
            if !features.contains_key(name) {
                return Err(SkycastError::ValidationError(name.clone()));
            }
        }

        Ok(self.names.iter().map(|name| features[name]).collect())
    }
}
