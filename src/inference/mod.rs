//! Prediction service
//!
//! Holds the loaded [`TrainedArtifact`] immutably and answers per-request
//! predictions. The service is constructed explicitly (no ambient global
//! model state), so tests can build isolated instances from fixture
//! artifacts, and it is freely shareable behind an `Arc` since nothing is
//! mutated after load.

use crate::artifact::{ArtifactStore, TrainedArtifact};
use crate::data::ComfortLevel;
use crate::error::{Result, SkycastError};
use crate::explain::explain;
use crate::schema::FeatureSchema;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Structured prediction response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub will_rain: bool,
    /// Probability mass of the rain class, in [0, 1]
    pub rain_probability: f64,
    pub comfort_level: ComfortLevel,
    /// Always carries all three levels; levels absent from training get 0.0.
    /// Values sum to 1 within floating tolerance.
    pub comfort_probabilities: BTreeMap<ComfortLevel, f64>,
    pub explanation: String,
    pub model_version: String,
}

/// Immutable serving front-end over a trained artifact.
#[derive(Debug, Clone)]
pub struct PredictionService {
    artifact: TrainedArtifact,
}

impl PredictionService {
    pub fn new(artifact: TrainedArtifact) -> Self {
        Self { artifact }
    }

    /// Load the artifact from storage. Missing or corrupt blobs are fatal.
    pub fn from_store(store: &ArtifactStore) -> Result<Self> {
        Ok(Self::new(store.load()?))
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.artifact.schema
    }

    pub fn model_version(&self) -> &str {
        &self.artifact.model_version
    }

    /// Run both classifiers on one feature map.
    ///
    /// Validation happens before any inference: every schema field must be
    /// present ([`SkycastError::ValidationError`] naming the first missing
    /// one) and finite ([`SkycastError::InferenceError`]). The input row is
    /// assembled in schema order regardless of the map's key order.
    pub fn predict(&self, features: &HashMap<String, f64>) -> Result<PredictionResult> {
        let row = self.artifact.schema.ordered_vector(features)?;
        for (name, value) in self.artifact.schema.names().iter().zip(&row) {
            if !value.is_finite() {
                return Err(SkycastError::InferenceError(format!(
                    "feature {name} is not a finite number: {value}"
                )));
            }
        }

        let temperature = row[0];
        let x = Array2::from_shape_vec((1, row.len()), row)?;

        let rain = &self.artifact.rain_classifier;
        let will_rain = rain.predict(&x)?[0] == 1;
        let rain_proba = rain.predict_proba(&x)?;
        let rain_probability = rain
            .classes()
            .iter()
            .position(|&c| c == 1)
            .map(|idx| rain_proba[[0, idx]])
            .unwrap_or(0.0);

        let comfort = &self.artifact.comfort_classifier;
        let comfort_class = comfort.predict(&x)?[0];
        let comfort_level = ComfortLevel::from_class_index(comfort_class).ok_or_else(|| {
            SkycastError::InferenceError(format!("unknown comfort class {comfort_class}"))
        })?;
        let comfort_proba = comfort.predict_proba(&x)?;
        let comfort_probabilities: BTreeMap<ComfortLevel, f64> = ComfortLevel::ALL
            .iter()
            .map(|&level| {
                let p = comfort
                    .classes()
                    .iter()
                    .position(|&c| c == level.class_index())
                    .map(|idx| comfort_proba[[0, idx]])
                    .unwrap_or(0.0);
                (level, p)
            })
            .collect();

        debug!(
            will_rain,
            rain_probability,
            comfort_level = %comfort_level,
            "prediction served"
        );

        let explanation = explain(temperature, will_rain, rain_probability, comfort_level);

        Ok(PredictionResult {
            will_rain,
            rain_probability,
            comfort_level,
            comfort_probabilities,
            explanation,
            model_version: self.artifact.model_version.clone(),
        })
    }
}
