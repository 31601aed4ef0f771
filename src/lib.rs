//! Skycast - Weather comfort and rain prediction
//!
//! A generate→train→serve pipeline over seven numeric weather features:
//! rule-based synthetic data generation, two forest classifiers (binary
//! rain, three-class comfort) trained on one shared split, and a prediction
//! service that loads the persisted artifact once and renders a
//! human-readable explanation per request.
//!
//! # Modules
//!
//! - [`schema`] - Canonical ordered feature names
//! - [`data`] - Labeled samples, datasets, CSV exchange
//! - [`synthetic`] - Synthetic data generation and labeling rules
//! - [`training`] - Forest classifiers, split, evaluation
//! - [`artifact`] - Trained artifact persistence
//! - [`inference`] - Prediction service
//! - [`explain`] - Natural-language explanation templates
//! - [`cli`] - Command-line interface

// Core error handling
pub mod error;

// Data model
pub mod schema;
pub mod data;

// Pipeline stages
pub mod synthetic;
pub mod training;
pub mod artifact;
pub mod inference;
pub mod explain;

// Services
pub mod cli;

pub use error::{Result, SkycastError};

/// Re-export commonly used types
pub mod prelude {
    // Error handling
    pub use crate::error::{Result, SkycastError};

    // Schema and data model
    pub use crate::schema::{FeatureSchema, FEATURE_NAMES};
    pub use crate::data::{ComfortLevel, Dataset, TrainingSample, WeatherObservation};

    // Generation
    pub use crate::synthetic::generate;

    // Training
    pub use crate::training::{train, EvalReport, RandomForest, TrainingConfig, TrainingOutcome};

    // Artifact persistence
    pub use crate::artifact::{ArtifactStore, TrainedArtifact, MODEL_VERSION};

    // Serving
    pub use crate::inference::{PredictionResult, PredictionService};
    pub use crate::explain::explain;
}
