//! Trained artifact persistence
//!
//! The artifact is three named JSON blobs in a directory: the two fitted
//! classifiers plus the feature schema (which carries version metadata).
//! It is written once by training, loaded once at service start, and never
//! mutated afterwards. Only round-trip fidelity is contractual: a reloaded
//! artifact must produce byte-identical predictions.

use crate::error::{Result, SkycastError};
use crate::schema::FeatureSchema;
use crate::training::RandomForest;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Version string reported with every prediction.
pub const MODEL_VERSION: &str = "1.0.0";

const RAIN_CLASSIFIER_FILE: &str = "rain_classifier.json";
const COMFORT_CLASSIFIER_FILE: &str = "comfort_classifier.json";
const FEATURE_SCHEMA_FILE: &str = "feature_schema.json";

/// Output of a successful training run, immutable once persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainedArtifact {
    pub schema: FeatureSchema,
    pub rain_classifier: RandomForest,
    pub comfort_classifier: RandomForest,
    pub model_version: String,
    pub trained_at: DateTime<Utc>,
}

/// The schema blob also carries the artifact metadata, mirroring how the
/// classifiers travel with the schema that orders their inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SchemaBlob {
    schema: FeatureSchema,
    model_version: String,
    trained_at: DateTime<Utc>,
}

impl TrainedArtifact {
    pub fn new(rain_classifier: RandomForest, comfort_classifier: RandomForest) -> Self {
        Self {
            schema: FeatureSchema::canonical(),
            rain_classifier,
            comfort_classifier,
            model_version: MODEL_VERSION.to_string(),
            trained_at: Utc::now(),
        }
    }
}

/// Directory-backed store for the three artifact blobs.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persist all three blobs, creating the directory if needed.
    pub fn save(&self, artifact: &TrainedArtifact) -> Result<()> {
        fs::create_dir_all(&self.dir)?;

        self.write_blob(RAIN_CLASSIFIER_FILE, &artifact.rain_classifier)?;
        self.write_blob(COMFORT_CLASSIFIER_FILE, &artifact.comfort_classifier)?;
        self.write_blob(
            FEATURE_SCHEMA_FILE,
            &SchemaBlob {
                schema: artifact.schema.clone(),
                model_version: artifact.model_version.clone(),
                trained_at: artifact.trained_at,
            },
        )?;

        info!(dir = %self.dir.display(), "saved trained artifact");
        Ok(())
    }

    /// Load all three blobs. A missing or unparseable blob is fatal: the
    /// caller must refuse to serve without a complete artifact.
    pub fn load(&self) -> Result<TrainedArtifact> {
        let rain_classifier: RandomForest = self.read_blob(RAIN_CLASSIFIER_FILE)?;
        let comfort_classifier: RandomForest = self.read_blob(COMFORT_CLASSIFIER_FILE)?;
        let schema_blob: SchemaBlob = self.read_blob(FEATURE_SCHEMA_FILE)?;

        info!(
            dir = %self.dir.display(),
            model_version = %schema_blob.model_version,
            "loaded trained artifact"
        );

        Ok(TrainedArtifact {
            schema: schema_blob.schema,
            rain_classifier,
            comfort_classifier,
            model_version: schema_blob.model_version,
            trained_at: schema_blob.trained_at,
        })
    }

    fn write_blob<T: Serialize>(&self, file: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        fs::write(self.dir.join(file), json)?;
        Ok(())
    }

    fn read_blob<T: for<'de> Deserialize<'de>>(&self, file: &str) -> Result<T> {
        let path = self.dir.join(file);
        let json = fs::read_to_string(&path).map_err(|e| {
            SkycastError::ArtifactLoadError(format!("cannot read {}: {e}", path.display()))
        })?;
        serde_json::from_str(&json).map_err(|e| {
            SkycastError::ArtifactLoadError(format!("corrupt blob {}: {e}", path.display()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic::generate;
    use crate::training::{train, TrainingConfig};

    fn small_artifact() -> TrainedArtifact {
        let ds = generate(400, 11);
        let config = TrainingConfig::with_seed(11).with_n_estimators(10);
        train(&ds, &config).unwrap().artifact
    }

    #[test]
    fn test_save_load_round_trip_predictions() {
        let artifact = small_artifact();
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());

        store.save(&artifact).unwrap();
        let loaded = store.load().unwrap();

        assert_eq!(loaded.schema, artifact.schema);
        assert_eq!(loaded.model_version, artifact.model_version);

        let probe = generate(50, 99).feature_matrix();
        assert_eq!(
            artifact.rain_classifier.predict_proba(&probe).unwrap(),
            loaded.rain_classifier.predict_proba(&probe).unwrap()
        );
        assert_eq!(
            artifact.comfort_classifier.predict_proba(&probe).unwrap(),
            loaded.comfort_classifier.predict_proba(&probe).unwrap()
        );
    }

    #[test]
    fn test_missing_blob_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());

        let err = store.load().unwrap_err();
        assert!(matches!(err, SkycastError::ArtifactLoadError(_)));
    }

    #[test]
    fn test_corrupt_blob_is_fatal() {
        let artifact = small_artifact();
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        store.save(&artifact).unwrap();

        std::fs::write(dir.path().join("comfort_classifier.json"), "{not json").unwrap();

        let err = store.load().unwrap_err();
        match err {
            SkycastError::ArtifactLoadError(msg) => {
                assert!(msg.contains("comfort_classifier.json"))
            }
            other => panic!("expected ArtifactLoadError, got {other:?}"),
        }
    }
}
