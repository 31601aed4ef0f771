//! Two-classifier training pipeline

use super::{EvalReport, RandomForest, TrainingConfig};
use crate::artifact::TrainedArtifact;
use crate::data::{ComfortLevel, Dataset};
use crate::error::{Result, SkycastError};
use crate::schema::FEATURE_NAMES;
use ndarray::{Array2, Axis};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

/// Everything training produces: the persistable artifact plus the
/// held-out evaluation reports (reporting only, not part of the artifact
/// contract).
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub artifact: TrainedArtifact,
    pub rain_report: EvalReport,
    pub comfort_report: EvalReport,
}

/// Fit the rain and comfort classifiers on `dataset`.
///
/// A single seeded shuffle produces one 80/20 partition shared by both
/// label tracks, so both classifiers are evaluated on exactly the same
/// held-out rows. Failures are fatal: an empty or too-small dataset is a
/// [`SkycastError::DataError`], a single-class target a
/// [`SkycastError::TrainingError`]; no partial artifact is ever returned.
pub fn train(dataset: &Dataset, config: &TrainingConfig) -> Result<TrainingOutcome> {
    if dataset.is_empty() {
        return Err(SkycastError::DataError(
            "training dataset is empty".to_string(),
        ));
    }

    let x = dataset.feature_matrix();
    let y_rain = dataset.rain_labels();
    let y_comfort = dataset.comfort_labels();

    let (train_idx, eval_idx) = split_indices(dataset.len(), config.validation_split, config.seed)?;
    info!(
        n_samples = dataset.len(),
        n_train = train_idx.len(),
        n_eval = eval_idx.len(),
        seed = config.seed,
        "split dataset for training"
    );

    let x_train = x.select(Axis(0), &train_idx);
    let x_eval = x.select(Axis(0), &eval_idx);

    let rain_classifier = fit_forest(
        &x_train,
        &select(&y_rain, &train_idx),
        config,
        config.rain_max_depth,
    )?;
    let comfort_classifier = fit_forest(
        &x_train,
        &select(&y_comfort, &train_idx),
        config,
        config.comfort_max_depth,
    )?;

    let rain_report = EvalReport::compute(
        "rain",
        &select(&y_rain, &eval_idx),
        &rain_classifier.predict(&x_eval)?,
        vec!["No Rain".to_string(), "Rain".to_string()],
        named_importances(&rain_classifier),
    );
    let comfort_report = EvalReport::compute(
        "comfort",
        &select(&y_comfort, &eval_idx),
        &comfort_classifier.predict(&x_eval)?,
        ComfortLevel::ALL.iter().map(|c| c.label().to_string()).collect(),
        named_importances(&comfort_classifier),
    );

    info!(
        rain_accuracy = rain_report.accuracy,
        comfort_accuracy = comfort_report.accuracy,
        "training complete"
    );

    Ok(TrainingOutcome {
        artifact: TrainedArtifact::new(rain_classifier, comfort_classifier),
        rain_report,
        comfort_report,
    })
}

/// One shuffled 80/20 partition, shared by both label tracks.
fn split_indices(n: usize, validation_split: f64, seed: u64) -> Result<(Vec<usize>, Vec<usize>)> {
    let n_eval = (n as f64 * validation_split).round() as usize;
    let n_train = n - n_eval;
    if n_train == 0 || n_eval == 0 {
        return Err(SkycastError::DataError(format!(
            "dataset of {n} samples is too small for a {validation_split} validation split"
        )));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let eval_idx = indices.split_off(n_train);
    Ok((indices, eval_idx))
}

fn select(labels: &[usize], indices: &[usize]) -> Vec<usize> {
    indices.iter().map(|&i| labels[i]).collect()
}

fn fit_forest(
    x: &Array2<f64>,
    y: &[usize],
    config: &TrainingConfig,
    max_depth: usize,
) -> Result<RandomForest> {
    let mut forest = RandomForest::new(config.n_estimators)
        .with_max_depth(max_depth)
        .with_min_samples_leaf(config.min_samples_leaf)
        .with_random_state(config.seed);
    forest.fit(x, y)?;
    Ok(forest)
}

fn named_importances(forest: &RandomForest) -> Vec<(String, f64)> {
    match forest.feature_importances() {
        Some(importances) => FEATURE_NAMES
            .iter()
            .zip(importances)
            .map(|(name, &imp)| (name.to_string(), imp))
            .collect(),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic::generate;

    #[test]
    fn test_empty_dataset_is_a_data_error() {
        let err = train(&Dataset::default(), &TrainingConfig::default()).unwrap_err();
        assert!(matches!(err, SkycastError::DataError(_)));
    }

    #[test]
    fn test_tiny_dataset_cannot_be_split() {
        let ds = generate(3, 1);
        let config = TrainingConfig::default().with_validation_split(0.01);
        assert!(matches!(
            train(&ds, &config),
            Err(SkycastError::DataError(_))
        ));
    }

    #[test]
    fn test_split_indices_shared_and_disjoint() {
        let (train_idx, eval_idx) = split_indices(100, 0.2, 42).unwrap();
        assert_eq!(train_idx.len(), 80);
        assert_eq!(eval_idx.len(), 20);

        let mut all: Vec<usize> = train_idx.iter().chain(&eval_idx).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..100).collect::<Vec<_>>());

        // Same seed, same partition.
        let (train_b, eval_b) = split_indices(100, 0.2, 42).unwrap();
        assert_eq!(train_idx, train_b);
        assert_eq!(eval_idx, eval_b);
    }

    #[test]
    fn test_training_on_generated_data() {
        let ds = generate(600, 42);
        let config = TrainingConfig::with_seed(42).with_n_estimators(15);
        let outcome = train(&ds, &config).unwrap();

        // Labels come from deterministic-ish rules, so forests should do
        // far better than chance on held-out data.
        assert!(
            outcome.rain_report.accuracy > 0.7,
            "rain accuracy {}",
            outcome.rain_report.accuracy
        );
        assert!(
            outcome.comfort_report.accuracy > 0.7,
            "comfort accuracy {}",
            outcome.comfort_report.accuracy
        );
        assert_eq!(outcome.rain_report.n_samples, outcome.comfort_report.n_samples);
        assert_eq!(outcome.artifact.schema.names().len(), 7);
    }
}
