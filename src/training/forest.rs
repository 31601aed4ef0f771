//! Bagged decision-tree classifier

use crate::error::{Result, SkycastError};
use super::tree::{Criterion, DecisionTree};
use ndarray::{Array2, Axis};
use rand::seq::SliceRandom;
use rand::RngCore;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Strategy for the number of features considered per tree
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum MaxFeatures {
    /// All features (pure bagging)
    All,
    /// Square root of n_features
    Sqrt,
    /// Fixed number
    Fixed(usize),
}

/// Random forest classifier: bootstrap-sampled decision trees with majority
/// voting and vote-share probabilities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    /// Number of trees
    pub n_estimators: usize,
    /// Maximum depth per tree
    pub max_depth: Option<usize>,
    /// Minimum samples to split
    pub min_samples_split: usize,
    /// Minimum samples in leaf
    pub min_samples_leaf: usize,
    /// Features considered per tree
    pub max_features: MaxFeatures,
    /// Bootstrap sampling
    pub bootstrap: bool,
    /// Impurity criterion
    pub criterion: Criterion,
    /// Random state
    pub random_state: u64,
    /// Sorted distinct class labels seen during fit
    classes: Vec<usize>,
    n_features: usize,
    feature_importances: Option<Vec<f64>>,
}

impl Default for RandomForest {
    fn default() -> Self {
        Self::new(100)
    }
}

impl RandomForest {
    pub fn new(n_estimators: usize) -> Self {
        Self {
            trees: Vec::new(),
            n_estimators,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: MaxFeatures::All,
            bootstrap: true,
            criterion: Criterion::Gini,
            random_state: 42,
            classes: Vec::new(),
            n_features: 0,
            feature_importances: None,
        }
    }

    /// Set maximum depth
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Set minimum samples to split
    pub fn with_min_samples_split(mut self, min_samples: usize) -> Self {
        self.min_samples_split = min_samples;
        self
    }

    /// Set minimum samples in leaf
    pub fn with_min_samples_leaf(mut self, min_samples: usize) -> Self {
        self.min_samples_leaf = min_samples;
        self
    }

    /// Set max features strategy
    pub fn with_max_features(mut self, max_features: MaxFeatures) -> Self {
        self.max_features = max_features;
        self
    }

    /// Set random state
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = seed;
        self
    }

    fn compute_max_features(&self, n_features: usize) -> usize {
        match self.max_features {
            MaxFeatures::All => n_features,
            MaxFeatures::Sqrt => (n_features as f64).sqrt().ceil() as usize,
            MaxFeatures::Fixed(n) => n.min(n_features),
        }
        .max(1)
    }

    /// Fit the forest. `y` holds arbitrary class labels; distinct labels are
    /// collected and predictions are expressed in the same labels.
    pub fn fit(&mut self, x: &Array2<f64>, y: &[usize]) -> Result<&mut Self> {
        let n_samples = x.nrows();
        let n_features = x.ncols();

        if n_samples != y.len() {
            return Err(SkycastError::ShapeError {
                expected: format!("y length = {}", n_samples),
                actual: format!("y length = {}", y.len()),
            });
        }
        if n_samples == 0 {
            return Err(SkycastError::TrainingError(
                "cannot fit a forest on an empty dataset".to_string(),
            ));
        }

        let mut classes: Vec<usize> = y.to_vec();
        classes.sort_unstable();
        classes.dedup();
        if classes.len() < 2 {
            return Err(SkycastError::TrainingError(
                "target has a single class; nothing to learn".to_string(),
            ));
        }
        self.classes = classes;
        self.n_features = n_features;

        // Remap labels to dense indices for the trees.
        let y_dense: Vec<usize> = y
            .iter()
            .map(|label| self.classes.binary_search(label).unwrap())
            .collect();
        let n_classes = self.classes.len();
        let max_features = self.compute_max_features(n_features);
        let base_seed = self.random_state;

        let trees: Result<Vec<DecisionTree>> = (0..self.n_estimators)
            .into_par_iter()
            .map(|tree_idx| {
                let seed = base_seed.wrapping_add(tree_idx as u64);
                let mut rng = ChaCha8Rng::seed_from_u64(seed);

                let sample_indices: Vec<usize> = if self.bootstrap {
                    (0..n_samples)
                        .map(|_| (rng.next_u64() as usize) % n_samples)
                        .collect()
                } else {
                    (0..n_samples).collect()
                };

                let x_boot = x.select(Axis(0), &sample_indices);
                let y_boot: Vec<usize> = sample_indices.iter().map(|&i| y_dense[i]).collect();

                let mut tree = DecisionTree::new()
                    .with_min_samples_split(self.min_samples_split)
                    .with_min_samples_leaf(self.min_samples_leaf)
                    .with_criterion(self.criterion);
                if let Some(d) = self.max_depth {
                    tree = tree.with_max_depth(d);
                }
                if max_features < n_features {
                    let mut feature_pool: Vec<usize> = (0..n_features).collect();
                    feature_pool.shuffle(&mut rng);
                    let mut subset: Vec<usize> =
                        feature_pool.into_iter().take(max_features).collect();
                    subset.sort_unstable();
                    tree.feature_subset = Some(subset);
                }

                tree.fit(&x_boot, &y_boot, n_classes)?;
                Ok(tree)
            })
            .collect();

        self.trees = trees?;
        self.compute_feature_importances();

        Ok(self)
    }

    fn compute_feature_importances(&mut self) {
        if self.trees.is_empty() {
            return;
        }

        let mut totals = vec![0.0; self.n_features];
        for tree in &self.trees {
            if let Some(imp) = tree.feature_importances() {
                for (total, &val) in totals.iter_mut().zip(imp) {
                    *total += val;
                }
            }
        }

        let sum: f64 = totals.iter().sum();
        if sum > 0.0 {
            for imp in &mut totals {
                *imp /= sum;
            }
        }
        self.feature_importances = Some(totals);
    }

    fn vote_counts(&self, x: &Array2<f64>) -> Result<Vec<Vec<usize>>> {
        if self.trees.is_empty() {
            return Err(SkycastError::ModelNotFitted);
        }

        let per_tree: Result<Vec<Vec<usize>>> =
            self.trees.par_iter().map(|tree| tree.predict(x)).collect();
        let per_tree = per_tree?;

        let n_classes = self.classes.len();
        let mut votes = vec![vec![0usize; n_classes]; x.nrows()];
        for predictions in &per_tree {
            for (row_votes, &class_idx) in votes.iter_mut().zip(predictions) {
                row_votes[class_idx] += 1;
            }
        }
        Ok(votes)
    }

    /// Predict class labels by majority vote
    pub fn predict(&self, x: &Array2<f64>) -> Result<Vec<usize>> {
        let votes = self.vote_counts(x)?;
        Ok(votes
            .into_iter()
            .map(|row_votes| {
                // Ties resolve to the lowest class label.
                let best = row_votes
                    .iter()
                    .enumerate()
                    .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(&a.0)))
                    .map(|(idx, _)| idx)
                    .unwrap_or(0);
                self.classes[best]
            })
            .collect())
    }

    /// Per-class probabilities as tree-vote shares, columns ordered by
    /// [`RandomForest::classes`]. Each row sums to 1.
    pub fn predict_proba(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        let votes = self.vote_counts(x)?;
        let n_classes = self.classes.len();
        let n_trees = self.trees.len() as f64;

        let mut proba = Array2::zeros((x.nrows(), n_classes));
        for (i, row_votes) in votes.iter().enumerate() {
            for (j, &count) in row_votes.iter().enumerate() {
                proba[[i, j]] = count as f64 / n_trees;
            }
        }
        Ok(proba)
    }

    /// Sorted distinct class labels seen during fit
    pub fn classes(&self) -> &[usize] {
        &self.classes
    }

    /// Get feature importances
    pub fn feature_importances(&self) -> Option<&[f64]> {
        self.feature_importances.as_deref()
    }

    /// Get number of trees
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn two_blob_data() -> (Array2<f64>, Vec<usize>) {
        let x = array![
            [0.0, 0.0],
            [0.1, 0.1],
            [0.2, 0.2],
            [0.3, 0.1],
            [1.0, 1.0],
            [1.1, 1.1],
            [1.2, 1.2],
            [1.3, 1.1],
        ];
        let y = vec![0, 0, 0, 0, 1, 1, 1, 1];
        (x, y)
    }

    #[test]
    fn test_classifier_learns_separable_blobs() {
        let (x, y) = two_blob_data();
        let mut rf = RandomForest::new(15).with_random_state(42);
        rf.fit(&x, &y).unwrap();

        let predictions = rf.predict(&x).unwrap();
        let correct = predictions.iter().zip(&y).filter(|(p, a)| p == a).count();
        assert!(correct >= 7, "only {correct}/8 correct");
    }

    #[test]
    fn test_predict_proba_rows_sum_to_one() {
        let (x, y) = two_blob_data();
        let mut rf = RandomForest::new(15).with_random_state(42);
        rf.fit(&x, &y).unwrap();

        let proba = rf.predict_proba(&x).unwrap();
        assert_eq!(proba.ncols(), 2);
        for i in 0..proba.nrows() {
            let row_sum: f64 = proba.row(i).sum();
            assert!((row_sum - 1.0).abs() < 1e-6, "row {i} sums to {row_sum}");
        }
    }

    #[test]
    fn test_fit_is_deterministic_for_fixed_seed() {
        let (x, y) = two_blob_data();

        let mut a = RandomForest::new(10).with_random_state(7);
        a.fit(&x, &y).unwrap();
        let mut b = RandomForest::new(10).with_random_state(7);
        b.fit(&x, &y).unwrap();

        assert_eq!(a.predict_proba(&x).unwrap(), b.predict_proba(&x).unwrap());
    }

    #[test]
    fn test_single_class_target_is_rejected() {
        let x = array![[0.0, 0.0], [1.0, 1.0]];
        let y = vec![1, 1];
        let mut rf = RandomForest::new(5);
        assert!(matches!(
            rf.fit(&x, &y),
            Err(SkycastError::TrainingError(_))
        ));
    }

    #[test]
    fn test_sparse_class_labels_round_trip() {
        // Labels need not be dense; predictions come back in the original labels.
        let x = array![
            [0.0, 0.0],
            [0.1, 0.1],
            [0.2, 0.0],
            [5.0, 5.0],
            [5.1, 5.1],
            [5.2, 5.0],
        ];
        let y = vec![3, 3, 3, 9, 9, 9];
        let mut rf = RandomForest::new(10).with_random_state(1);
        rf.fit(&x, &y).unwrap();

        assert_eq!(rf.classes(), &[3, 9]);
        for p in rf.predict(&x).unwrap() {
            assert!(p == 3 || p == 9);
        }
    }

    #[test]
    fn test_serde_round_trip_preserves_predictions() {
        let (x, y) = two_blob_data();
        let mut rf = RandomForest::new(10).with_random_state(3).with_max_depth(4);
        rf.fit(&x, &y).unwrap();

        let json = serde_json::to_string(&rf).unwrap();
        let back: RandomForest = serde_json::from_str(&json).unwrap();

        assert_eq!(rf.predict(&x).unwrap(), back.predict(&x).unwrap());
        assert_eq!(rf.predict_proba(&x).unwrap(), back.predict_proba(&x).unwrap());
    }

    #[test]
    fn test_feature_subset_sampling() {
        let (x, y) = two_blob_data();
        let mut rf = RandomForest::new(10)
            .with_random_state(11)
            .with_max_features(MaxFeatures::Fixed(1));
        rf.fit(&x, &y).unwrap();
        assert_eq!(rf.n_trees(), 10);
    }
}
