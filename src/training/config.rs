//! Training configuration

use serde::{Deserialize, Serialize};

/// Configuration for the two-classifier training pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Fraction of samples held out for evaluation
    pub validation_split: f64,

    /// Number of trees per forest
    pub n_estimators: usize,

    /// Depth bound for the binary rain classifier
    pub rain_max_depth: usize,

    /// Depth bound for the three-class comfort classifier; slightly deeper
    /// to accommodate the three-way decision boundary
    pub comfort_max_depth: usize,

    /// Minimum samples per leaf
    pub min_samples_leaf: usize,

    /// Random seed shared by the split and both forests
    pub seed: u64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            validation_split: 0.2,
            n_estimators: 100,
            rain_max_depth: 10,
            comfort_max_depth: 12,
            min_samples_leaf: 1,
            seed: 42,
        }
    }
}

impl TrainingConfig {
    /// Default configuration with a specific seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    /// Builder method to set the number of trees
    pub fn with_n_estimators(mut self, n: usize) -> Self {
        self.n_estimators = n;
        self
    }

    /// Builder method to set the validation split
    pub fn with_validation_split(mut self, split: f64) -> Self {
        self.validation_split = split;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TrainingConfig::default();
        assert_eq!(config.validation_split, 0.2);
        assert_eq!(config.n_estimators, 100);
        assert_eq!(config.rain_max_depth, 10);
        assert_eq!(config.comfort_max_depth, 12);
    }

    #[test]
    fn test_builder_pattern() {
        let config = TrainingConfig::with_seed(7).with_n_estimators(30);
        assert_eq!(config.seed, 7);
        assert_eq!(config.n_estimators, 30);
    }
}
