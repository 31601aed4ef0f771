//! Held-out evaluation metrics
//!
//! Reporting only: nothing here feeds back into the persisted artifact.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Evaluation summary for one classifier on the held-out partition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalReport {
    /// Classifier name for display ("rain", "comfort")
    pub model_name: String,
    /// Fraction of held-out samples predicted correctly
    pub accuracy: f64,
    /// Rows = true class, columns = predicted class
    pub confusion_matrix: Vec<Vec<usize>>,
    /// Display labels, aligned with confusion matrix rows/columns
    pub class_labels: Vec<String>,
    /// Feature importances, sorted most important first
    pub feature_importances: Vec<(String, f64)>,
    /// Number of held-out samples
    pub n_samples: usize,
}

impl EvalReport {
    /// Compute accuracy and the confusion matrix from aligned label slices.
    /// `y_true`/`y_pred` hold indices into `class_labels`.
    pub fn compute(
        model_name: impl Into<String>,
        y_true: &[usize],
        y_pred: &[usize],
        class_labels: Vec<String>,
        mut feature_importances: Vec<(String, f64)>,
    ) -> Self {
        let n_classes = class_labels.len();
        let mut confusion = vec![vec![0usize; n_classes]; n_classes];
        let mut correct = 0usize;

        for (&t, &p) in y_true.iter().zip(y_pred) {
            if t < n_classes && p < n_classes {
                confusion[t][p] += 1;
            }
            if t == p {
                correct += 1;
            }
        }

        let accuracy = if y_true.is_empty() {
            0.0
        } else {
            correct as f64 / y_true.len() as f64
        };

        feature_importances
            .sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        Self {
            model_name: model_name.into(),
            accuracy,
            confusion_matrix: confusion,
            class_labels,
            feature_importances,
            n_samples: y_true.len(),
        }
    }

    /// Per-class recall (diagonal over row sum); 0 for classes with no
    /// held-out samples.
    pub fn recall(&self, class_idx: usize) -> f64 {
        let row = &self.confusion_matrix[class_idx];
        let total: usize = row.iter().sum();
        if total == 0 {
            0.0
        } else {
            row[class_idx] as f64 / total as f64
        }
    }
}

impl fmt::Display for EvalReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} classifier: accuracy {:.2}% on {} held-out samples",
            self.model_name,
            self.accuracy * 100.0,
            self.n_samples
        )?;

        writeln!(f, "confusion matrix (rows = actual, cols = predicted):")?;
        write!(f, "{:>12}", "")?;
        for label in &self.class_labels {
            write!(f, "{label:>10}")?;
        }
        writeln!(f)?;
        for (label, row) in self.class_labels.iter().zip(&self.confusion_matrix) {
            write!(f, "{label:>12}")?;
            for count in row {
                write!(f, "{count:>10}")?;
            }
            writeln!(f)?;
        }

        writeln!(f, "feature importance:")?;
        for (name, importance) in &self.feature_importances {
            writeln!(f, "{name:>12}  {importance:.4}")?;
        }
        Ok(())
    }
}
