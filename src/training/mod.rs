//! Model training module
//!
//! Fits the binary rain classifier and the three-class comfort classifier
//! on one shared train/eval partition and bundles them, with the feature
//! schema, into a [`TrainedArtifact`](crate::artifact::TrainedArtifact).

mod config;
mod metrics;
mod pipeline;
pub mod forest;
pub mod tree;

pub use config::TrainingConfig;
pub use forest::{MaxFeatures, RandomForest};
pub use metrics::EvalReport;
pub use pipeline::{train, TrainingOutcome};
pub use tree::{Criterion, DecisionTree, TreeNode};
