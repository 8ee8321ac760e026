use serde::{Deserialize, Serialize};

use crate::data_handling::{FeatureColumn, LabelColumn};
use crate::preprocessing::DegenerateColumns;

/// Central configuration for classification and cross-validation.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct KnnConfig {
    /// Number of neighbors that vote.
    pub k: usize,
    /// Feature columns, in the order points are built.
    pub features: Vec<FeatureColumn>,
    /// Attribute being predicted.
    pub label: LabelColumn,
    /// Min-max scale features before searching.
    pub scale_features: bool,
    pub degenerate_columns: DegenerateColumns,
    /// Log cross-validation progress every this many held-out records (0 disables it).
    pub progress_interval: usize,
    /// Evaluate held-out records on the rayon thread pool.
    pub parallel: bool,
    /// Only hold out this many randomly chosen records.
    pub sample: Option<usize>,
    pub seed: u64,
}

impl Default for KnnConfig {
    fn default() -> Self {
        Self {
            k: 20,
            features: FeatureColumn::ALL.to_vec(),
            label: LabelColumn::Sport,
            scale_features: true,
            degenerate_columns: DegenerateColumns::Fail,
            progress_interval: 500,
            parallel: false,
            sample: None,
            seed: 42,
        }
    }
}

impl KnnConfig {
    pub fn new(k: usize, label: LabelColumn) -> Self {
        Self {
            k,
            label,
            ..Self::default()
        }
    }
}
