//! Leave-one-out cross-validation.
//!
//! Every held-out record is classified from its `k` nearest other records.
//! The search runs over the whole dataset with `k + 1` neighbors and the
//! held-out record's own entry is removed by index, so a duplicate record at
//! distance zero still counts as a neighbor.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::config::KnnConfig;
use crate::data_handling::{AthleteSet, FeatureColumn, LabelColumn, Record};
use crate::error::{KnnError, Result};
use crate::models::vote::majority_of;
use crate::preprocessing::DegenerateColumns;

/// Counts gathered by a cross-validation run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossValidationReport {
    pub k: usize,
    pub label: LabelColumn,
    pub correct: usize,
    pub incorrect: usize,
    /// Accuracy of always predicting the most common label of the dataset.
    pub baseline: f64,
}

impl CrossValidationReport {
    /// Number of held-out records.
    pub fn evaluated(&self) -> usize {
        self.correct + self.incorrect
    }

    /// `correct / (correct + incorrect)`.
    pub fn accuracy(&self) -> f64 {
        if self.evaluated() == 0 {
            return 0.0;
        }
        self.correct as f64 / self.evaluated() as f64
    }
}

/// Leave-one-out evaluation settings.
#[derive(Debug, Clone)]
pub struct CrossValidator {
    k: usize,
    label: LabelColumn,
    scale_features: bool,
    degenerate: DegenerateColumns,
    progress_interval: usize,
    parallel: bool,
    sample: Option<usize>,
    seed: u64,
}

impl CrossValidator {
    /// Scaled, sequential evaluation of every record, predicting the sport.
    pub fn new(k: usize) -> Self {
        Self::from_config(&KnnConfig {
            k,
            ..KnnConfig::default()
        })
    }

    pub fn from_config(config: &KnnConfig) -> Self {
        CrossValidator {
            k: config.k,
            label: config.label,
            scale_features: config.scale_features,
            degenerate: config.degenerate_columns,
            progress_interval: config.progress_interval,
            parallel: config.parallel,
            sample: config.sample,
            seed: config.seed,
        }
    }

    pub fn label(mut self, label: LabelColumn) -> Self {
        self.label = label;
        self
    }

    pub fn scale_features(mut self, scale: bool) -> Self {
        self.scale_features = scale;
        self
    }

    pub fn degenerate_columns(mut self, degenerate: DegenerateColumns) -> Self {
        self.degenerate = degenerate;
        self
    }

    /// Log progress every `interval` held-out records; 0 disables it.
    pub fn progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval;
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Hold out only `size` records chosen with a `seed`ed RNG.
    pub fn sample(mut self, size: Option<usize>, seed: u64) -> Self {
        self.sample = size;
        self.seed = seed;
        self
    }

    /// Scale `records` (if enabled) and run the evaluation.
    pub fn evaluate(
        &self,
        records: &[Record],
        columns: &[FeatureColumn],
    ) -> Result<CrossValidationReport> {
        if records.is_empty() {
            return Err(KnnError::EmptyDataset);
        }
        let dataset = if self.scale_features {
            AthleteSet::scaled(records.to_vec(), columns, self.degenerate)?
        } else {
            AthleteSet::new(records.to_vec(), columns)
        };
        self.evaluate_set(&dataset)
    }

    /// Run the evaluation on points that are already prepared.
    pub fn evaluate_set(&self, dataset: &AthleteSet) -> Result<CrossValidationReport> {
        let n = dataset.len();
        if n == 0 {
            return Err(KnnError::EmptyDataset);
        }
        // one extra neighbor is fetched for the held-out record itself
        if self.k == 0 || self.k >= n {
            return Err(KnnError::InvalidK {
                k: self.k,
                max: n - 1,
            });
        }

        let held_out = self.held_out_indices(n);
        log::info!(
            "Cross-validating {} of {} records with k={} ({})",
            held_out.len(),
            n,
            self.k,
            self.label.name()
        );

        let (correct, incorrect) = if self.parallel {
            let outcomes = held_out
                .par_iter()
                .map(|&i| self.classify_held_out(dataset, i))
                .collect::<Result<Vec<bool>>>()?;
            let correct = outcomes.iter().filter(|&&ok| ok).count();
            (correct, outcomes.len() - correct)
        } else {
            self.run_sequential(dataset, &held_out)?
        };

        let baseline = match dataset.most_common_label(self.label) {
            Some(common) => {
                let hits = held_out
                    .iter()
                    .filter(|&&i| self.label.select(&dataset.records()[i]) == Some(common))
                    .count();
                hits as f64 / held_out.len() as f64
            }
            None => 0.0,
        };

        let report = CrossValidationReport {
            k: self.k,
            label: self.label,
            correct,
            incorrect,
            baseline,
        };
        log::info!(
            "Final accuracy={:.4} (baseline {:.4})",
            report.accuracy(),
            report.baseline
        );
        Ok(report)
    }

    fn run_sequential(&self, dataset: &AthleteSet, held_out: &[usize]) -> Result<(usize, usize)> {
        let mut correct = 0;
        let mut incorrect = 0;

        for (position, &i) in held_out.iter().enumerate() {
            if self.classify_held_out(dataset, i)? {
                correct += 1;
            } else {
                incorrect += 1;
            }

            if self.progress_interval > 0 && position % self.progress_interval == 0 {
                log::info!(
                    "{} of {}, accuracy so far={:.4}",
                    position,
                    held_out.len(),
                    correct as f64 / (correct + incorrect) as f64
                );
            }
        }

        Ok((correct, incorrect))
    }

    /// Whether record `index` is predicted correctly from its neighbors.
    ///
    /// A record whose neighbors carry no label at all counts as incorrect.
    fn classify_held_out(&self, dataset: &AthleteSet, index: usize) -> Result<bool> {
        let point = &dataset.points()[index];
        let neighbors = dataset
            .nearest(point, self.k + 1)?
            .excluding(index, self.k);

        let actual = self.label.select(&dataset.records()[index]);
        match majority_of(neighbors.records(), self.label) {
            Ok(predicted) => Ok(actual == Some(predicted)),
            Err(KnnError::EmptyNeighborSet) => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn held_out_indices(&self, n: usize) -> Vec<usize> {
        match self.sample {
            Some(size) if size > 0 && size < n => {
                let mut rng = StdRng::seed_from_u64(self.seed);
                let mut indices = rand::seq::index::sample(&mut rng, n, size).into_vec();
                indices.sort_unstable();
                indices
            }
            _ => (0..n).collect(),
        }
    }
}

/// Fraction of records whose `label` is predicted correctly by k-NN over the
/// remaining records, with features min-max scaled over the whole dataset.
///
/// Fails with [`KnnError::EmptyDataset`] for no records and
/// [`KnnError::InvalidK`] unless `1 <= k < records.len()`.
pub fn leave_one_out_accuracy(
    records: &[Record],
    columns: &[FeatureColumn],
    label: LabelColumn,
    k: usize,
) -> Result<f64> {
    CrossValidator::new(k)
        .label(label)
        .progress_interval(0)
        .evaluate(records, columns)
        .map(|report| report.accuracy())
}
