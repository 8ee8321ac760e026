use crate::config::KnnConfig;
use crate::data_handling::{AthleteSet, FeaturePoint, LabelColumn, Record};
use crate::error::{KnnError, Result};
use crate::models::neighbors::NeighborSet;
use crate::models::vote::{majority_event, majority_of};

/// A k-NN classifier holding its dataset and the scale fitted on it.
#[derive(Debug, Clone)]
pub struct KnnClassifier {
    dataset: AthleteSet,
    k: usize,
    label: LabelColumn,
}

/// Outcome of classifying one query.
#[derive(Debug, Clone)]
pub struct Prediction<'a> {
    /// The query in the dataset's feature space (scaled when scaling is on).
    pub point: FeaturePoint,
    pub neighbors: NeighborSet<'a>,
    /// Majority value of the configured label column.
    pub label: &'a str,
    /// Most common first event among the neighbors, if any of them has one.
    pub event: Option<&'a str>,
}

impl KnnClassifier {
    /// Build the search space from `records` according to `config`.
    ///
    /// # Arguments
    ///
    /// * `records` - Cleaned athlete records
    /// * `config` - Feature columns, scaling, label and k
    ///
    /// # Returns
    ///
    /// A classifier, or an error if the data is empty, k does not fit the
    /// dataset, or a feature column cannot be scaled.
    pub fn fit(records: Vec<Record>, config: &KnnConfig) -> Result<Self> {
        if records.is_empty() {
            return Err(KnnError::EmptyDataset);
        }
        if config.k == 0 || config.k > records.len() {
            return Err(KnnError::InvalidK {
                k: config.k,
                max: records.len(),
            });
        }

        let dataset = if config.scale_features {
            AthleteSet::scaled(records, &config.features, config.degenerate_columns)?
        } else {
            AthleteSet::new(records, &config.features)
        };

        Ok(KnnClassifier {
            dataset,
            k: config.k,
            label: config.label,
        })
    }

    pub fn dataset(&self) -> &AthleteSet {
        &self.dataset
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Classify a raw (unscaled) feature point.
    pub fn predict(&self, raw: &[f64]) -> Result<Prediction<'_>> {
        let point = self.dataset.prepare_query(raw)?;
        let neighbors = self.dataset.nearest(&point, self.k)?;
        log::debug!(
            "Query {:?} -> nearest distances {:?}",
            point,
            neighbors.distances()
        );

        let label = majority_of(neighbors.records(), self.label)?;
        let event = match majority_event(neighbors.records()) {
            Ok(event) => Some(event),
            Err(KnnError::EmptyNeighborSet) => None,
            Err(e) => return Err(e),
        };

        Ok(Prediction {
            point,
            neighbors,
            label,
            event,
        })
    }
}
