//! Athlete records and the in-memory dataset the classifier searches.
//!
//! This module defines `Record`, the named `FeatureColumn` / `LabelColumn`
//! selectors, and `AthleteSet`, which keeps records together with their
//! (optionally scaled) feature points and the scale parameters used.
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{KnnError, Result};
use crate::models::neighbors::{find_nearest, NeighborSet};
use crate::models::vote::LabelTally;
use crate::preprocessing::{self, DegenerateColumns, FeatureSelector, ScaleParameters};

/// Ordered numeric feature vector, one value per selected column.
pub type FeaturePoint = Vec<f64>;

/// Medal counts of one athlete. Blank cells load as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedalCount {
    pub gold: u32,
    pub silver: u32,
    pub bronze: u32,
    pub total: u32,
}

/// One athlete. Records are read-only once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub name: String,
    pub country: String,
    /// Years
    pub age: f64,
    /// Centimetres
    pub height: f64,
    /// Kilograms
    pub weight: f64,
    pub gender: String,
    pub date_of_birth: String,
    pub place_of_birth: String,
    pub medals: MedalCount,
    pub sport: String,
    /// Events in file order. Only the first one is used as a label.
    pub events: Vec<String>,
}

impl Record {
    pub fn first_event(&self) -> Option<&str> {
        self.events.first().map(String::as_str)
    }

    /// Raw feature values for `columns`, in selector order.
    pub fn feature_point(&self, columns: &[FeatureColumn]) -> FeaturePoint {
        columns.iter().map(|c| c.value(self)).collect()
    }
}

/// Numeric record fields usable as features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureColumn {
    Age,
    Height,
    Weight,
}

impl FeatureColumn {
    /// Age, height, weight: the feature order used by default.
    pub const ALL: [FeatureColumn; 3] = [
        FeatureColumn::Age,
        FeatureColumn::Height,
        FeatureColumn::Weight,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FeatureColumn::Age => "age",
            FeatureColumn::Height => "height",
            FeatureColumn::Weight => "weight",
        }
    }
}

impl FeatureSelector<Record> for FeatureColumn {
    fn value(&self, row: &Record) -> f64 {
        match self {
            FeatureColumn::Age => row.age,
            FeatureColumn::Height => row.height,
            FeatureColumn::Weight => row.weight,
        }
    }
}

impl FromStr for FeatureColumn {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "age" => Ok(FeatureColumn::Age),
            "height" => Ok(FeatureColumn::Height),
            "weight" => Ok(FeatureColumn::Weight),
            _ => Err(format!(
                "Unknown feature column: {}. Expected one of 'age', 'height', 'weight'",
                s
            )),
        }
    }
}

/// Categorical record fields usable as the predicted label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelColumn {
    #[default]
    Sport,
    /// The first event of the record.
    Event,
}

impl LabelColumn {
    /// The label of `record`, or `None` when it has none (an athlete without events).
    pub fn select<'r>(&self, record: &'r Record) -> Option<&'r str> {
        match self {
            LabelColumn::Sport => Some(record.sport.as_str()),
            LabelColumn::Event => record.first_event(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LabelColumn::Sport => "sport",
            LabelColumn::Event => "event",
        }
    }
}

impl FromStr for LabelColumn {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sport" => Ok(LabelColumn::Sport),
            "event" => Ok(LabelColumn::Event),
            _ => Err(format!("Unknown label column: {}. Expected 'sport' or 'event'", s)),
        }
    }
}

#[derive(Debug, Clone)]
struct Scaling {
    params: ScaleParameters,
    degenerate: DegenerateColumns,
}

/// Records with their feature points, ready for neighbor search.
#[derive(Debug, Clone)]
pub struct AthleteSet {
    records: Vec<Record>,
    columns: Vec<FeatureColumn>,
    points: Vec<FeaturePoint>,
    scaling: Option<Scaling>,
}

impl AthleteSet {
    /// Use raw feature values as points.
    pub fn new(records: Vec<Record>, columns: &[FeatureColumn]) -> Self {
        let points = records.iter().map(|r| r.feature_point(columns)).collect();
        AthleteSet {
            records,
            columns: columns.to_vec(),
            points,
            scaling: None,
        }
    }

    /// Fit min-max parameters over `records` and scale every point with them.
    pub fn scaled(
        records: Vec<Record>,
        columns: &[FeatureColumn],
        degenerate: DegenerateColumns,
    ) -> Result<Self> {
        let params = preprocessing::fit(&records, columns)?;
        let degenerate_dims = params.degenerate_dimensions();
        if !degenerate_dims.is_empty() {
            log::warn!(
                "Feature columns without variance: {:?}",
                degenerate_dims
                    .iter()
                    .map(|&i| columns[i].name())
                    .collect::<Vec<_>>()
            );
        }

        let raw = records
            .iter()
            .map(|r| r.feature_point(columns))
            .collect::<Vec<_>>();
        let points = preprocessing::transform_all(&raw, &params, degenerate)?;

        Ok(AthleteSet {
            records,
            columns: columns.to_vec(),
            points,
            scaling: Some(Scaling { params, degenerate }),
        })
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Feature points in record order; scaled when the set was built with [`AthleteSet::scaled`].
    pub fn points(&self) -> &[FeaturePoint] {
        &self.points
    }

    pub fn scale_parameters(&self) -> Option<&ScaleParameters> {
        self.scaling.as_ref().map(|s| &s.params)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Bring a raw query into the same space as [`AthleteSet::points`].
    pub fn prepare_query(&self, raw: &[f64]) -> Result<FeaturePoint> {
        if raw.len() != self.columns.len() {
            return Err(KnnError::DimensionMismatch {
                expected: self.columns.len(),
                found: raw.len(),
            });
        }
        match &self.scaling {
            Some(scaling) => {
                preprocessing::transform_with(raw, &scaling.params, scaling.degenerate)
            }
            None => Ok(raw.to_vec()),
        }
    }

    /// The `k` records closest to an already prepared `query`.
    pub fn nearest(&self, query: &[f64], k: usize) -> Result<NeighborSet<'_>> {
        let neighbors = find_nearest(query, &self.points, k)?;
        Ok(NeighborSet::resolve(&self.records, neighbors))
    }

    /// Most frequent value of `label` across the whole set.
    pub fn most_common_label(&self, label: LabelColumn) -> Option<&str> {
        let mut tally = LabelTally::new();
        for record in &self.records {
            if let Some(value) = label.select(record) {
                tally.add(value);
            }
        }
        tally.most_common().map(|(value, _)| *value)
    }

    pub fn log_input_data_summary(&self) {
        let mut sports = LabelTally::new();
        for record in &self.records {
            sports.add(record.sport.as_str());
        }
        log::info!("----- Input Data Summary -----");
        log::info!(
            "{} athletes across {} sports",
            self.records.len(),
            sports.len()
        );
        if let Ok(params) = preprocessing::fit(&self.records, &self.columns) {
            for (i, column) in self.columns.iter().enumerate() {
                log::info!(
                    "{}: min {} max {}",
                    column.name(),
                    params.mins()[i],
                    params.maxes()[i]
                );
            }
        }
        if let Some((sport, count)) = sports.most_common() {
            log::info!("Most common sport: {} ({} athletes)", sport, count);
        }
        log::info!("-------------------------------");
    }
}
