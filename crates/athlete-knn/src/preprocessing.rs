//! Min-max feature scaling.
//!
//! Scaling is split in two steps: [`fit`] computes per-column bounds once
//! over a dataset, and [`transform`] maps any point into `[0, 1]^d` with
//! those bounds. Query points must be transformed with the parameters fitted
//! on the dataset so that distances stay comparable.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::data_handling::FeaturePoint;
use crate::error::{KnnError, Result};

/// Reads one numeric feature from a row.
///
/// Implemented by the named [`FeatureColumn`](crate::data_handling::FeatureColumn)
/// selector for athlete records, and by `usize` for positional access into
/// plain numeric rows.
pub trait FeatureSelector<R: ?Sized> {
    fn value(&self, row: &R) -> f64;
}

/// # Panics
///
/// Panics if the index is out of bounds for `row`. [`cols_minmax`] checks the
/// indices first.
impl<R: AsRef<[f64]>> FeatureSelector<R> for usize {
    fn value(&self, row: &R) -> f64 {
        row.as_ref()[*self]
    }
}

/// What to do with a column whose minimum equals its maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegenerateColumns {
    /// Raise [`KnnError::DegenerateRange`].
    #[default]
    Fail,
    /// Treat the column as having unit range: the value is shifted by the
    /// column minimum but not divided.
    UnitRange,
}

impl FromStr for DegenerateColumns {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "fail" => Ok(DegenerateColumns::Fail),
            "unit_range" => Ok(DegenerateColumns::UnitRange),
            _ => Err(format!(
                "Unknown degenerate column policy: {}. Expected 'fail' or 'unit-range'",
                s
            )),
        }
    }
}

/// Per-dimension bounds fitted on a dataset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScaleParameters {
    mins: Vec<f64>,
    maxes: Vec<f64>,
}

impl ScaleParameters {
    pub fn new(mins: Vec<f64>, maxes: Vec<f64>) -> Result<Self> {
        if mins.len() != maxes.len() {
            return Err(KnnError::DimensionMismatch {
                expected: mins.len(),
                found: maxes.len(),
            });
        }
        Ok(Self { mins, maxes })
    }

    pub fn mins(&self) -> &[f64] {
        &self.mins
    }

    pub fn maxes(&self) -> &[f64] {
        &self.maxes
    }

    /// Number of feature dimensions.
    pub fn len(&self) -> usize {
        self.mins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mins.is_empty()
    }

    /// Dimensions whose minimum equals their maximum.
    pub fn degenerate_dimensions(&self) -> Vec<usize> {
        self.mins
            .iter()
            .zip(self.maxes.iter())
            .enumerate()
            .filter_map(|(i, (min, max))| if min == max { Some(i) } else { None })
            .collect()
    }
}

/// Fit min/max bounds for each selector over all `rows`.
///
/// Returns [`KnnError::EmptyDataset`] when `rows` is empty.
pub fn fit<R, S>(rows: &[R], selectors: &[S]) -> Result<ScaleParameters>
where
    S: FeatureSelector<R>,
{
    if rows.is_empty() {
        return Err(KnnError::EmptyDataset);
    }

    let mut mins = Vec::with_capacity(selectors.len());
    let mut maxes = Vec::with_capacity(selectors.len());

    for selector in selectors {
        let (min, max) = rows.iter().map(|row| selector.value(row)).fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(min, max), v| (min.min(v), max.max(v)),
        );
        mins.push(min);
        maxes.push(max);
    }

    Ok(ScaleParameters { mins, maxes })
}

/// Min and max of the columns `column_indices` of plain numeric rows.
///
/// `cols_minmax(&[[1., 2., 5.], [4., 3., 4.]], &[1, 2])` yields mins `[2, 4]`
/// and maxes `[3, 5]`. An index past the end of any row is a
/// [`KnnError::DimensionMismatch`].
pub fn cols_minmax<R: AsRef<[f64]>>(
    rows: &[R],
    column_indices: &[usize],
) -> Result<ScaleParameters> {
    for row in rows {
        let row_len = row.as_ref().len();
        if let Some(&index) = column_indices.iter().find(|&&index| index >= row_len) {
            return Err(KnnError::DimensionMismatch {
                expected: row_len,
                found: index + 1,
            });
        }
    }
    fit(rows, column_indices)
}

/// Scale `point` into `[0, 1]` per dimension with the fitted `params`.
pub fn transform(point: &[f64], params: &ScaleParameters) -> Result<FeaturePoint> {
    transform_with(point, params, DegenerateColumns::Fail)
}

/// Like [`transform`], with an explicit policy for zero-range columns.
pub fn transform_with(
    point: &[f64],
    params: &ScaleParameters,
    degenerate: DegenerateColumns,
) -> Result<FeaturePoint> {
    if point.len() != params.len() {
        return Err(KnnError::DimensionMismatch {
            expected: params.len(),
            found: point.len(),
        });
    }

    point
        .iter()
        .zip(params.mins.iter().zip(params.maxes.iter()))
        .enumerate()
        .map(|(dimension, (&value, (&min, &max)))| {
            let range = max - min;
            if range == 0.0 {
                match degenerate {
                    DegenerateColumns::Fail => Err(KnnError::DegenerateRange {
                        dimension,
                        value: min,
                    }),
                    DegenerateColumns::UnitRange => Ok(value - min),
                }
            } else {
                Ok((value - min) / range)
            }
        })
        .collect()
}

/// Transform every row with the same parameters.
pub fn transform_all<P: AsRef<[f64]>>(
    points: &[P],
    params: &ScaleParameters,
    degenerate: DegenerateColumns,
) -> Result<Vec<FeaturePoint>> {
    points
        .iter()
        .map(|p| transform_with(p.as_ref(), params, degenerate))
        .collect()
}
