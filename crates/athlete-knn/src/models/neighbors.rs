//! Exhaustive nearest-neighbor search.
//!
//! Every point is compared against the query and the list is stable-sorted
//! by distance, so equal distances keep their input order. The datasets this
//! crate targets are small enough that an index structure does not pay off.

use crate::data_handling::Record;
use crate::error::{KnnError, Result};
use crate::math::distance::euclidean;

/// Position of a point in the searched slice and its distance to the query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub index: usize,
    pub distance: f64,
}

/// Return the `k` points closest to `query`, ascending by distance.
///
/// Requires `1 <= k <= points.len()`, otherwise [`KnnError::InvalidK`].
/// Ties keep the order of `points`.
pub fn find_nearest<P: AsRef<[f64]>>(
    query: &[f64],
    points: &[P],
    k: usize,
) -> Result<Vec<Neighbor>> {
    if k == 0 || k > points.len() {
        return Err(KnnError::InvalidK {
            k,
            max: points.len(),
        });
    }

    let mut neighbors = points
        .iter()
        .enumerate()
        .map(|(index, point)| {
            euclidean(query, point.as_ref()).map(|distance| Neighbor { index, distance })
        })
        .collect::<Result<Vec<_>>>()?;

    // `sort_by` is stable
    neighbors.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    neighbors.truncate(k);

    Ok(neighbors)
}

/// A neighbor resolved to its record.
#[derive(Debug, Clone, Copy)]
pub struct NeighborRecord<'a> {
    /// Index of the record in the searched dataset.
    pub index: usize,
    pub record: &'a Record,
    pub distance: f64,
}

/// Records closest to a query, ascending by distance.
#[derive(Debug, Clone)]
pub struct NeighborSet<'a> {
    neighbors: Vec<NeighborRecord<'a>>,
}

impl<'a> NeighborSet<'a> {
    /// Pair each neighbor with its record in `records`.
    pub fn resolve(records: &'a [Record], neighbors: Vec<Neighbor>) -> Self {
        let neighbors = neighbors
            .into_iter()
            .map(|n| NeighborRecord {
                index: n.index,
                record: &records[n.index],
                distance: n.distance,
            })
            .collect();
        NeighborSet { neighbors }
    }

    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NeighborRecord<'a>> {
        self.neighbors.iter()
    }

    pub fn records(&self) -> impl Iterator<Item = &'a Record> + '_ {
        self.neighbors.iter().map(|n| n.record)
    }

    pub fn distances(&self) -> Vec<f64> {
        self.neighbors.iter().map(|n| n.distance).collect()
    }

    /// Drop the entry for dataset index `index` (if present) and keep at most `k`.
    ///
    /// Matching is by index, so another record at distance zero stays in the set.
    pub fn excluding(mut self, index: usize, k: usize) -> Self {
        self.neighbors.retain(|n| n.index != index);
        self.neighbors.truncate(k);
        self
    }
}
