//! Majority voting over neighbor labels.
//!
//! Counts are kept in first-seen order so that ties resolve to the label
//! encountered first in the supplied sequence, independent of hashing.

use crate::data_handling::{LabelColumn, Record};
use crate::error::{KnnError, Result};

/// Label counts in first-seen order.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelTally<L> {
    counts: Vec<(L, usize)>,
}

impl<L> Default for LabelTally<L> {
    fn default() -> Self {
        Self { counts: Vec::new() }
    }
}

impl<L: PartialEq> LabelTally<L> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, label: L) {
        match self.counts.iter_mut().find(|(seen, _)| *seen == label) {
            Some((_, count)) => *count += 1,
            None => self.counts.push((label, 1)),
        }
    }

    /// Number of distinct labels.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn count(&self, label: &L) -> usize {
        self.counts
            .iter()
            .find(|(seen, _)| seen == label)
            .map_or(0, |(_, count)| *count)
    }

    /// Labels with their counts, in first-seen order.
    pub fn counts(&self) -> &[(L, usize)] {
        &self.counts
    }

    /// The label with the highest count; the earliest seen wins a tie.
    pub fn most_common(&self) -> Option<(&L, usize)> {
        let mut best: Option<(&L, usize)> = None;
        for (label, count) in &self.counts {
            // strictly greater keeps the first label on ties
            if best.map_or(true, |(_, best_count)| *count > best_count) {
                best = Some((label, *count));
            }
        }
        best
    }

    pub fn into_most_common(self) -> Option<L> {
        let mut best: Option<(L, usize)> = None;
        for (label, count) in self.counts {
            if best.as_ref().map_or(true, |(_, best_count)| count > *best_count) {
                best = Some((label, count));
            }
        }
        best.map(|(label, _)| label)
    }
}

impl<L: PartialEq> FromIterator<L> for LabelTally<L> {
    fn from_iter<I: IntoIterator<Item = L>>(iter: I) -> Self {
        let mut tally = LabelTally::new();
        for label in iter {
            tally.add(label);
        }
        tally
    }
}

/// Most frequent `label(item)` across `items`.
///
/// Returns [`KnnError::EmptyNeighborSet`] when `items` is empty. On an exact
/// tie the label encountered first wins.
pub fn majority_label<I, F, L>(items: I, label: F) -> Result<L>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> L,
    L: PartialEq,
{
    items
        .into_iter()
        .map(label)
        .collect::<LabelTally<L>>()
        .into_most_common()
        .ok_or(KnnError::EmptyNeighborSet)
}

/// Majority vote over `label` of each record, skipping records without one.
pub fn majority_of<'a, I>(records: I, label: LabelColumn) -> Result<&'a str>
where
    I: IntoIterator<Item = &'a Record>,
{
    majority_label(records.into_iter().filter_map(|r| label.select(r)), |l| l)
}

/// Most common first event among `records`.
///
/// Only the first event of each record votes; records without events are
/// skipped, and [`KnnError::EmptyNeighborSet`] is returned if none vote.
pub fn majority_event<'a, I>(records: I) -> Result<&'a str>
where
    I: IntoIterator<Item = &'a Record>,
{
    majority_of(records, LabelColumn::Event)
}

/// Most common sport among `records`.
pub fn majority_sport<'a, I>(records: I) -> Result<&'a str>
where
    I: IntoIterator<Item = &'a Record>,
{
    majority_label(records, |r: &'a Record| r.sport.as_str())
}
