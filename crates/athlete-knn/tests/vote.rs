//! Integration tests for majority voting.

use athlete_knn::data_handling::{LabelColumn, MedalCount, Record};
use athlete_knn::models::vote::{
    majority_event, majority_label, majority_of, majority_sport, LabelTally,
};
use athlete_knn::KnnError;

fn athlete(sport: &str, events: &[&str]) -> Record {
    Record {
        name: String::new(),
        country: String::new(),
        age: 25.0,
        height: 180.0,
        weight: 75.0,
        gender: "F".to_string(),
        date_of_birth: String::new(),
        place_of_birth: String::new(),
        medals: MedalCount::default(),
        sport: sport.to_string(),
        events: events.iter().map(|e| e.to_string()).collect(),
    }
}

// ---------------------------------------------------------------------------
// majority_label
// ---------------------------------------------------------------------------

#[test]
fn majority_label_strict_winner() {
    let labels = ["Judo", "Rowing", "Rowing", "Judo", "Rowing"];
    assert_eq!(majority_label(labels.iter(), |l| *l).unwrap(), "Rowing");
}

#[test]
fn majority_label_tie_goes_to_first_encountered() {
    let labels = ["Swimming", "Athletics", "Athletics", "Swimming"];
    assert_eq!(majority_label(labels.iter(), |l| *l).unwrap(), "Swimming");

    let reversed = ["Athletics", "Swimming", "Swimming", "Athletics"];
    assert_eq!(majority_label(reversed.iter(), |l| *l).unwrap(), "Athletics");
}

#[test]
fn majority_label_tie_ignores_which_label_reached_the_count_first() {
    // "b" reaches two votes before "a" does, but "a" was seen first
    let labels = ["a", "b", "b", "a"];
    assert_eq!(majority_label(labels.iter(), |l| *l).unwrap(), "a");
}

#[test]
fn majority_label_empty_errors() {
    let labels: Vec<&str> = vec![];
    assert_eq!(
        majority_label(labels.iter(), |l| *l).unwrap_err(),
        KnnError::EmptyNeighborSet
    );
}

#[test]
fn majority_sport_over_records() {
    let records = vec![
        athlete("Cycling", &[]),
        athlete("Hockey", &[]),
        athlete("Hockey", &[]),
    ];
    assert_eq!(majority_sport(&records).unwrap(), "Hockey");
}

// ---------------------------------------------------------------------------
// majority_event
// ---------------------------------------------------------------------------

#[test]
fn majority_event_uses_first_event_only() {
    let records = vec![
        athlete("Athletics", &["100m", "200m"]),
        athlete("Athletics", &["200m", "100m"]),
        athlete("Athletics", &["100m"]),
        athlete("Athletics", &["4x100m", "200m", "200m"]),
    ];
    assert_eq!(majority_event(&records).unwrap(), "100m");
}

#[test]
fn majority_event_skips_records_without_events() {
    let records = vec![athlete("Judo", &[]), athlete("Judo", &["-73kg"]), athlete("Judo", &[])];
    assert_eq!(majority_event(&records).unwrap(), "-73kg");
}

#[test]
fn majority_event_without_any_events_errors() {
    let records = vec![athlete("Judo", &[]), athlete("Judo", &[])];
    assert_eq!(majority_event(&records).unwrap_err(), KnnError::EmptyNeighborSet);
}

#[test]
fn majority_of_selects_label_column() {
    let records = vec![
        athlete("Sailing", &["Laser"]),
        athlete("Rowing", &["Eight"]),
        athlete("Rowing", &["Laser"]),
    ];
    assert_eq!(majority_of(&records, LabelColumn::Sport).unwrap(), "Rowing");
    assert_eq!(majority_of(&records, LabelColumn::Event).unwrap(), "Laser");
}

// ---------------------------------------------------------------------------
// LabelTally
// ---------------------------------------------------------------------------

#[test]
fn label_tally_keeps_first_seen_order() {
    let tally: LabelTally<&str> = ["c", "a", "c", "b", "a", "c"].into_iter().collect();
    assert_eq!(tally.counts(), &[("c", 3), ("a", 2), ("b", 1)]);
    assert_eq!(tally.count(&"a"), 2);
    assert_eq!(tally.count(&"z"), 0);
    assert_eq!(tally.most_common(), Some((&"c", 3)));
    assert_eq!(tally.len(), 3);
}

#[test]
fn label_tally_empty() {
    let tally: LabelTally<String> = LabelTally::new();
    assert!(tally.is_empty());
    assert_eq!(tally.most_common(), None);
}
