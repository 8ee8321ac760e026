//! Integration tests for leave-one-out cross-validation.

use athlete_knn::config::KnnConfig;
use athlete_knn::cross_validation::{leave_one_out_accuracy, CrossValidator};
use athlete_knn::data_handling::{FeatureColumn, LabelColumn, MedalCount, Record};
use athlete_knn::preprocessing::DegenerateColumns;
use athlete_knn::KnnError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn athlete(age: f64, height: f64, weight: f64, sport: &str) -> Record {
    Record {
        name: String::new(),
        country: String::new(),
        age,
        height,
        weight,
        gender: "M".to_string(),
        date_of_birth: String::new(),
        place_of_birth: String::new(),
        medals: MedalCount::default(),
        sport: sport.to_string(),
        events: vec![format!("{} event", sport)],
    }
}

/// Ages 10, 11, 12 / 20, 21, 22 with labels A A B / B B A.
fn line_dataset() -> Vec<Record> {
    vec![
        athlete(10.0, 180.0, 70.0, "A"),
        athlete(11.0, 180.0, 70.0, "A"),
        athlete(12.0, 180.0, 70.0, "B"),
        athlete(20.0, 180.0, 70.0, "B"),
        athlete(21.0, 180.0, 70.0, "B"),
        athlete(22.0, 180.0, 70.0, "A"),
    ]
}

fn two_clusters() -> Vec<Record> {
    vec![
        athlete(18.0, 150.0, 40.0, "Gymnastics"),
        athlete(19.0, 152.0, 42.0, "Gymnastics"),
        athlete(17.0, 149.0, 39.0, "Gymnastics"),
        athlete(20.0, 151.0, 41.0, "Gymnastics"),
        athlete(28.0, 205.0, 110.0, "Basketball"),
        athlete(27.0, 210.0, 112.0, "Basketball"),
        athlete(29.0, 202.0, 105.0, "Basketball"),
        athlete(26.0, 208.0, 115.0, "Basketball"),
    ]
}

// ---------------------------------------------------------------------------
// leave_one_out_accuracy
// ---------------------------------------------------------------------------

#[test]
fn separated_clusters_are_fully_predicted() {
    let accuracy =
        leave_one_out_accuracy(&two_clusters(), &FeatureColumn::ALL, LabelColumn::Sport, 3).unwrap();
    assert_eq!(accuracy, 1.0);
}

#[test]
fn identical_records_without_scaling_are_fully_predicted() {
    let records = vec![athlete(25.0, 180.0, 75.0, "Rowing"); 5];
    for k in 1..5 {
        let report = CrossValidator::new(k)
            .scale_features(false)
            .evaluate(&records, &FeatureColumn::ALL)
            .unwrap();
        assert_eq!(report.accuracy(), 1.0);
        assert_eq!(report.evaluated(), 5);
    }
}

#[test]
fn identical_records_with_unit_range_policy_are_fully_predicted() {
    let records = vec![athlete(25.0, 180.0, 75.0, "Rowing"); 4];
    let report = CrossValidator::new(2)
        .degenerate_columns(DegenerateColumns::UnitRange)
        .evaluate(&records, &FeatureColumn::ALL)
        .unwrap();
    assert_eq!(report.accuracy(), 1.0);
}

#[test]
fn identical_records_with_scaling_raise_degenerate_range() {
    let records = vec![athlete(25.0, 180.0, 75.0, "Rowing"); 4];
    let err = leave_one_out_accuracy(&records, &FeatureColumn::ALL, LabelColumn::Sport, 2).unwrap_err();
    assert!(matches!(err, KnnError::DegenerateRange { dimension: 0, .. }));
}

#[test]
fn empty_dataset_errors() {
    let err = leave_one_out_accuracy(&[], &FeatureColumn::ALL, LabelColumn::Sport, 1).unwrap_err();
    assert_eq!(err, KnnError::EmptyDataset);
}

#[test]
fn k_must_leave_room_for_the_held_out_record() {
    let records = two_clusters();
    let err = leave_one_out_accuracy(&records, &FeatureColumn::ALL, LabelColumn::Sport, 8).unwrap_err();
    assert_eq!(err, KnnError::InvalidK { k: 8, max: 7 });

    let err = leave_one_out_accuracy(&records, &FeatureColumn::ALL, LabelColumn::Sport, 0).unwrap_err();
    assert_eq!(err, KnnError::InvalidK { k: 0, max: 7 });
}

// ---------------------------------------------------------------------------
// CrossValidator counts
// ---------------------------------------------------------------------------

#[test]
fn counts_match_hand_computed_neighbors() {
    let report = CrossValidator::new(1)
        .scale_features(false)
        .progress_interval(1)
        .evaluate(&line_dataset(), &[FeatureColumn::Age])
        .unwrap();

    assert_eq!(report.correct, 4);
    assert_eq!(report.incorrect, 2);
    assert!((report.accuracy() - 4.0 / 6.0).abs() < 1e-12);
    // A and B tie at three records each; A is seen first
    assert!((report.baseline - 0.5).abs() < 1e-12);
}

#[test]
fn parallel_matches_sequential() {
    let records = line_dataset();
    for k in 1..5 {
        let sequential = CrossValidator::new(k)
            .scale_features(false)
            .evaluate(&records, &[FeatureColumn::Age])
            .unwrap();
        let parallel = CrossValidator::new(k)
            .scale_features(false)
            .parallel(true)
            .evaluate(&records, &[FeatureColumn::Age])
            .unwrap();
        assert_eq!(sequential, parallel);
    }
}

#[test]
fn held_out_record_is_excluded_by_identity() {
    // records 0 and 1 share a feature point but not a label
    let records = vec![
        athlete(10.0, 180.0, 70.0, "A"),
        athlete(10.0, 180.0, 70.0, "B"),
        athlete(30.0, 180.0, 70.0, "B"),
    ];
    let report = CrossValidator::new(1)
        .scale_features(false)
        .evaluate(&records, &[FeatureColumn::Age])
        .unwrap();

    // each twin is predicted from the other; record 2 from record 0
    assert_eq!(report.correct, 0);
    assert_eq!(report.incorrect, 3);
}

#[test]
fn event_label_uses_first_event() {
    let mut records = vec![
        athlete(10.0, 150.0, 40.0, "Athletics"),
        athlete(11.0, 151.0, 41.0, "Athletics"),
        athlete(30.0, 190.0, 80.0, "Athletics"),
        athlete(31.0, 191.0, 81.0, "Athletics"),
    ];
    records[0].events = vec!["100m".to_string(), "Marathon".to_string()];
    records[1].events = vec!["100m".to_string()];
    records[2].events = vec!["Marathon".to_string(), "100m".to_string()];
    records[3].events = vec!["Marathon".to_string()];

    let accuracy = leave_one_out_accuracy(&records, &FeatureColumn::ALL, LabelColumn::Event, 1).unwrap();
    assert_eq!(accuracy, 1.0);
}

#[test]
fn neighbors_without_events_count_as_incorrect() {
    let mut records = vec![
        athlete(10.0, 150.0, 40.0, "Judo"),
        athlete(11.0, 151.0, 41.0, "Judo"),
        athlete(30.0, 190.0, 80.0, "Judo"),
    ];
    for record in &mut records {
        record.events.clear();
    }
    let report = CrossValidator::new(1)
        .label(LabelColumn::Event)
        .evaluate(&records, &FeatureColumn::ALL)
        .unwrap();
    assert_eq!(report.correct, 0);
    assert_eq!(report.baseline, 0.0);
}

#[test]
fn sampled_evaluation_holds_out_requested_count() {
    let records = two_clusters();
    let report = CrossValidator::new(3)
        .sample(Some(5), 1234)
        .evaluate(&records, &FeatureColumn::ALL)
        .unwrap();
    assert_eq!(report.evaluated(), 5);
    assert_eq!(report.accuracy(), 1.0);

    let again = CrossValidator::new(3)
        .sample(Some(5), 1234)
        .evaluate(&records, &FeatureColumn::ALL)
        .unwrap();
    assert_eq!(report, again);
}

#[test]
fn sample_larger_than_dataset_evaluates_everything() {
    let report = CrossValidator::new(3)
        .sample(Some(100), 1)
        .evaluate(&two_clusters(), &FeatureColumn::ALL)
        .unwrap();
    assert_eq!(report.evaluated(), 8);
}

#[test]
fn accuracy_is_a_fraction_of_the_dataset() {
    let mut rng = StdRng::seed_from_u64(99);
    let sports = ["Athletics", "Swimming", "Rowing", "Judo"];
    let records: Vec<Record> = (0..60)
        .map(|_| {
            athlete(
                rng.gen_range(16.0..40.0),
                rng.gen_range(150.0..210.0),
                rng.gen_range(45.0..120.0),
                sports[rng.gen_range(0..sports.len())],
            )
        })
        .collect();

    for k in [1, 5, 20, 59] {
        let report = CrossValidator::new(k)
            .evaluate(&records, &FeatureColumn::ALL)
            .unwrap();
        assert_eq!(report.evaluated(), records.len());
        let accuracy = report.accuracy();
        assert!((0.0..=1.0).contains(&accuracy));
        assert_eq!(accuracy, report.correct as f64 / records.len() as f64);
    }
}

#[test]
fn from_config_uses_config_values() {
    let config = KnnConfig {
        k: 1,
        features: vec![FeatureColumn::Age],
        scale_features: false,
        progress_interval: 0,
        ..KnnConfig::default()
    };
    let report = CrossValidator::from_config(&config)
        .evaluate(&line_dataset(), &config.features)
        .unwrap();
    assert_eq!(report.k, 1);
    assert_eq!(report.label, LabelColumn::Sport);
    assert_eq!(report.correct, 4);
}
