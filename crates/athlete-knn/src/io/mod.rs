//! IO utilities for loading the athletes dataset.

pub mod athletes_csv;

pub use athletes_csv::{
    read_athletes, read_athletes_csv, read_athletes_csv_with_config, AthleteData,
    AthleteReaderConfig,
};
