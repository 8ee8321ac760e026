//! athlete-knn: k-nearest-neighbors classification of athletes.
//!
//! This crate predicts an athlete's sport (or event) from age, height and
//! weight. It provides min-max scaling, Euclidean distance, nearest-neighbor
//! search, majority voting and leave-one-out cross-validation, plus a CSV
//! reader for the athletes dataset used by the command line driver.
//!
//! The core is pure computation over in-memory records; all file access
//! lives in [`io`].
pub mod config;
pub mod cross_validation;
pub mod data_handling;
pub mod error;
pub mod io;
pub mod math;
pub mod models;
pub mod preprocessing;

pub use error::{KnnError, Result};
