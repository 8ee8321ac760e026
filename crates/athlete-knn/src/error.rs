use std::error::Error;
use std::fmt;

/// Failures raised by the k-NN core.
#[derive(Debug, Clone, PartialEq)]
pub enum KnnError {
    /// Two feature vectors (or a vector and its scale parameters) differ in length.
    DimensionMismatch { expected: usize, found: usize },
    /// No records to fit or evaluate on.
    EmptyDataset,
    /// `k` falls outside `1..=max`.
    InvalidK { k: usize, max: usize },
    /// A feature column has zero range, so min-max scaling is undefined.
    DegenerateRange { dimension: usize, value: f64 },
    /// A majority vote was requested over no labels.
    EmptyNeighborSet,
}

impl fmt::Display for KnnError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            KnnError::DimensionMismatch { expected, found } => write!(
                f,
                "Feature vectors must have equal length (expected {}, found {})",
                expected, found
            ),
            KnnError::EmptyDataset => write!(f, "Dataset contains no records"),
            KnnError::InvalidK { k, max } => {
                write!(f, "k must be between 1 and {} (got {})", max, k)
            }
            KnnError::DegenerateRange { dimension, value } => write!(
                f,
                "Feature dimension {} has no variance (every value is {}); \
                 min-max scaling is undefined",
                dimension, value
            ),
            KnnError::EmptyNeighborSet => write!(f, "Cannot take a majority vote over zero labels"),
        }
    }
}

impl Error for KnnError {}

/// Result type for k-NN operations.
pub type Result<T> = std::result::Result<T, KnnError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_knn_error_display() {
        let err = KnnError::DimensionMismatch { expected: 3, found: 2 };
        assert!(format!("{}", err).contains("expected 3, found 2"));

        let err = KnnError::EmptyDataset;
        assert!(format!("{}", err).contains("no records"));

        let err = KnnError::InvalidK { k: 0, max: 10 };
        assert!(format!("{}", err).contains("between 1 and 10"));
        assert!(format!("{}", err).contains("got 0"));

        let err = KnnError::DegenerateRange { dimension: 1, value: 180.0 };
        assert!(format!("{}", err).contains("dimension 1"));
        assert!(format!("{}", err).contains("180"));

        let err = KnnError::EmptyNeighborSet;
        assert!(format!("{}", err).contains("majority vote"));
    }

    #[test]
    fn test_knn_error_converts_to_anyhow() {
        let err: anyhow::Error = KnnError::EmptyDataset.into();
        assert!(err.downcast_ref::<KnnError>().is_some());
    }
}
