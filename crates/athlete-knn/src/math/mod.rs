//! Numeric helpers shared by the scaler and the neighbor search.
pub mod distance;

pub use distance::euclidean;
