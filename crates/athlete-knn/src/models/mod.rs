pub mod knn;
pub mod neighbors;
pub mod vote;

pub use knn::{KnnClassifier, Prediction};
pub use neighbors::{find_nearest, Neighbor, NeighborRecord, NeighborSet};
pub use vote::{majority_event, majority_label, majority_of, majority_sport, LabelTally};
