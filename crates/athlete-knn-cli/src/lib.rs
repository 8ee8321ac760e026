pub mod knn;
pub mod util;
