pub mod cross_validate;
pub mod input;
pub mod predict;
