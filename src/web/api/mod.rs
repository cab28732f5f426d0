pub mod analysis;
pub mod error;
pub mod predict;
pub mod trajectory;
