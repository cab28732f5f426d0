pub mod analysis;
pub mod config;
pub mod elements;
pub mod predict;
pub mod propagate;
pub mod sampler;
pub mod web;
