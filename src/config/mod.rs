// src/config/mod.rs

pub mod consts;
pub mod measure;
pub mod options;

pub use measure::{MeasureConfig, RawMeasureConfig};
pub use options::{RunOptions, TableSource};
