// src/engine/mod.rs

pub mod index;
pub mod scanner;
pub mod types;

pub use index::build_key;
pub use scanner::{scan, ScanState, Scanner};
pub use types::{Scale, Scales, ScoringKey, Sign};
