// src/progress.rs
use std::path::Path;

/// Lightweight progress reporting for the batch run.
/// Front-ends implement this to surface status to users.
pub trait Progress {
    /// Called at the start with the number of measures to process.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// One measure's key was written.
    fn item_done(&mut self, _measure: &str, _path: &Path) {}

    /// One measure failed and produced no file.
    fn item_failed(&mut self, _measure: &str, _err: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}
