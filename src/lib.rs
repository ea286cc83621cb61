// src/lib.rs

#[macro_use]
pub mod macros;
#[macro_use]
pub mod log;

pub mod cli;
pub mod config;
pub mod core;
pub mod engine;
pub mod error;

pub mod csv;
pub mod file;
pub mod progress;
pub mod runner;
pub mod store;
pub mod xref;

pub use error::{KeyError, Result};
