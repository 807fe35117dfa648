//! Schema module - Configuration and record types for the evolution engine.

mod config;
mod evolution;

pub use config::*;
pub use evolution::*;
