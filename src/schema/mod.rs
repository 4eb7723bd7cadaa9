//! Schema module - Rule tables, solution files and search configuration.

mod config;
mod rules;
mod solution;

pub use config::*;
pub use rules::*;
pub use solution::*;
