//! Compute module - Automaton simulation and rule-table search.

mod diagram;
mod engine;

pub mod search;

pub use diagram::*;
pub use engine::*;
