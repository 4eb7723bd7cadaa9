//! Local search over firing squad rule tables.
//!
//! # Overview
//!
//! - **Mutation** (`mutation`): seedable random source, random tables and
//!   single-rule perturbations restricted to mutable entries
//! - **Local search** (`local`): random walk, first-improvement hill climbing
//!   and iterated local search, all scored by the [`EvolutionEngine`]
//! - **Runner** (`runner`): builds the starting table from a
//!   [`SearchConfig`] and dispatches the configured algorithm
//!
//! # Example
//!
//! ```rust,no_run
//! use fssp_search::compute::search::SearchRunner;
//! use fssp_search::schema::SearchConfig;
//!
//! let mut runner = SearchRunner::new(SearchConfig::default()).unwrap();
//! let result = runner.run().unwrap();
//! println!("best fitness: {}", result.stats.best_fitness);
//! println!("{}", result.best);
//! ```
//!
//! [`EvolutionEngine`]: crate::compute::EvolutionEngine
//! [`SearchConfig`]: crate::schema::SearchConfig

mod local;
mod mutation;
mod runner;

pub use local::{LocalSearch, SearchEvent};
pub use mutation::RuleRng;
pub use runner::{SearchError, SearchResult, SearchRunner, SearchStats};
