//! FSSP Search - Local search for firing squad synchronization rules.
//!
//! A line of `N` cellular automaton cells starts with a general at the left
//! end and every other soldier at rest. A rule table solves the firing squad
//! synchronization problem for `N` when every cell enters the FIRE state for
//! the first time simultaneously, at the optimal iteration `2N - 2`. This
//! crate searches rule tables maximizing the largest `N` they synchronize.
//!
//! # Architecture
//!
//! The crate is split into three main modules:
//!
//! - `schema`: State alphabet, rule tables, solution files and configuration
//! - `compute`: Incremental space-time simulation and local search
//! - `render`: SVG export of space-time diagrams
//!
//! # Example
//!
//! ```rust,no_run
//! use fssp_search::{
//!     compute::{EvolutionEngine, search::{LocalSearch, RuleRng}},
//!     schema::Alphabet,
//! };
//!
//! let mut rng = RuleRng::new(42);
//! let mut rules = rng.random_rules(Alphabet::five());
//!
//! // Climb on squads of up to 20 soldiers
//! let mut search = LocalSearch::new(EvolutionEngine::new(20), 20, 2);
//! let fitness = search.hill_climb(&mut rules, 10_000, &mut rng, |_| {});
//!
//! println!("synchronizes squads up to {fitness}: {rules}");
//! ```

pub mod compute;
pub mod render;
pub mod schema;

// Re-export commonly used types
pub use compute::{EvolutionEngine, SpaceTimeDiagram};
pub use schema::{Alphabet, RuleSet, SearchConfig};
