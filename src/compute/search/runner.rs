//! Configuration-driven search runs.

use std::time::Instant;

use log::{info, warn};

use super::local::{LocalSearch, SearchEvent};
use super::mutation::RuleRng;
use crate::compute::EvolutionEngine;
use crate::schema::{
    ConfigError, InitialRules, RuleSet, SearchAlgorithm, SearchConfig, SolutionError,
    fixed_rule_conflicts, load_solution,
};

/// Statistics from a search run.
#[derive(Debug, Clone)]
pub struct SearchStats {
    /// Seed the run's random source was created from.
    pub seed: u64,
    /// Fitness of the starting table.
    pub initial_fitness: usize,
    /// Fitness of the returned table.
    pub best_fitness: usize,
    /// Total fitness evaluations performed.
    pub evaluations: u64,
    /// Time taken (in seconds).
    pub elapsed_seconds: f64,
    /// Evaluations per second.
    pub evaluations_per_second: f64,
}

/// Final result of a search run.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub best: RuleSet,
    pub stats: SearchStats,
}

/// Errors preventing a search from starting.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Error loading initial rules: {0}")]
    Solution(#[from] SolutionError),
    #[error("Initial rules have {found} states but the configuration asks for {expected}")]
    AlphabetMismatch { expected: u8, found: u8 },
}

/// Runs the search described by a [`SearchConfig`].
pub struct SearchRunner {
    config: SearchConfig,
    seed: u64,
    rng: RuleRng,
}

impl SearchRunner {
    /// Validate the configuration and seed the random source.
    pub fn new(config: SearchConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let seed = config.random_seed.unwrap_or_else(rand::random);
        if config.random_seed.is_none() {
            info!("no random_seed configured, using {}", seed);
        }

        Ok(Self {
            config,
            seed,
            rng: RuleRng::new(seed),
        })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Build the starting table.
    pub fn initial_rules(&mut self) -> Result<RuleSet, SearchError> {
        let alphabet = self.config.alphabet()?;
        match &self.config.initial {
            InitialRules::Random => Ok(self.rng.random_rules(alphabet)),
            InitialRules::Quiescent => Ok(RuleSet::new(alphabet)),
            InitialRules::File { path } => {
                let rules = load_solution(path)?;
                if rules.alphabet() != alphabet {
                    return Err(SearchError::AlphabetMismatch {
                        expected: alphabet.states(),
                        found: rules.alphabet().states(),
                    });
                }
                let conflicts = fixed_rule_conflicts(&rules);
                if conflicts > 0 {
                    warn!(
                        "{} loaded from {} differs from the fixed rules in {} entries",
                        if rules.is_invalid() { "unevaluated table" } else { "table" },
                        path.display(),
                        conflicts
                    );
                }
                Ok(rules)
            }
        }
    }

    /// Run the configured search.
    pub fn run(&mut self) -> Result<SearchResult, SearchError> {
        self.run_with_callback(|_| {})
    }

    /// Run the configured search, forwarding every search event.
    pub fn run_with_callback<F>(&mut self, callback: F) -> Result<SearchResult, SearchError>
    where
        F: FnMut(&SearchEvent<'_>),
    {
        let start_time = Instant::now();
        let mut best = self.initial_rules()?;

        let n_max = self.config.n_max();
        let engine = EvolutionEngine::new(self.config.max_size);
        let mut search = LocalSearch::new(engine, n_max, self.config.perturbation_window);
        let initial_fitness = search.engine_mut().evaluate(&mut best, n_max);
        info!(
            "starting {:?} from fitness {} (n_max={}, seed={})",
            self.config.algorithm, initial_fitness, n_max, self.seed
        );

        let best_fitness = match self.config.algorithm {
            SearchAlgorithm::RandomWalk { iterations } => {
                search.random_walk(&mut best, iterations, &mut self.rng, callback)
            }
            SearchAlgorithm::HillClimbing { iterations } => {
                search.hill_climb(&mut best, iterations, &mut self.rng, callback)
            }
            SearchAlgorithm::IteratedLocalSearch {
                outer_iterations,
                inner_iterations,
                kick_size,
                acceptance,
            } => search.iterated_local_search(
                &mut best,
                outer_iterations,
                inner_iterations,
                kick_size,
                acceptance,
                &mut self.rng,
                callback,
            ),
        };

        let elapsed = start_time.elapsed().as_secs_f64();
        let evaluations = search.engine().evaluations();
        let stats = SearchStats {
            seed: self.seed,
            initial_fitness,
            best_fitness,
            evaluations,
            elapsed_seconds: elapsed,
            evaluations_per_second: if elapsed > 0.0 {
                evaluations as f64 / elapsed
            } else {
                0.0
            },
        };
        info!(
            "search finished at fitness {} after {} evaluations ({:.2}s)",
            best_fitness, evaluations, elapsed
        );

        Ok(SearchResult { best, stats })
    }
}
