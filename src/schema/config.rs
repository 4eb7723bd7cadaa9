//! Configuration types for a rule-table search run.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::rules::{Alphabet, RuleError};

fn default_states() -> u8 {
    5
}
fn default_max_size() -> usize {
    30
}
fn default_perturbation_window() -> u8 {
    2
}
fn default_inner_iterations() -> usize {
    10_000
}
fn default_kick_size() -> usize {
    10
}

/// Top-level search configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Number of automaton states (5 or 6).
    #[serde(default = "default_states")]
    pub states: u8,
    /// Largest squad size the engine can simulate.
    #[serde(default = "default_max_size")]
    pub max_size: usize,
    /// Largest squad size evaluated during search (defaults to `max_size`).
    #[serde(default)]
    pub n_max: Option<usize>,
    /// Search algorithm to run.
    #[serde(default)]
    pub algorithm: SearchAlgorithm,
    /// Largest offset added to a rule value by a small perturbation.
    #[serde(default = "default_perturbation_window")]
    pub perturbation_window: u8,
    /// Starting rule table.
    #[serde(default)]
    pub initial: InitialRules,
    /// Random seed for reproducibility.
    #[serde(default)]
    pub random_seed: Option<u64>,
    /// Where to write the best solution found.
    #[serde(default)]
    pub output: Option<PathBuf>,
    /// Optional space-time diagram export of the best solution.
    #[serde(default)]
    pub svg: Option<SvgExportConfig>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            states: default_states(),
            max_size: default_max_size(),
            n_max: None,
            algorithm: SearchAlgorithm::default(),
            perturbation_window: default_perturbation_window(),
            initial: InitialRules::default(),
            random_seed: None,
            output: None,
            svg: None,
        }
    }
}

/// Local search procedure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SearchAlgorithm {
    /// Random walk over single-rule changes, keeping the best table seen.
    RandomWalk { iterations: usize },
    /// First-improvement hill climbing, ties accepted.
    HillClimbing { iterations: usize },
    /// Hill climbing restarted from random kicks.
    IteratedLocalSearch {
        outer_iterations: usize,
        /// Hill-climbing iterations before and after each kick.
        #[serde(default = "default_inner_iterations")]
        inner_iterations: usize,
        /// Number of rules changed by a kick.
        #[serde(default = "default_kick_size")]
        kick_size: usize,
        #[serde(default)]
        acceptance: AcceptancePolicy,
    },
}

impl Default for SearchAlgorithm {
    fn default() -> Self {
        Self::HillClimbing { iterations: 10_000 }
    }
}

/// What iterated local search does with a kicked-and-reclimbed table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AcceptancePolicy {
    /// Always continue from the new local optimum.
    #[default]
    Always,
    /// Return to the pre-kick optimum when the new one is worse.
    NotWorse,
}

/// Source of the starting rule table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InitialRules {
    /// Every mutable rule drawn uniformly below FIRE.
    #[default]
    Random,
    /// Every mutable rule at REST.
    Quiescent,
    /// Load a solution file.
    File { path: PathBuf },
}

/// Space-time diagram export settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SvgExportConfig {
    pub path: PathBuf,
    /// Squad size to draw.
    pub size: usize,
    /// Draw every size from 2 up to `size`.
    #[serde(default)]
    pub all_sizes: bool,
}

impl SearchConfig {
    /// Effective evaluation bound.
    #[inline]
    pub fn n_max(&self) -> usize {
        self.n_max.unwrap_or(self.max_size)
    }

    /// Alphabet described by `states`.
    pub fn alphabet(&self) -> Result<Alphabet, ConfigError> {
        Alphabet::new(self.states).map_err(ConfigError::from)
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let alphabet = self.alphabet()?;
        if self.max_size < 2 {
            return Err(ConfigError::InvalidMaxSize(self.max_size));
        }
        if self.n_max() > self.max_size {
            return Err(ConfigError::NMaxTooLarge {
                n_max: self.n_max(),
                max_size: self.max_size,
            });
        }
        if self.perturbation_window == 0 || self.perturbation_window >= alphabet.fire() {
            return Err(ConfigError::InvalidPerturbationWindow {
                window: self.perturbation_window,
                fire: alphabet.fire(),
            });
        }
        if let SearchAlgorithm::IteratedLocalSearch { kick_size: 0, .. } = self.algorithm {
            return Err(ConfigError::InvalidKickSize);
        }
        if let Some(svg) = &self.svg
            && (svg.size < 2 || svg.size > self.max_size)
        {
            return Err(ConfigError::InvalidExportSize {
                size: svg.size,
                max_size: self.max_size,
            });
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Alphabet(#[from] RuleError),
    #[error("max_size must be at least 2, got {0}")]
    InvalidMaxSize(usize),
    #[error("n_max ({n_max}) exceeds max_size ({max_size})")]
    NMaxTooLarge { n_max: usize, max_size: usize },
    #[error("Perturbation window {window} must be in 1..{fire}")]
    InvalidPerturbationWindow { window: u8, fire: u8 },
    #[error("Kick size must be non-zero")]
    InvalidKickSize,
    #[error("Export size {size} must be in 2..={max_size}")]
    InvalidExportSize { size: usize, max_size: usize },
    #[error("Error parsing config: {0}")]
    Json(#[from] serde_json::Error),
}
