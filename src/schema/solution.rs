//! Text format for persisted rule sets.
//!
//! A solution is two whitespace-separated tokens:
//!
//! ```text
//! <fitness | I> <digits>
//! ```
//!
//! The digit string holds one output state per stored neighborhood (the
//! pre-fire domain, ascending table index), skipping UNUSED entries. Its
//! length identifies the alphabet: 96 digits for 5 states, 175 for 6.

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::str::FromStr;

use super::rules::{Alphabet, IMPOSSIBLE, Neighborhood, RuleClass, RuleSet, State, UNUSED};

/// Marker written in place of the fitness of an unevaluated rule set.
pub const INVALID_MARKER: &str = "I";

/// Errors raised while reading a persisted solution.
#[derive(Debug, thiserror::Error)]
pub enum SolutionError {
    #[error("Missing {0} token")]
    MissingToken(&'static str),
    #[error("Unknown number of states: {0} rules (expected 96 for 5 states or 175 for 6)")]
    UnknownLength(usize),
    #[error("Invalid fitness token {0:?}")]
    InvalidFitness(String),
    #[error("Invalid rule character {ch:?} at position {position}")]
    InvalidDigit { position: usize, ch: char },
    #[error("Rule output {value} at position {position} is above FIRE ({fire})")]
    StateOutOfRange {
        position: usize,
        value: State,
        fire: State,
    },
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Infer the alphabet from the length of a digit string.
pub fn alphabet_for_length(len: usize) -> Option<Alphabet> {
    [Alphabet::five(), Alphabet::six()]
        .into_iter()
        .find(|a| persisted_len(*a) == len)
}

/// Digits in a complete solution string: `(s-1)^3 + 2 (s-1)^2`.
fn persisted_len(alphabet: Alphabet) -> usize {
    let pre_fire = alphabet.fire() as usize;
    pre_fire.pow(3) + 2 * pre_fire.pow(2)
}

impl fmt::Display for RuleSet {
    /// Compact format: fitness (or `I`) followed by the digit string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_invalid() {
            write!(f, "{INVALID_MARKER} ")?;
        } else {
            write!(f, "{} ", self.fitness())?;
        }

        let rules = self.rules();
        for &index in self.layout().persisted_indices() {
            if rules[index] != UNUSED {
                write!(f, "{}", rules[index])?;
            }
        }
        Ok(())
    }
}

impl FromStr for RuleSet {
    type Err = SolutionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_whitespace();
        let fitness_token = tokens.next().ok_or(SolutionError::MissingToken("fitness"))?;
        let digits = tokens.next().ok_or(SolutionError::MissingToken("rules"))?;

        let fitness = if fitness_token == INVALID_MARKER {
            None
        } else {
            let value = fitness_token
                .parse::<usize>()
                .map_err(|_| SolutionError::InvalidFitness(fitness_token.to_string()))?;
            Some(value)
        };

        let alphabet = alphabet_for_length(digits.chars().count())
            .ok_or_else(|| SolutionError::UnknownLength(digits.chars().count()))?;
        let fire = alphabet.fire();

        let mut rule_set = RuleSet::new(alphabet);
        let indices = rule_set.layout().persisted_indices().to_vec();
        let rules = rule_set.rules_mut();

        // everything outside the stored domain except FIRE-FIRE-FIRE is impossible
        rules.fill(IMPOSSIBLE);
        let fff = Neighborhood::new(fire, fire, fire).index(alphabet);
        rules[fff] = fire;

        for (position, (ch, index)) in digits.chars().zip(indices).enumerate() {
            let value = ch
                .to_digit(10)
                .ok_or(SolutionError::InvalidDigit { position, ch })? as State;
            if value > fire {
                return Err(SolutionError::StateOutOfRange {
                    position,
                    value,
                    fire,
                });
            }
            rules[index] = value;
        }

        if let Some(fitness) = fitness {
            rule_set.set_fitness(fitness);
        }
        Ok(rule_set)
    }
}

/// Expanded listing of a rule set: one `left center right new` line per rule.
pub struct FullListing<'a>(pub &'a RuleSet);

impl fmt::Display for FullListing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule_set = self.0;
        let alphabet = rule_set.alphabet();
        for &index in rule_set.layout().persisted_indices() {
            let value = rule_set.rules()[index];
            if value != UNUSED {
                let n = Neighborhood::from_index(index, alphabet);
                writeln!(f, "{n} {value}")?;
            }
        }
        Ok(())
    }
}

/// Count of entries a loaded table inherited from the file that disagree with
/// the fixed conventions. Solutions produced elsewhere may legitimately differ.
pub fn fixed_rule_conflicts(rule_set: &RuleSet) -> usize {
    let layout = rule_set.layout();
    rule_set
        .rules()
        .iter()
        .enumerate()
        .filter(|&(index, &value)| match layout.class(index) {
            RuleClass::Fixed(state) => state != value,
            _ => false,
        })
        .count()
}

/// Read a solution file.
pub fn load_solution<P: AsRef<Path>>(path: P) -> Result<RuleSet, SolutionError> {
    let content = fs::read_to_string(path)?;
    content.parse()
}

/// Write a solution file in compact format.
pub fn save_solution<P: AsRef<Path>>(path: P, rule_set: &RuleSet) -> io::Result<()> {
    let mut file = io::BufWriter::new(fs::File::create(path)?);
    writeln!(file, "{rule_set}")?;
    file.flush()
}
