//! Read-only snapshots of simulated space-time diagrams.

use std::fmt;

use crate::schema::State;

/// States of an `size`-soldier squad, one row per simulated iteration.
///
/// Rows run from the initial configuration to the first row containing FIRE,
/// or to iteration `2 * size - 2` when nothing fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpaceTimeDiagram {
    /// Squad size.
    pub size: usize,
    /// Soldiers firing at iteration `2 * size - 2`, 0 if the first fire
    /// happened at any other time or never.
    pub fire_count: usize,
    /// `rows[t][i]` is the state of cell `i` at iteration `t`.
    pub rows: Vec<Vec<State>>,
}

impl SpaceTimeDiagram {
    /// Whether every soldier fired together at the optimal time.
    #[inline]
    pub fn synchronized(&self) -> bool {
        self.fire_count == self.size
    }

    /// Number of iterations simulated.
    #[inline]
    pub fn iterations(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }
}

impl fmt::Display for SpaceTimeDiagram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            for state in row {
                write!(f, "{state}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
