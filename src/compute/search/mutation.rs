//! Random rule-table generation and perturbation.
//!
//! Every operation here touches mutable entries only; fixed and impossible
//! entries keep the values set at construction.

use rand::prelude::*;

use crate::schema::{Alphabet, RuleSet, State};

/// Seedable random source threaded through every search procedure.
pub struct RuleRng {
    rng: StdRng,
}

impl RuleRng {
    /// Create from seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Uniformly chosen mutable index of the rule set's table.
    pub fn mutable_index(&mut self, rule_set: &RuleSet) -> usize {
        let mutable = rule_set.layout().mutable_indices();
        mutable[self.rng.gen_range(0..mutable.len())]
    }

    /// Uniform state in `[0, FIRE)`.
    pub fn random_state(&mut self, alphabet: Alphabet) -> State {
        self.rng.gen_range(0..alphabet.fire())
    }

    /// `(current + k) mod FIRE` for a uniform `k` in `1..=window`.
    ///
    /// Differs from `current` as long as `window < FIRE`.
    pub fn shifted_state(&mut self, current: State, alphabet: Alphabet, window: u8) -> State {
        let offset = self.rng.gen_range(1..=window.max(1));
        (current + offset) % alphabet.fire()
    }

    /// Rule set with every mutable entry drawn uniformly in `[0, FIRE)`.
    pub fn random_rules(&mut self, alphabet: Alphabet) -> RuleSet {
        let mut rule_set = RuleSet::new(alphabet);
        let mutable = rule_set.layout().mutable_indices().to_vec();
        let rules = rule_set.rules_mut();
        for index in mutable {
            rules[index] = self.rng.gen_range(0..alphabet.fire());
        }
        rule_set.apply_fixed_rules();
        rule_set
    }

    /// Redraw one mutable entry uniformly in `[0, FIRE)`. Returns its index.
    pub fn randomize_one(&mut self, rule_set: &mut RuleSet) -> usize {
        let index = self.mutable_index(rule_set);
        let value = self.random_state(rule_set.alphabet());
        rule_set.rules_mut()[index] = value;
        index
    }

    /// Shift one mutable entry by a small nonzero offset. Returns its index.
    pub fn perturb_one(&mut self, rule_set: &mut RuleSet, window: u8) -> usize {
        let index = self.mutable_index(rule_set);
        let current = rule_set.rules()[index];
        let value = self.shifted_state(current, rule_set.alphabet(), window);
        rule_set.rules_mut()[index] = value;
        index
    }
}
