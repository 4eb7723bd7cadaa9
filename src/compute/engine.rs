//! Space-time simulation of the firing squad automaton.
//!
//! The engine owns one `(2 * max_size - 1) x max_size` buffer holding
//! `configs[t][i]`, the state of cell `i` at iteration `t`, and reuses it
//! across every rule set it evaluates.
//!
//! Evaluation grows the squad one soldier at a time. Because REST-REST-REST
//! and REST-REST-BORDER both map to REST, the right border of a squad of
//! size `N` can only influence cell `i` from iteration `2N - 2 - i` on. Every
//! cell strictly above that anti-diagonal is shared with the diagram of size
//! `N - 1`, so [`EvolutionEngine::fast_step`] only recomputes the band along
//! the right and bottom edges of the previous diagram.

use log::{debug, warn};

use super::diagram::SpaceTimeDiagram;
use crate::schema::{Alphabet, GENERAL, IMPOSSIBLE, Neighborhood, REST, RuleSet, State};

/// Smallest squad size; every rule set built with the fixed rules synchronizes it.
pub const REFERENCE_SIZE: usize = 2;

/// Cached cells of the reference diagram that seed the incremental path.
///
/// Holds the two anti-diagonals `t + i = 2 * REFERENCE_SIZE - 4` and
/// `2 * REFERENCE_SIZE - 3`, the only cells of the reference diagram
/// `fast_step(REFERENCE_SIZE + 1)` reads without recomputing them. `entries`
/// lists every table entry the reference simulation looked up; a rule set
/// agreeing on all of them has the same reference diagram.
#[derive(Debug, Clone)]
struct Trace {
    alphabet: Alphabet,
    entries: Vec<(usize, State)>,
    cells: Vec<(usize, usize, State)>,
}

impl Trace {
    fn matches(&self, rule_set: &RuleSet) -> bool {
        let rules = rule_set.rules();
        self.alphabet == rule_set.alphabet()
            && self.entries.iter().all(|&(index, state)| rules[index] == state)
    }
}

/// Simulates rule sets and measures the largest squad they synchronize.
///
/// Not reentrant: the buffer and trace are scratch space shared by every call,
/// so concurrent evaluation needs one engine per thread.
#[derive(Debug)]
pub struct EvolutionEngine {
    max_size: usize,
    max_iteration: usize,
    configs: Vec<State>,
    trace: Option<Trace>,
    evaluations: u64,
}

impl EvolutionEngine {
    /// Create an engine able to simulate squads of up to `max_size` soldiers.
    pub fn new(max_size: usize) -> Self {
        let max_size = max_size.max(REFERENCE_SIZE);
        let max_iteration = 2 * max_size - 2;

        let mut engine = Self {
            max_size,
            max_iteration,
            configs: vec![REST; (max_iteration + 1) * max_size],
            trace: None,
            evaluations: 0,
        };
        engine.initial_configuration();
        engine
    }

    #[inline]
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    #[inline]
    pub fn max_iteration(&self) -> usize {
        self.max_iteration
    }

    /// Number of fitness evaluations run so far.
    #[inline]
    pub fn evaluations(&self) -> u64 {
        self.evaluations
    }

    /// Whether a trace is cached.
    #[inline]
    pub fn has_trace(&self) -> bool {
        self.trace.is_some()
    }

    /// Drop the cached trace; the next evaluation rebuilds it from its rule set.
    pub fn reset_trace(&mut self) {
        self.trace = None;
    }

    /// State of cell `i` at iteration `t` left by the last simulation.
    #[inline]
    pub fn cell(&self, t: usize, i: usize) -> State {
        self.configs[t * self.max_size + i]
    }

    /// Full-width row `t` of the buffer.
    pub fn row(&self, t: usize) -> &[State] {
        let start = t * self.max_size;
        &self.configs[start..start + self.max_size]
    }

    #[inline]
    fn set(&mut self, t: usize, i: usize, state: State) {
        self.configs[t * self.max_size + i] = state;
    }

    /// General at the left end, everyone else at rest.
    fn initial_configuration(&mut self) {
        self.configs.fill(REST);
        self.set(0, 0, GENERAL);
    }

    /// Evaluate a rule set and cache the resulting fitness on it.
    pub fn evaluate(&mut self, rule_set: &mut RuleSet, n_max: usize) -> usize {
        let fitness = self.fitness(rule_set, n_max);
        rule_set.set_fitness(fitness);
        fitness
    }

    /// Largest `k <= n_max` such that every size `2..=k` fires all soldiers
    /// together at iteration `2k - 2`, or 0 when size 2 already fails.
    pub fn fitness(&mut self, rule_set: &RuleSet, n_max: usize) -> usize {
        self.evaluations += 1;

        let n_max = self.clamp_size(n_max);
        if n_max < REFERENCE_SIZE {
            return 0;
        }
        if !self.prime(rule_set) {
            return 0;
        }

        let mut k = REFERENCE_SIZE;
        while k < n_max && self.fast_step(rule_set, k + 1) == k + 1 {
            k += 1;
        }
        k
    }

    /// Same result as [`EvolutionEngine::fitness`] using only full simulations.
    ///
    /// Quadratic in the squad size; leaves the trace untouched.
    pub fn evaluate_from_scratch(&mut self, rule_set: &RuleSet, n_max: usize) -> usize {
        let n_max = self.clamp_size(n_max);
        if n_max < REFERENCE_SIZE {
            return 0;
        }

        self.initial_configuration();
        if self.full_step(rule_set, REFERENCE_SIZE) != REFERENCE_SIZE {
            return 0;
        }
        let mut k = REFERENCE_SIZE;
        while k < n_max && self.full_step(rule_set, k + 1) == k + 1 {
            k += 1;
        }
        k
    }

    fn clamp_size(&self, n: usize) -> usize {
        if n > self.max_size {
            warn!(
                "squad size {} exceeds engine capacity {}, clamping",
                n, self.max_size
            );
        }
        n.min(self.max_size)
    }

    /// Load the trace into the buffer, rebuilding it when the rule set does
    /// not share the cached reference diagram.
    ///
    /// Returns false when the reference size does not synchronize.
    fn prime(&mut self, rule_set: &RuleSet) -> bool {
        let Some(trace) = self.trace.as_ref().filter(|t| t.matches(rule_set)) else {
            return self.build_trace(rule_set);
        };
        for &(t, i, state) in &trace.cells {
            self.configs[t * self.max_size + i] = state;
        }
        true
    }

    /// Simulate the reference size from scratch and cache the cells needed by
    /// the incremental path, replacing any previous trace.
    ///
    /// Returns false, caching nothing, when the reference size does not
    /// synchronize.
    fn build_trace(&mut self, rule_set: &RuleSet) -> bool {
        let n = REFERENCE_SIZE;
        self.initial_configuration();
        if self.full_step(rule_set, n) != n {
            debug!("reference size {} does not synchronize, no trace", n);
            return false;
        }

        let alphabet = rule_set.alphabet();
        let border = alphabet.border();
        let mut entries = Vec::new();
        for t in 1..=2 * n - 2 {
            for i in 0..n {
                let left = if i == 0 { border } else { self.cell(t - 1, i - 1) };
                let right = if i == n - 1 { border } else { self.cell(t - 1, i + 1) };
                let index = Neighborhood::new(left, self.cell(t - 1, i), right).index(alphabet);
                entries.push((index, rule_set.rules()[index]));
            }
        }
        entries.sort_unstable();
        entries.dedup();

        let mut cells = Vec::new();
        for diagonal in [2 * n - 4, 2 * n - 3] {
            for i in 0..n.min(diagonal + 1) {
                let t = diagonal - i;
                cells.push((t, i, self.cell(t, i)));
            }
        }
        debug!(
            "trace built from {} table entries ({} cells)",
            entries.len(),
            cells.len()
        );

        self.trace = Some(Trace {
            alphabet,
            entries,
            cells,
        });
        true
    }

    /// Simulate a squad of `n` soldiers from the initial configuration.
    ///
    /// Returns the number of soldiers firing at iteration `2n - 2` when the
    /// first FIRE appears exactly then, 0 otherwise.
    pub fn full_step(&mut self, rule_set: &RuleSet, n: usize) -> usize {
        debug_assert!((REFERENCE_SIZE..=self.max_size).contains(&n));
        let last = (2 * n - 2).min(self.max_iteration);
        let mut fired = 0;
        let mut t = 1;

        // cells right of t are still at rest
        while t < n - 1 && fired == 0 {
            fired += self.step_left(rule_set, t);
            fired += self.step_interior(rule_set, t, 1..t);
            let (l, c) = (self.cell(t - 1, t - 1), self.cell(t - 1, t));
            fired += self.step_cell(rule_set, t, t, Neighborhood::new(l, c, REST));
            t += 1;
        }

        while t <= last && fired == 0 {
            fired += self.step_row(rule_set, t, n);
            t += 1;
        }

        if t == 2 * n - 1 { fired } else { 0 }
    }

    /// Extend the diagram of size `n - 1`, already in the buffer and
    /// synchronized, to size `n`.
    ///
    /// Same result as [`EvolutionEngine::full_step`] in O(n) work: cell `i`
    /// at iteration `t` is recomputed only when `t + i >= 2n - 4`.
    pub fn fast_step(&mut self, rule_set: &RuleSet, n: usize) -> usize {
        debug_assert!(n > REFERENCE_SIZE && n <= self.max_size);
        let last = (2 * n - 2).min(self.max_iteration);

        // the signal front reaches cell n-2, which no longer touches the border
        let front = Neighborhood::new(self.cell(n - 3, n - 3), REST, REST);
        if self.step_cell(rule_set, n - 2, n - 2, front) > 0 {
            return 0;
        }
        self.set(n - 2, n - 1, REST);

        // band along the right border, widening by one cell per iteration
        let mut t = n - 1;
        while t < 2 * n - 4 {
            let fired = self.step_interior(rule_set, t, (2 * n - 4 - t)..(n - 1))
                + self.step_right(rule_set, t, n);
            if fired > 0 {
                return 0;
            }
            t += 1;
        }

        // last three iterations span the whole squad
        let mut fired = 0;
        while t <= last && fired == 0 {
            fired += self.step_row(rule_set, t, n);
            t += 1;
        }

        if t == 2 * n - 1 { fired } else { 0 }
    }

    /// Compute one cell, returning 1 if it fires.
    #[inline]
    fn step_cell(&mut self, rule_set: &RuleSet, t: usize, i: usize, n: Neighborhood) -> usize {
        let alphabet = rule_set.alphabet();
        let next = rule_set.rules()[n.index(alphabet)];
        debug_assert!(
            next != IMPOSSIBLE,
            "impossible neighborhood {n} reached at t={t}, i={i}"
        );
        self.set(t, i, next);
        usize::from(next == alphabet.fire())
    }

    #[inline]
    fn step_left(&mut self, rule_set: &RuleSet, t: usize) -> usize {
        let border = rule_set.alphabet().border();
        let n = Neighborhood::new(border, self.cell(t - 1, 0), self.cell(t - 1, 1));
        self.step_cell(rule_set, t, 0, n)
    }

    #[inline]
    fn step_right(&mut self, rule_set: &RuleSet, t: usize, size: usize) -> usize {
        let border = rule_set.alphabet().border();
        let n = Neighborhood::new(
            self.cell(t - 1, size - 2),
            self.cell(t - 1, size - 1),
            border,
        );
        self.step_cell(rule_set, t, size - 1, n)
    }

    fn step_interior(&mut self, rule_set: &RuleSet, t: usize, cells: std::ops::Range<usize>) -> usize {
        let mut fired = 0;
        for i in cells {
            let n = Neighborhood::new(
                self.cell(t - 1, i - 1),
                self.cell(t - 1, i),
                self.cell(t - 1, i + 1),
            );
            fired += self.step_cell(rule_set, t, i, n);
        }
        fired
    }

    fn step_row(&mut self, rule_set: &RuleSet, t: usize, size: usize) -> usize {
        self.step_left(rule_set, t)
            + self.step_interior(rule_set, t, 1..size - 1)
            + self.step_right(rule_set, t, size)
    }

    /// Simulate for display, reading UNUSED (and any other sentinel) as REST.
    ///
    /// Returns one diagram for size `n`, or one per size `2..=n` when
    /// `all_sizes` is set. Each diagram stops after its first FIRE row.
    /// Does not touch the trace.
    pub fn render(&mut self, rule_set: &RuleSet, n: usize, all_sizes: bool) -> Vec<SpaceTimeDiagram> {
        let n = self.clamp_size(n);
        if n < REFERENCE_SIZE {
            return Vec::new();
        }

        let first = if all_sizes { REFERENCE_SIZE } else { n };
        self.initial_configuration();
        let diagrams = (first..=n)
            .map(|size| self.render_size(rule_set, size))
            .collect();
        self.initial_configuration();
        diagrams
    }

    fn render_size(&mut self, rule_set: &RuleSet, n: usize) -> SpaceTimeDiagram {
        let alphabet = rule_set.alphabet();
        let border = alphabet.border();
        let fire = alphabet.fire();
        let readable = |s: State| if alphabet.is_sentinel(s) { REST } else { s };
        let last = (2 * n - 2).min(self.max_iteration);

        let mut fired = 0;
        let mut t = 1;
        while t <= last && fired == 0 {
            for i in 0..n {
                let left = if i == 0 { border } else { readable(self.cell(t - 1, i - 1)) };
                let right = if i == n - 1 { border } else { readable(self.cell(t - 1, i + 1)) };
                let center = readable(self.cell(t - 1, i));
                let next = rule_set.get(Neighborhood::new(left, center, right));
                self.set(t, i, next);
                if next == fire {
                    fired += 1;
                }
            }
            t += 1;
        }

        SpaceTimeDiagram {
            size: n,
            fire_count: if t == 2 * n - 1 { fired } else { 0 },
            rows: (0..t).map(|row| self.row(row)[..n].to_vec()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::search::RuleRng;
    use crate::schema::UNUSED;
    use proptest::prelude::*;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    /// Hill-climbed tables synchronizing every size from 2 to 9 and no larger.
    const CLIMBED_FIVE: &str = "9 002001301330110032013203104134013013101213023101131011111023200110011112133212300301141201013300";
    const CLIMBED_SIX: &str = "9 0242102113101221321114040022004321420432211211020200133203142210221402341152051311340232203414223411414324322341141244233441424034241242303421411012240042122320245410323044232";

    fn climbed() -> [RuleSet; 2] {
        [CLIMBED_FIVE.parse().unwrap(), CLIMBED_SIX.parse().unwrap()]
    }

    /// Rows `0..=2n-2` of the first `n` cells.
    fn diagram(engine: &EvolutionEngine, n: usize) -> Vec<Vec<State>> {
        (0..2 * n - 1).map(|t| engine.row(t)[..n].to_vec()).collect()
    }

    /// Table whose mutable entries avoid the pair state and FIRE. The pair
    /// state then only appears in the end cells, never in two neighbors, so
    /// no squad above the reference size fires and every iteration runs.
    fn fire_free_rules(alphabet: Alphabet, seed: u64) -> RuleSet {
        let mut rng = StdRng::seed_from_u64(seed);
        let pair = alphabet.pair_state();
        let allowed: Vec<State> = (0..alphabet.fire()).filter(|&s| s != pair).collect();
        let mut rules = RuleSet::new(alphabet);
        for index in rules.layout().mutable_indices().to_vec() {
            let value = allowed[rng.gen_range(0..allowed.len())];
            rules.mutate(index, value).unwrap();
        }
        rules
    }

    /// Quiescent table whose `G R B` entry keeps the general's neighbor at rest.
    fn unsynchronized_reference() -> RuleSet {
        let a = Alphabet::five();
        let mut rules = RuleSet::new(a);
        rules.rules_mut()[Neighborhood::new(GENERAL, REST, a.border()).index(a)] = REST;
        rules
    }

    #[test]
    fn test_buffer_dimensions() {
        let engine = EvolutionEngine::new(30);
        assert_eq!(engine.max_iteration(), 58);
        assert_eq!(engine.configs.len(), 59 * 30);
        assert_eq!(engine.cell(0, 0), GENERAL);
        assert!(!engine.has_trace());
    }

    #[test]
    fn test_reference_size_synchronizes() {
        let mut engine = EvolutionEngine::new(10);
        let rules = RuleSet::new(Alphabet::five());
        assert_eq!(engine.full_step(&rules, 2), 2);
        assert_eq!(engine.row(1)[..2], [GENERAL, GENERAL]);
        assert_eq!(engine.row(2)[..2], [4, 4]);
    }

    #[test]
    fn test_quiescent_rules_fitness() {
        // only the fixed rules: size 2 fires, size 3 never does
        let mut engine = EvolutionEngine::new(10);
        let mut rules = RuleSet::new(Alphabet::five());

        assert_eq!(engine.evaluate(&mut rules, 2), 2);
        assert!(!rules.is_invalid());
        assert_eq!(engine.evaluate(&mut rules, 10), 2);
        assert!(engine.has_trace());
        assert_eq!(engine.evaluate_from_scratch(&rules, 10), 2);
        assert_eq!(engine.evaluations(), 2);
    }

    #[test]
    fn test_six_state_reference() {
        let mut engine = EvolutionEngine::new(8);
        let mut rules = RuleSet::new(Alphabet::six());
        assert_eq!(engine.full_step(&rules, 2), 2);
        assert_eq!(engine.row(1)[..2], [2, 2]);
        assert_eq!(engine.row(2)[..2], [5, 5]);
        assert_eq!(engine.evaluate(&mut rules, 8), 2);
    }

    #[test]
    fn test_n_max_below_reference() {
        let mut engine = EvolutionEngine::new(10);
        let mut rules = RuleSet::new(Alphabet::five());
        assert_eq!(engine.evaluate(&mut rules, 1), 0);
        assert!(!rules.is_invalid());
    }

    #[test]
    fn test_n_max_clamped_to_capacity() {
        let mut engine = EvolutionEngine::new(5);
        let mut rng = RuleRng::new(3);
        let rules = rng.random_rules(Alphabet::five());
        let clamped = engine.fitness(&rules, 50);
        assert!(clamped <= 5);
        assert_eq!(clamped, engine.fitness(&rules, 5));
    }

    #[test]
    fn test_premature_fire_fails() {
        // pair-pair-REST firing makes size 3 fire at iteration 2 instead of 4
        let a = Alphabet::five();
        let mut rules = RuleSet::new(a);
        let g = GENERAL;
        rules
            .mutate(Neighborhood::new(g, REST, REST).index(a), g)
            .unwrap();
        rules
            .mutate(Neighborhood::new(g, g, REST).index(a), a.fire())
            .unwrap();

        let mut engine = EvolutionEngine::new(6);
        assert_eq!(engine.full_step(&rules, 3), 0);
        assert_eq!(engine.evaluate(&mut rules, 6), 2);
    }

    #[test]
    fn test_trace_requires_synchronized_reference() {
        let mut engine = EvolutionEngine::new(6);
        assert!(!engine.prime(&unsynchronized_reference()));
        assert!(!engine.has_trace());
        assert!(engine.prime(&RuleSet::new(Alphabet::five())));
        assert!(engine.has_trace());
    }

    #[test]
    fn test_trace_not_shared_across_reference_diagrams() {
        let [good, _] = climbed();
        let quiescent = RuleSet::new(Alphabet::five());
        let odd = unsynchronized_reference();
        let mut engine = EvolutionEngine::new(12);

        assert_eq!(engine.fitness(&good, 12), 9);
        assert_eq!(engine.fitness(&quiescent, 12), 2);
        assert_eq!(engine.fitness(&odd, 12), 0);
        assert_eq!(engine.evaluate_from_scratch(&odd, 12), 0);
        assert_eq!(engine.fitness(&good, 12), 9);
        assert_eq!(engine.fitness(&quiescent, 12), 2);
    }

    #[test]
    fn test_climbed_tables_fitness() {
        for rules in climbed() {
            assert_eq!(rules.fitness(), 9);
            let mut engine = EvolutionEngine::new(20);
            for n_max in 2..=20 {
                let expected = n_max.min(9);
                assert_eq!(engine.fitness(&rules, n_max), expected, "n_max={n_max}");
                assert_eq!(
                    engine.evaluate_from_scratch(&rules, n_max),
                    expected,
                    "n_max={n_max}"
                );
            }
        }
    }

    #[test]
    fn test_fast_step_diagrams_match_full_step() {
        for rules in climbed() {
            let mut fast = EvolutionEngine::new(12);
            let mut full = EvolutionEngine::new(12);

            assert!(fast.prime(&rules));
            for n in 3..=9 {
                assert_eq!(fast.fast_step(&rules, n), n);
                assert_eq!(full.full_step(&rules, n), n);
                assert_eq!(diagram(&fast, n), diagram(&full, n), "size {n}");
            }
            assert_eq!(fast.fast_step(&rules, 10), 0);
            assert_eq!(full.full_step(&rules, 10), 0);
        }
    }

    #[test]
    fn test_single_mutation_sweep() {
        // every one-entry neighbor of a good table still synchronizes size 2
        let n_max = 12;
        for base in climbed() {
            let fire = base.alphabet().fire();
            let mut engine = EvolutionEngine::new(n_max);
            for &index in base.layout().mutable_indices() {
                for value in 0..fire {
                    let mut rules = base.clone();
                    rules.mutate(index, value).unwrap();
                    let fitness = engine.evaluate(&mut rules, n_max);
                    assert!(!rules.is_invalid());
                    assert!(
                        (REFERENCE_SIZE..=n_max).contains(&fitness),
                        "index {index} value {value}: {fitness}"
                    );
                    assert_eq!(fitness, engine.evaluate_from_scratch(&rules, n_max));
                }
            }
        }
    }

    #[test]
    fn test_reset_trace() {
        let mut engine = EvolutionEngine::new(6);
        let mut rules = RuleSet::new(Alphabet::five());
        engine.evaluate(&mut rules, 6);
        assert!(engine.has_trace());
        engine.reset_trace();
        assert!(!engine.has_trace());

        let mut six = RuleSet::new(Alphabet::six());
        assert_eq!(engine.evaluate(&mut six, 6), 2);
    }

    #[test]
    fn test_render_single_and_all() {
        let mut engine = EvolutionEngine::new(6);
        let rules = RuleSet::new(Alphabet::five());

        let single = engine.render(&rules, 2, false);
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].rows, vec![vec![1, 0], vec![1, 1], vec![4, 4]]);
        assert_eq!(single[0].fire_count, 2);

        let all = engine.render(&rules, 4, true);
        assert_eq!(all.iter().map(|d| d.size).collect::<Vec<_>>(), vec![2, 3, 4]);
        assert_eq!(all[1].rows.len(), 5);
        assert_eq!(all[1].fire_count, 0);
        assert_eq!(engine.cell(1, 0), REST);
    }

    #[test]
    fn test_render_tolerates_unused() {
        let a = Alphabet::five();
        let mut rules = RuleSet::new(a);
        rules
            .mark_unused(Neighborhood::new(GENERAL, REST, REST).index(a))
            .unwrap();

        let mut engine = EvolutionEngine::new(6);
        let diagrams = engine.render(&rules, 3, false);
        assert_eq!(diagrams[0].rows[1], vec![GENERAL, UNUSED, REST]);
        assert_eq!(diagrams[0].rows.len(), 5);
    }

    #[test]
    fn test_evaluation_is_history_independent() {
        let mut rng = RuleRng::new(11);
        let first = rng.random_rules(Alphabet::five());
        let second = rng.random_rules(Alphabet::five());

        let mut engine = EvolutionEngine::new(12);
        let a = engine.fitness(&first, 12);
        let _ = engine.fitness(&second, 12);
        let _ = engine.render(&second, 5, true);
        let _ = engine.evaluate_from_scratch(&second, 12);
        assert_eq!(engine.fitness(&first, 12), a);

        let mut fresh = EvolutionEngine::new(12);
        assert_eq!(fresh.fitness(&first, 12), a);
    }

    proptest! {
        #[test]
        fn incremental_matches_full_simulation(seed in any::<u64>(), states in 5u8..=6) {
            let alphabet = Alphabet::new(states).unwrap();
            let mut rng = RuleRng::new(seed);
            let rules = rng.random_rules(alphabet);

            let mut engine = EvolutionEngine::new(16);
            let fast = engine.fitness(&rules, 16);
            let slow = engine.evaluate_from_scratch(&rules, 16);
            prop_assert_eq!(fast, slow);
            prop_assert!(fast >= REFERENCE_SIZE);
        }

        #[test]
        fn fast_step_diagrams_match_without_fire(seed in any::<u64>(), states in 5u8..=6) {
            let alphabet = Alphabet::new(states).unwrap();
            let rules = fire_free_rules(alphabet, seed);
            let other = RuleRng::new(seed).random_rules(alphabet);

            let mut fast = EvolutionEngine::new(24);
            let mut full = EvolutionEngine::new(24);

            // trace built from another table, buffer left dirty by it
            fast.fitness(&other, 24);
            fast.evaluate_from_scratch(&other, 24);
            prop_assert!(fast.prime(&rules));

            for n in 3..=24 {
                prop_assert_eq!(fast.fast_step(&rules, n), 0);
                prop_assert_eq!(full.full_step(&rules, n), 0);
                prop_assert_eq!(diagram(&fast, n), diagram(&full, n), "size {}", n);
            }
        }
    }
}
