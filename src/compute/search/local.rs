//! Local search over single-rule changes.

use log::{debug, info};

use super::mutation::RuleRng;
use crate::compute::EvolutionEngine;
use crate::schema::{AcceptancePolicy, RuleSet};

/// Notification sent to the search observer.
#[derive(Debug)]
pub enum SearchEvent<'a> {
    /// The working rule set strictly improved.
    Improved { fitness: usize, rule_set: &'a RuleSet },
    /// An iterated local search round finished.
    RoundComplete { round: usize, fitness: usize },
}

/// Local search procedures sharing one engine.
///
/// Each procedure works on the caller's rule set in place; nothing but the
/// engine scratch space survives between calls.
pub struct LocalSearch {
    engine: EvolutionEngine,
    n_max: usize,
    window: u8,
}

impl LocalSearch {
    /// Search evaluating squads up to `n_max`, shifting rules by at most `window`.
    pub fn new(engine: EvolutionEngine, n_max: usize, window: u8) -> Self {
        Self {
            engine,
            n_max,
            window,
        }
    }

    pub fn engine(&self) -> &EvolutionEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut EvolutionEngine {
        &mut self.engine
    }

    pub fn into_engine(self) -> EvolutionEngine {
        self.engine
    }

    #[inline]
    pub fn n_max(&self) -> usize {
        self.n_max
    }

    /// Random walk: redraw one rule per iteration and keep every move,
    /// remembering the best table seen. `solution` ends as that best table.
    ///
    /// The starting table is scored at the engine's full capacity, later
    /// tables at `n_max`.
    pub fn random_walk<F>(
        &mut self,
        solution: &mut RuleSet,
        iterations: usize,
        rng: &mut RuleRng,
        mut observer: F,
    ) -> usize
    where
        F: FnMut(&SearchEvent<'_>),
    {
        let max_size = self.engine.max_size();
        let mut best = solution.clone();
        self.engine.evaluate(&mut best, max_size);
        self.engine.evaluate(solution, self.n_max);

        for _ in 0..iterations {
            rng.randomize_one(solution);
            let fitness = self.engine.evaluate(solution, self.n_max);
            if fitness > best.fitness() {
                info!("random walk improved to {}: {}", fitness, solution);
                best = solution.clone();
                observer(&SearchEvent::Improved {
                    fitness,
                    rule_set: &best,
                });
            }
        }

        *solution = best;
        solution.fitness()
    }

    /// First-improvement hill climbing with ties accepted.
    ///
    /// Each iteration shifts one mutable rule of a copy and keeps the copy if
    /// it scores at least as well. Returns the final fitness.
    pub fn hill_climb<F>(
        &mut self,
        solution: &mut RuleSet,
        iterations: usize,
        rng: &mut RuleRng,
        mut observer: F,
    ) -> usize
    where
        F: FnMut(&SearchEvent<'_>),
    {
        let mut fitness = self.engine.evaluate(solution, self.n_max);

        for _ in 0..iterations {
            let mut candidate = solution.clone();
            rng.perturb_one(&mut candidate, self.window);
            let candidate_fitness = self.engine.evaluate(&mut candidate, self.n_max);
            if candidate_fitness < fitness {
                continue;
            }

            let improved = candidate_fitness > fitness;
            *solution = candidate;
            fitness = candidate_fitness;
            if improved {
                info!("hill climbing improved to {}: {}", fitness, solution);
                observer(&SearchEvent::Improved {
                    fitness,
                    rule_set: solution,
                });
            }
        }

        fitness
    }

    /// Iterated local search.
    ///
    /// Each round climbs, kicks `kick_size` mutable rules, then climbs again.
    /// Under [`AcceptancePolicy::NotWorse`] a round ending below its first
    /// climb returns to the pre-kick table.
    #[allow(clippy::too_many_arguments)]
    pub fn iterated_local_search<F>(
        &mut self,
        solution: &mut RuleSet,
        rounds: usize,
        inner_iterations: usize,
        kick_size: usize,
        acceptance: AcceptancePolicy,
        rng: &mut RuleRng,
        mut observer: F,
    ) -> usize
    where
        F: FnMut(&SearchEvent<'_>),
    {
        let mut fitness = self.engine.evaluate(solution, self.n_max);

        for round in 0..rounds {
            let local = self.hill_climb(solution, inner_iterations, rng, &mut observer);
            let optimum = (acceptance == AcceptancePolicy::NotWorse).then(|| solution.clone());

            for _ in 0..kick_size {
                rng.perturb_one(solution, self.window);
            }
            fitness = self.hill_climb(solution, inner_iterations, rng, &mut observer);

            if let Some(optimum) = optimum
                && fitness < local
            {
                debug!("round {}: kick fell to {}, restoring {}", round, fitness, local);
                *solution = optimum;
                fitness = local;
            }

            debug!("round {} done at fitness {}", round, fitness);
            observer(&SearchEvent::RoundComplete { round, fitness });
        }

        fitness
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Alphabet;

    fn search(max_size: usize) -> LocalSearch {
        LocalSearch::new(EvolutionEngine::new(max_size), max_size, 2)
    }

    #[test]
    fn test_zero_iterations_keeps_rules() {
        let mut rng = RuleRng::new(0);
        let mut rules = rng.random_rules(Alphabet::five());
        let before = rules.clone();

        let mut search = search(12);
        search.hill_climb(&mut rules, 0, &mut rng, |_| {});
        assert_eq!(rules.rules(), before.rules());
        assert!(!rules.is_invalid());
    }

    #[test]
    fn test_hill_climb_never_regresses() {
        let mut rng = RuleRng::new(21);
        let mut rules = rng.random_rules(Alphabet::five());
        let mut search = search(12);
        let start = search.engine_mut().fitness(&rules, 12);

        let mut improvements = Vec::new();
        let end = search.hill_climb(&mut rules, 300, &mut rng, |event| {
            if let SearchEvent::Improved { fitness, rule_set } = event {
                assert_eq!(rule_set.fitness(), *fitness);
                improvements.push(*fitness);
            }
        });

        assert!(end >= start);
        assert_eq!(rules.fitness(), end);
        assert!(improvements.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(improvements.last().copied().unwrap_or(start), end);
    }

    #[test]
    fn test_hill_climb_keeps_fixed_rules() {
        let mut rng = RuleRng::new(4);
        let mut rules = RuleSet::new(Alphabet::six());
        let reference = rules.clone();

        search(10).hill_climb(&mut rules, 200, &mut rng, |_| {});
        for (index, (&a, &b)) in reference.rules().iter().zip(rules.rules()).enumerate() {
            if !rules.layout().is_mutable(index) {
                assert_eq!(a, b);
            }
        }
    }

    #[test]
    fn test_search_results_match_full_simulation() {
        let mut rng = RuleRng::new(77);
        let mut rules = rng.random_rules(Alphabet::five());
        let mut search = search(14);

        let fitness = search.iterated_local_search(
            &mut rules,
            3,
            200,
            4,
            AcceptancePolicy::Always,
            &mut rng,
            |_| {},
        );
        assert_eq!(rules.fitness(), fitness);

        let engine = search.engine_mut();
        assert_eq!(engine.evaluate_from_scratch(&rules, 14), fitness);
        assert_eq!(engine.fitness(&rules, 14), fitness);
    }

    #[test]
    fn test_random_walk_returns_best() {
        let mut rng = RuleRng::new(8);
        let mut rules = rng.random_rules(Alphabet::five());
        let mut search = search(10);
        let start = search.engine_mut().fitness(&rules, 10);

        let best = search.random_walk(&mut rules, 200, &mut rng, |_| {});
        assert!(best >= start);
        assert_eq!(rules.fitness(), best);
        assert_eq!(search.engine_mut().fitness(&rules, 10), best);
    }

    #[test]
    fn test_not_worse_rounds_never_regress() {
        let mut rng = RuleRng::new(31);
        let mut rules = rng.random_rules(Alphabet::five());
        let mut search = search(12);

        let mut rounds = Vec::new();
        search.iterated_local_search(
            &mut rules,
            4,
            100,
            10,
            AcceptancePolicy::NotWorse,
            &mut rng,
            |event| {
                if let SearchEvent::RoundComplete { fitness, .. } = event {
                    rounds.push(*fitness);
                }
            },
        );

        assert_eq!(rounds.len(), 4);
        assert!(rounds.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_seeded_search_is_reproducible() {
        let run = |seed| {
            let mut rng = RuleRng::new(seed);
            let mut rules = rng.random_rules(Alphabet::five());
            search(10).hill_climb(&mut rules, 150, &mut rng, |_| {});
            rules
        };
        assert_eq!(run(13).rules(), run(13).rules());
    }
}
