//! Rule tables for the one-dimensional firing squad automaton.
//!
//! A rule maps a three-cell neighborhood (left, center, right) to the next
//! state of the center cell. Cells at both ends of the line see the BORDER
//! symbol in place of a missing neighbor.

use std::fmt;
use std::sync::{Arc, OnceLock};

/// A cell state, a BORDER symbol or one of the table sentinels.
pub type State = u8;

/// Quiescent soldier.
pub const REST: State = 0;
/// The initiator at the left end of the line.
pub const GENERAL: State = 1;
/// Table entry that no real evolution ever reaches.
pub const UNUSED: State = 8;
/// Table entry whose neighborhood cannot occur at all.
pub const IMPOSSIBLE: State = 9;

/// The set of states an automaton works with.
///
/// States `0..states-1` are ordinary states with `FIRE = states - 1`, and
/// `states` itself is the BORDER symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Alphabet {
    states: u8,
}

impl Alphabet {
    /// Smallest supported state count (REST, GENERAL, one intermediate, FIRE).
    pub const MIN_STATES: u8 = 4;
    /// Largest state count whose BORDER stays below the sentinels.
    pub const MAX_STATES: u8 = 7;

    /// Create an alphabet with the given number of states.
    pub fn new(states: u8) -> Result<Self, RuleError> {
        if !(Self::MIN_STATES..=Self::MAX_STATES).contains(&states) {
            return Err(RuleError::UnsupportedStates(states));
        }
        Ok(Self { states })
    }

    /// The classic 5-state alphabet.
    pub const fn five() -> Self {
        Self { states: 5 }
    }

    /// The 6-state alphabet.
    pub const fn six() -> Self {
        Self { states: 6 }
    }

    #[inline]
    pub const fn states(self) -> u8 {
        self.states
    }

    #[inline]
    pub const fn fire(self) -> State {
        self.states - 1
    }

    #[inline]
    pub const fn border(self) -> State {
        self.states
    }

    /// State both soldiers of a two-cell squad hold one step before firing.
    ///
    /// GENERAL for up to 5 states, the first intermediate state otherwise.
    #[inline]
    pub const fn pair_state(self) -> State {
        if self.states <= 5 { GENERAL } else { GENERAL + 1 }
    }

    /// Number of symbols a neighbor can take (states plus BORDER).
    #[inline]
    pub const fn digits(self) -> usize {
        self.states as usize + 1
    }

    /// Size of a full rule table.
    #[inline]
    pub const fn table_len(self) -> usize {
        self.digits() * self.digits() * self.digits()
    }

    /// Returns true for values above BORDER (UNUSED, IMPOSSIBLE).
    #[inline]
    pub const fn is_sentinel(self, state: State) -> bool {
        state > self.border()
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::five()
    }
}

/// Typed key of a rule table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Neighborhood {
    pub left: State,
    pub center: State,
    pub right: State,
}

impl Neighborhood {
    #[inline]
    pub const fn new(left: State, center: State, right: State) -> Self {
        Self {
            left,
            center,
            right,
        }
    }

    /// Flat table index: `left * d^2 + center * d + right` with `d = states + 1`.
    #[inline]
    pub fn index(self, alphabet: Alphabet) -> usize {
        debug_assert!(
            self.left <= alphabet.border()
                && self.center <= alphabet.border()
                && self.right <= alphabet.border(),
            "neighborhood {self} contains a sentinel"
        );
        let d = alphabet.digits();
        (self.left as usize * d + self.center as usize) * d + self.right as usize
    }

    /// Inverse of [`Neighborhood::index`].
    pub fn from_index(index: usize, alphabet: Alphabet) -> Self {
        let d = alphabet.digits();
        let right = index % d;
        let rest = index / d;
        Self {
            left: (rest / d) as State,
            center: (rest % d) as State,
            right: right as State,
        }
    }

    /// Whether the neighborhood lies in the pre-fire domain that solution
    /// files store: no FIRE anywhere, BORDER only as a single outer neighbor.
    pub fn is_persisted(self, alphabet: Alphabet) -> bool {
        let fire = alphabet.fire();
        let border = alphabet.border();
        let inner = |s: State| s < fire;
        let outer = |s: State| s < fire || s == border;
        outer(self.left)
            && inner(self.center)
            && outer(self.right)
            && !(self.left == border && self.right == border)
    }
}

impl fmt::Display for Neighborhood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.left, self.center, self.right)
    }
}

/// Classification of a rule table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleClass {
    /// The neighborhood never occurs (BORDER center, BORDER on both sides,
    /// or a FIRE cell which ends every evolution).
    Impossible,
    /// Entry pinned by convention: quiescence and the two-cell base case.
    Fixed(State),
    /// Entry explored by the optimizer.
    Mutable,
}

/// Classify a neighborhood.
pub fn classify(n: Neighborhood, alphabet: Alphabet) -> RuleClass {
    let fire = alphabet.fire();
    let border = alphabet.border();
    let pair = alphabet.pair_state();
    let Neighborhood {
        left,
        center,
        right,
    } = n;

    if center == border || (left == border && right == border) {
        return RuleClass::Impossible;
    }
    if left == fire && center == fire && right == fire {
        return RuleClass::Fixed(fire);
    }
    if left == fire || center == fire || right == fire {
        return RuleClass::Impossible;
    }

    let left_border = left == border;
    let right_border = right == border;
    match (left, center, right) {
        // quiescence
        (REST, REST, REST) => RuleClass::Fixed(REST),
        (_, REST, REST) if left_border => RuleClass::Fixed(REST),
        (REST, REST, _) if right_border => RuleClass::Fixed(REST),
        // two-cell squad: G R -> p p -> F F
        (_, GENERAL, REST) if left_border => RuleClass::Fixed(pair),
        (GENERAL, REST, _) if right_border => RuleClass::Fixed(pair),
        (_, c, r) if left_border && c == pair && r == pair => RuleClass::Fixed(fire),
        (l, c, _) if right_border && l == pair && c == pair => RuleClass::Fixed(fire),
        (l, c, r) if l == pair && c == pair && r == pair => RuleClass::Fixed(fire),
        _ => RuleClass::Mutable,
    }
}

/// Classification of every index of a table, computed once per alphabet.
#[derive(Debug)]
pub struct RuleLayout {
    alphabet: Alphabet,
    classes: Vec<RuleClass>,
    mutable: Vec<usize>,
    persisted: Vec<usize>,
}

impl RuleLayout {
    /// Classify every index of a table for `alphabet`.
    pub fn new(alphabet: Alphabet) -> Self {
        let len = alphabet.table_len();
        let mut classes = Vec::with_capacity(len);
        let mut mutable = Vec::new();
        let mut persisted = Vec::new();

        for index in 0..len {
            let n = Neighborhood::from_index(index, alphabet);
            let class = classify(n, alphabet);
            if class == RuleClass::Mutable {
                mutable.push(index);
            }
            if n.is_persisted(alphabet) {
                persisted.push(index);
            }
            classes.push(class);
        }

        Self {
            alphabet,
            classes,
            mutable,
            persisted,
        }
    }

    /// Shared layout for `alphabet`, built on first use.
    pub fn shared(alphabet: Alphabet) -> Arc<Self> {
        const SLOTS: usize = (Alphabet::MAX_STATES - Alphabet::MIN_STATES + 1) as usize;
        static LAYOUTS: [OnceLock<Arc<RuleLayout>>; SLOTS] = [const { OnceLock::new() }; SLOTS];

        let slot = &LAYOUTS[(alphabet.states() - Alphabet::MIN_STATES) as usize];
        Arc::clone(slot.get_or_init(|| Arc::new(Self::new(alphabet))))
    }

    #[inline]
    pub fn alphabet(&self) -> Alphabet {
        self.alphabet
    }

    #[inline]
    pub fn class(&self, index: usize) -> RuleClass {
        self.classes[index]
    }

    /// Indices the optimizer may mutate, ascending.
    #[inline]
    pub fn mutable_indices(&self) -> &[usize] {
        &self.mutable
    }

    /// Indices stored by the solution file format, ascending.
    #[inline]
    pub fn persisted_indices(&self) -> &[usize] {
        &self.persisted
    }

    #[inline]
    pub fn is_mutable(&self, index: usize) -> bool {
        matches!(self.classes.get(index), Some(RuleClass::Mutable))
    }
}

/// Errors raised when editing a rule table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    #[error("Unsupported state count {0} (expected 4..=7)")]
    UnsupportedStates(u8),
    #[error("Rule index {index} is out of range for a table of {len} entries")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Rule index {index} ({neighborhood}) is not mutable")]
    NotMutable {
        index: usize,
        neighborhood: Neighborhood,
    },
    #[error("State {value} is not a valid rule output (FIRE is {fire})")]
    InvalidState { value: State, fire: State },
}

/// A candidate rule table with its cached fitness.
///
/// Cloning copies the table; the layout is shared.
#[derive(Debug, Clone)]
pub struct RuleSet {
    layout: Arc<RuleLayout>,
    rules: Box<[State]>,
    fitness: usize,
    invalid: bool,
}

impl RuleSet {
    /// Table with every fixed rule set and every mutable entry at REST.
    pub fn new(alphabet: Alphabet) -> Self {
        let layout = RuleLayout::shared(alphabet);
        let rules = (0..alphabet.table_len())
            .map(|index| match layout.class(index) {
                RuleClass::Impossible => IMPOSSIBLE,
                RuleClass::Fixed(state) => state,
                RuleClass::Mutable => REST,
            })
            .collect();

        Self {
            layout,
            rules,
            fitness: 0,
            invalid: true,
        }
    }

    #[inline]
    pub fn alphabet(&self) -> Alphabet {
        self.layout.alphabet
    }

    #[inline]
    pub fn layout(&self) -> &RuleLayout {
        &self.layout
    }

    #[inline]
    pub fn rules(&self) -> &[State] {
        &self.rules
    }

    /// Raw access for loaders, which may also overwrite fixed entries.
    pub(crate) fn rules_mut(&mut self) -> &mut [State] {
        self.invalid = true;
        &mut self.rules
    }

    #[inline]
    pub fn get(&self, n: Neighborhood) -> State {
        self.rules[n.index(self.alphabet())]
    }

    /// Set a mutable entry, returning its previous value.
    ///
    /// Fixed and impossible entries are rejected and left untouched.
    pub fn mutate(&mut self, index: usize, value: State) -> Result<State, RuleError> {
        let alphabet = self.alphabet();
        if index >= self.rules.len() {
            return Err(RuleError::IndexOutOfRange {
                index,
                len: self.rules.len(),
            });
        }
        if !self.layout.is_mutable(index) {
            return Err(RuleError::NotMutable {
                index,
                neighborhood: Neighborhood::from_index(index, alphabet),
            });
        }
        if value > alphabet.fire() {
            return Err(RuleError::InvalidState {
                value,
                fire: alphabet.fire(),
            });
        }

        let previous = std::mem::replace(&mut self.rules[index], value);
        self.invalidate();
        Ok(previous)
    }

    /// Mark a mutable entry as never reached.
    ///
    /// Only rendering tolerates such entries; evaluation requires a complete table.
    pub fn mark_unused(&mut self, index: usize) -> Result<(), RuleError> {
        if !self.layout.is_mutable(index) {
            return Err(RuleError::NotMutable {
                index,
                neighborhood: Neighborhood::from_index(index, self.alphabet()),
            });
        }
        self.rules[index] = UNUSED;
        self.invalidate();
        Ok(())
    }

    /// Restore every fixed entry to its conventional value.
    pub fn apply_fixed_rules(&mut self) {
        for index in 0..self.rules.len() {
            if let RuleClass::Fixed(state) = self.layout.class(index) {
                self.rules[index] = state;
            }
        }
        self.invalidate();
    }

    /// Number of entries marked UNUSED.
    pub fn unused_count(&self) -> usize {
        self.rules.iter().filter(|&&r| r == UNUSED).count()
    }

    /// Cached fitness: the largest squad size synchronized.
    ///
    /// Meaningless while [`RuleSet::is_invalid`] is true.
    #[inline]
    pub fn fitness(&self) -> usize {
        self.fitness
    }

    /// Store a freshly computed fitness and clear the invalid flag.
    #[inline]
    pub fn set_fitness(&mut self, fitness: usize) {
        self.fitness = fitness;
        self.invalid = false;
    }

    #[inline]
    pub fn invalidate(&mut self) {
        self.invalid = true;
    }

    #[inline]
    pub fn is_invalid(&self) -> bool {
        self.invalid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_alphabet_bounds() {
        assert!(Alphabet::new(3).is_err());
        assert!(Alphabet::new(8).is_err());
        let a = Alphabet::new(5).unwrap();
        assert_eq!(a, Alphabet::five());
        assert_eq!(a.fire(), 4);
        assert_eq!(a.border(), 5);
        assert_eq!(a.table_len(), 216);
        assert_eq!(Alphabet::six().pair_state(), 2);
    }

    #[test]
    fn test_layout_counts_five_states() {
        let layout = RuleLayout::new(Alphabet::five());
        assert_eq!(layout.persisted_indices().len(), 96);
        // 96 pre-fire entries minus 8 fixed ones
        assert_eq!(layout.mutable_indices().len(), 88);
    }

    #[test]
    fn test_layout_counts_six_states() {
        let layout = RuleLayout::new(Alphabet::six());
        assert_eq!(layout.persisted_indices().len(), 175);
        assert_eq!(layout.mutable_indices().len(), 175 - 8);
    }

    #[test]
    fn test_fixed_rules() {
        let a = Alphabet::five();
        let b = a.border();
        let f = a.fire();
        let rules = RuleSet::new(a);

        assert_eq!(rules.get(Neighborhood::new(REST, REST, REST)), REST);
        assert_eq!(rules.get(Neighborhood::new(b, REST, REST)), REST);
        assert_eq!(rules.get(Neighborhood::new(REST, REST, b)), REST);
        assert_eq!(rules.get(Neighborhood::new(b, GENERAL, REST)), GENERAL);
        assert_eq!(rules.get(Neighborhood::new(GENERAL, REST, b)), GENERAL);
        assert_eq!(rules.get(Neighborhood::new(b, GENERAL, GENERAL)), f);
        assert_eq!(rules.get(Neighborhood::new(GENERAL, GENERAL, b)), f);
        assert_eq!(rules.get(Neighborhood::new(GENERAL, GENERAL, GENERAL)), f);
        assert_eq!(rules.get(Neighborhood::new(f, f, f)), f);
        assert_eq!(rules.get(Neighborhood::new(b, REST, b)), IMPOSSIBLE);
        assert_eq!(rules.get(Neighborhood::new(REST, b, REST)), IMPOSSIBLE);
        assert_eq!(rules.get(Neighborhood::new(REST, f, REST)), IMPOSSIBLE);
        assert!(rules.is_invalid());
    }

    #[test]
    fn test_mutate_rejects_non_mutable() {
        let a = Alphabet::five();
        let mut rules = RuleSet::new(a);
        let before = rules.rules().to_vec();

        let impossible = Neighborhood::new(a.border(), REST, a.border()).index(a);
        assert!(matches!(
            rules.mutate(impossible, 2),
            Err(RuleError::NotMutable { .. })
        ));
        let fixed = Neighborhood::new(REST, REST, REST).index(a);
        assert!(rules.mutate(fixed, 2).is_err());
        assert!(rules.mutate(a.table_len(), 2).is_err());
        assert_eq!(rules.rules(), &before[..]);
    }

    #[test]
    fn test_mutate_invalidates() {
        let a = Alphabet::five();
        let mut rules = RuleSet::new(a);
        rules.set_fitness(7);
        assert!(!rules.is_invalid());

        let index = rules.layout().mutable_indices()[3];
        assert_eq!(rules.mutate(index, 3), Ok(REST));
        assert!(rules.is_invalid());
        assert_eq!(rules.rules()[index], 3);
        assert!(rules.mutate(index, a.fire() + 1).is_err());
    }

    #[test]
    fn test_clone_is_deep() {
        let mut a = RuleSet::new(Alphabet::five());
        let b = a.clone();
        let index = a.layout().mutable_indices()[0];
        a.mutate(index, 2).unwrap();
        assert_eq!(b.rules()[index], REST);
    }

    #[test]
    fn test_shared_layout_is_cached() {
        let l1 = RuleLayout::shared(Alphabet::six());
        let l2 = RuleLayout::shared(Alphabet::six());
        assert!(Arc::ptr_eq(&l1, &l2));
    }

    proptest! {
        #[test]
        fn neighborhood_index_roundtrip(states in 4u8..=7, seed in 0usize..512) {
            let alphabet = Alphabet::new(states).unwrap();
            let index = seed % alphabet.table_len();
            let n = Neighborhood::from_index(index, alphabet);
            prop_assert_eq!(n.index(alphabet), index);
        }
    }
}
