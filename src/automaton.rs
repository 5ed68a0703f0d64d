//! Deterministic finite automata over character ranges.
//!
//! States live in a flat arena and reference each other by index
//! ([`StateId`]), so the state graph carries no ownership cycles. Each state
//! has an accept flag and a list of outgoing [`Transition`]s, kept sorted by
//! range start and pairwise disjoint. That ordering is what makes the grid
//! solver's candidate enumeration deterministic.
//!
//! The only operation beyond construction and lookup is [`Automaton::intersect`],
//! the reachable-pair product used to conjoin a line's two constraint
//! patterns into a single automaton.

use std::collections::{HashMap, VecDeque};

/// Index of a state within its owning automaton's arena.
pub type StateId = usize;

/// One outgoing edge: any character in the closed range `[min, max]` moves
/// to `dest` within the same automaton.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub min: char,
    pub max: char,
    pub dest: StateId,
}

#[derive(Debug, Clone)]
pub struct State {
    accept: bool,
    transitions: Vec<Transition>,
}

/// A deterministic finite automaton.
///
/// Invariants, upheld by the builders in this crate:
/// - per state, transition ranges are pairwise disjoint and sorted by `min`
///   (determinism: at most one destination per character);
/// - every `dest` indexes into this automaton's own arena;
/// - the initial state is the first state added.
#[derive(Debug, Clone)]
pub struct Automaton {
    states: Vec<State>,
    initial: StateId,
}

impl Automaton {
    pub(crate) fn new() -> Self {
        Automaton { states: Vec::new(), initial: 0 }
    }

    pub(crate) fn add_state(&mut self, accept: bool) -> StateId {
        self.states.push(State { accept, transitions: Vec::new() });
        self.states.len() - 1
    }

    pub(crate) fn add_transition(&mut self, from: StateId, min: char, max: char, dest: StateId) {
        debug_assert!(min <= max, "transition range [{min}, {max}] is reversed");
        debug_assert!(dest < self.states.len(), "transition destination {dest} escapes the arena");
        self.states[from].transitions.push(Transition { min, max, dest });
    }

    pub fn initial(&self) -> StateId {
        self.initial
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn is_accept(&self, id: StateId) -> bool {
        self.states[id].accept
    }

    /// Outgoing transitions of `id`, sorted by range start.
    pub fn transitions(&self, id: StateId) -> &[Transition] {
        &self.states[id].transitions
    }

    /// Follow the transition for `c` out of `id`, if any.
    pub fn step(&self, id: StateId, c: char) -> Option<StateId> {
        self.transitions(id)
            .iter()
            .find(|t| t.min <= c && c <= t.max)
            .map(|t| t.dest)
    }

    /// Whether the automaton accepts `input` as a whole string.
    pub fn accepts(&self, input: &str) -> bool {
        let mut current = self.initial;
        for c in input.chars() {
            match self.step(current, c) {
                Some(next) => current = next,
                None => return false,
            }
        }
        self.is_accept(current)
    }

    /// Build the product automaton accepting exactly the strings accepted by
    /// both `self` and `other`.
    ///
    /// Standard reachable-subset product: starting from the pair of initial
    /// states, each common character range (computed as a range overlap, not
    /// an alphabet sweep) yields one transition to the pair of destinations.
    /// A pair is accepting iff both components are. Unreachable pairs are
    /// never materialized. Total: the result may simply have no accepting
    /// path (the empty language).
    #[must_use]
    pub fn intersect(&self, other: &Automaton) -> Automaton {
        let mut product = Automaton::new();
        let mut ids: HashMap<(StateId, StateId), StateId> = HashMap::new();
        let mut worklist: VecDeque<(StateId, StateId)> = VecDeque::new();

        let start = (self.initial, other.initial);
        let start_id =
            product.add_state(self.is_accept(start.0) && other.is_accept(start.1));
        ids.insert(start, start_id);
        worklist.push_back(start);

        while let Some((a, b)) = worklist.pop_front() {
            let from = ids[&(a, b)];
            for t1 in self.transitions(a) {
                for t2 in other.transitions(b) {
                    let min = t1.min.max(t2.min);
                    let max = t1.max.min(t2.max);
                    if min > max {
                        continue;
                    }
                    let dest_pair = (t1.dest, t2.dest);
                    let dest = *ids.entry(dest_pair).or_insert_with(|| {
                        worklist.push_back(dest_pair);
                        product.add_state(
                            self.is_accept(dest_pair.0) && other.is_accept(dest_pair.1),
                        )
                    });
                    product.add_transition(from, min, max, dest);
                }
            }
        }

        product
    }
}
