//! Compilation from the regex AST to a deterministic [`Automaton`].
//!
//! Two stages: Thompson construction into an epsilon-NFA whose edges carry
//! character ranges, then subset construction into the arena DFA. During
//! determinization the outgoing edges of a closure set are cut into disjoint
//! segments at every range boundary, segments with equal destination sets
//! are merged back, and the resulting transitions come out sorted by range
//! start. The grid solver relies on that ordering for deterministic
//! candidate enumeration.

use crate::automaton::{Automaton, StateId};
use crate::parser::syntax::Ast;
use std::collections::{BTreeSet, HashMap, VecDeque};

#[derive(Debug, Default)]
struct NfaState {
    epsilon: Vec<usize>,
    /// (min, max, dest) character-range edges.
    edges: Vec<(char, char, usize)>,
}

#[derive(Debug, Default)]
struct Nfa {
    states: Vec<NfaState>,
}

impl Nfa {
    fn add_state(&mut self) -> usize {
        self.states.push(NfaState::default());
        self.states.len() - 1
    }

    fn add_epsilon(&mut self, from: usize, to: usize) {
        self.states[from].epsilon.push(to);
    }

    fn add_edge(&mut self, from: usize, min: char, max: char, to: usize) {
        self.states[from].edges.push((min, max, to));
    }

    /// Thompson construction: one fragment per AST node, returned as its
    /// (enter, exit) state pair.
    fn fragment(&mut self, ast: &Ast) -> (usize, usize) {
        match ast {
            Ast::Empty => {
                let enter = self.add_state();
                let exit = self.add_state();
                self.add_epsilon(enter, exit);
                (enter, exit)
            }
            Ast::Literal(c) => {
                let enter = self.add_state();
                let exit = self.add_state();
                self.add_edge(enter, *c, *c, exit);
                (enter, exit)
            }
            Ast::Class(ranges) => {
                // A fully-negated class has no ranges; the fragment is a
                // dead end, which is exactly the empty language.
                let enter = self.add_state();
                let exit = self.add_state();
                for &(min, max) in ranges {
                    self.add_edge(enter, min, max, exit);
                }
                (enter, exit)
            }
            Ast::Concat(parts) => {
                let enter = self.add_state();
                let mut tail = enter;
                for part in parts {
                    let (e, x) = self.fragment(part);
                    self.add_epsilon(tail, e);
                    tail = x;
                }
                (enter, tail)
            }
            Ast::Alternate(branches) => {
                let enter = self.add_state();
                let exit = self.add_state();
                for branch in branches {
                    let (e, x) = self.fragment(branch);
                    self.add_epsilon(enter, e);
                    self.add_epsilon(x, exit);
                }
                (enter, exit)
            }
            Ast::Repeat { inner, min, max } => self.repeat_fragment(inner, *min, *max),
        }
    }

    /// `inner{min,}` / `inner{min,max}`: `min` required copies chained in a
    /// row, then either a loop (unbounded) or `max - min` skippable copies.
    fn repeat_fragment(&mut self, inner: &Ast, min: u32, max: Option<u32>) -> (usize, usize) {
        let enter = self.add_state();
        let mut tail = enter;
        for _ in 0..min {
            let (e, x) = self.fragment(inner);
            self.add_epsilon(tail, e);
            tail = x;
        }

        let exit = self.add_state();
        match max {
            None => {
                let (e, x) = self.fragment(inner);
                self.add_epsilon(tail, e);
                self.add_epsilon(x, e); // loop back for further repetitions
                self.add_epsilon(tail, exit);
                self.add_epsilon(x, exit);
            }
            Some(max) => {
                for _ in min..max {
                    let (e, x) = self.fragment(inner);
                    self.add_epsilon(tail, exit); // each extra copy is optional
                    self.add_epsilon(tail, e);
                    tail = x;
                }
                self.add_epsilon(tail, exit);
            }
        }
        (enter, exit)
    }

    /// Epsilon closure of a set of NFA states.
    fn closure(&self, seeds: impl IntoIterator<Item = usize>) -> BTreeSet<usize> {
        let mut set: BTreeSet<usize> = seeds.into_iter().collect();
        let mut stack: Vec<usize> = set.iter().copied().collect();
        while let Some(id) = stack.pop() {
            for &next in &self.states[id].epsilon {
                if set.insert(next) {
                    stack.push(next);
                }
            }
        }
        set
    }
}

/// Compile an AST into a deterministic automaton.
pub(crate) fn build(ast: &Ast) -> Automaton {
    let mut nfa = Nfa::default();
    let (start, accept) = nfa.fragment(ast);
    determinize(&nfa, start, accept)
}

/// Subset construction over range edges.
fn determinize(nfa: &Nfa, start: usize, accept: usize) -> Automaton {
    let mut dfa = Automaton::new();
    let mut ids: HashMap<BTreeSet<usize>, StateId> = HashMap::new();
    let mut worklist: VecDeque<BTreeSet<usize>> = VecDeque::new();

    let start_set = nfa.closure([start]);
    let start_id = dfa.add_state(start_set.contains(&accept));
    ids.insert(start_set.clone(), start_id);
    worklist.push_back(start_set);

    while let Some(set) = worklist.pop_front() {
        let from = ids[&set];

        let edges: Vec<(u32, u32, usize)> = set
            .iter()
            .flat_map(|&id| nfa.states[id].edges.iter())
            .map(|&(min, max, dest)| (min as u32, max as u32, dest))
            .collect();

        // Cut the character space at every range boundary, so that within
        // one segment every edge either fully applies or not at all.
        let mut cuts: BTreeSet<u32> = BTreeSet::new();
        for &(min, max, _) in &edges {
            cuts.insert(min);
            cuts.insert(max + 1);
        }
        let cuts: Vec<u32> = cuts.into_iter().collect();

        // (min, max, dest) per segment, in ascending order; adjacent
        // segments with the same destination are merged back together.
        let mut pending: Vec<(u32, u32, StateId)> = Vec::new();
        for window in cuts.windows(2) {
            let (seg_min, seg_max) = (window[0], window[1] - 1);
            let targets: Vec<usize> = edges
                .iter()
                .filter(|&&(min, max, _)| min <= seg_min && seg_min <= max)
                .map(|&(_, _, dest)| dest)
                .collect();
            if targets.is_empty() {
                continue;
            }

            let target_set = nfa.closure(targets);
            let dest = *ids.entry(target_set.clone()).or_insert_with(|| {
                worklist.push_back(target_set.clone());
                dfa.add_state(target_set.contains(&accept))
            });

            match pending.last_mut() {
                Some((_, prev_max, prev_dest)) if *prev_dest == dest && *prev_max + 1 == seg_min => {
                    *prev_max = seg_max;
                }
                _ => pending.push((seg_min, seg_max, dest)),
            }
        }

        for (min, max, dest) in pending {
            // The alphabet is ASCII, so the u8 casts cannot truncate.
            dfa.add_transition(from, min as u8 as char, max as u8 as char, dest);
        }
    }

    dfa
}
