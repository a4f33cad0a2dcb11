// src/automaton/graph.rs
// Arena-backed NFA plus the traversal contract shared with the DFA.
//
// States are addressed by `StateId` (an index into the arena); the handle value
// is the state's identity. There are no parent links, so anything that has to
// find the edges pointing at a state walks the whole graph from a root.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use super::error::{AllocationError, LogicError};
use crate::config::Limits;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateId(pub(crate) u32);

impl StateId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0)
    }
}

/// Identifier of the token a pattern produces. Lower ids win ties in the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenId(pub u32);

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// Read-only view used by traversal and visualization.
pub trait Automaton {
    fn start(&self) -> StateId;

    /// Outgoing edges of `id` in byte order. A dead handle has none.
    fn edges(&self, id: StateId) -> Vec<(u8, StateId)>;

    fn accept_tokens(&self, id: StateId) -> Option<&BTreeSet<TokenId>>;

    fn is_accepting(&self, id: StateId) -> bool {
        self.accept_tokens(id).is_some_and(|t| !t.is_empty())
    }
}

/// Depth-first walk from `root`, returning newly discovered states in
/// discovery order. States already in `visited` are neither returned nor
/// expanded, which is what makes the walk terminate on cyclic graphs.
pub fn walk<A: Automaton + ?Sized>(
    automaton: &A,
    root: StateId,
    visited: &mut HashSet<StateId>,
) -> Vec<StateId> {
    let mut order = Vec::new();
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        if !visited.insert(id) {
            continue;
        }
        order.push(id);
        // Reversed so the lowest byte's target is popped first.
        for (_, next) in automaton.edges(id).into_iter().rev() {
            if !visited.contains(&next) {
                stack.push(next);
            }
        }
    }
    order
}

pub fn reachable_states<A: Automaton + ?Sized>(automaton: &A, root: StateId) -> HashSet<StateId> {
    let mut visited = HashSet::new();
    walk(automaton, root, &mut visited);
    visited
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NfaState {
    pub(crate) transitions: BTreeMap<u8, BTreeSet<StateId>>,
    pub(crate) accept: BTreeSet<TokenId>,
}

impl NfaState {
    pub fn transitions(&self) -> &BTreeMap<u8, BTreeSet<StateId>> {
        &self.transitions
    }

    pub fn successors(&self, byte: u8) -> Option<&BTreeSet<StateId>> {
        self.transitions.get(&byte)
    }

    pub fn accept(&self) -> &BTreeSet<TokenId> {
        &self.accept
    }
}

/// Non-deterministic automaton over bytes. Freed slots are recycled.
#[derive(Debug, Clone)]
pub struct Nfa {
    slots: Vec<Option<NfaState>>,
    free: Vec<StateId>,
    live: usize,
    root: StateId,
    max_states: usize,
}

impl Nfa {
    /// An automaton holding just its root state.
    pub fn new(limits: &Limits) -> Result<Self, AllocationError> {
        let mut nfa = Self {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
            root: StateId(0),
            max_states: limits.max_nfa_states,
        };
        nfa.root = nfa.create_state()?;
        Ok(nfa)
    }

    pub fn root(&self) -> StateId {
        self.root
    }

    pub fn live_states(&self) -> usize {
        self.live
    }

    pub fn is_live(&self, id: StateId) -> bool {
        self.state(id).is_some()
    }

    pub fn state(&self, id: StateId) -> Option<&NfaState> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    pub(crate) fn state_mut(&mut self, id: StateId) -> Result<&mut NfaState, LogicError> {
        self.slots
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(LogicError::DeadState(id))
    }

    pub fn create_state(&mut self) -> Result<StateId, AllocationError> {
        let limit = AllocationError::StateLimit {
            graph: "NFA",
            states: self.live + 1,
            max: self.max_states,
        };
        if self.live >= self.max_states {
            return Err(limit);
        }
        let id = match self.free.pop() {
            Some(id) => {
                self.slots[id.index()] = Some(NfaState::default());
                id
            }
            None => {
                let raw = u32::try_from(self.slots.len()).map_err(|_| limit)?;
                self.slots.push(Some(NfaState::default()));
                StateId(raw)
            }
        };
        self.live += 1;
        Ok(id)
    }

    /// Adds `to` to the edge set of `from` on `byte`. Returns whether the edge
    /// was new.
    pub fn add_transition(
        &mut self,
        from: StateId,
        byte: u8,
        to: StateId,
    ) -> Result<bool, LogicError> {
        if !self.is_live(to) {
            return Err(LogicError::DeadState(to));
        }
        Ok(self
            .state_mut(from)?
            .transitions
            .entry(byte)
            .or_default()
            .insert(to))
    }

    pub fn mark_accepting(&mut self, id: StateId, token: TokenId) -> Result<bool, LogicError> {
        Ok(self.state_mut(id)?.accept.insert(token))
    }

    /// Releases one slot without looking at who points to it.
    pub(crate) fn free_state(&mut self, id: StateId) -> Result<NfaState, LogicError> {
        let slot = self
            .slots
            .get_mut(id.index())
            .ok_or(LogicError::DeadState(id))?;
        let state = slot.take().ok_or(LogicError::DoubleFree(id))?;
        self.free.push(id);
        self.live -= 1;
        Ok(state)
    }

    pub fn reachable_states(&self, root: StateId) -> Result<HashSet<StateId>, LogicError> {
        if !self.is_live(root) {
            return Err(LogicError::DeadState(root));
        }
        Ok(reachable_states(self, root))
    }

    /// Frees every state reachable from `root`, each exactly once. Returns how
    /// many states were released.
    pub fn destroy(&mut self, root: StateId) -> Result<usize, LogicError> {
        let mut nodes: Vec<StateId> = self.reachable_states(root)?.into_iter().collect();
        // Highest first, so the free list hands the lowest ids out again first.
        nodes.sort_unstable_by(|a, b| b.cmp(a));
        for &id in &nodes {
            self.free_state(id)?;
        }
        log::debug!(
            "destroyed {} NFA states from {root}, {} still live",
            nodes.len(),
            self.live
        );
        Ok(nodes.len())
    }

    /// Set-of-states simulation from the root. Returns the tokens accepted by
    /// any state alive after consuming all of `input`.
    pub fn simulate(&self, input: &[u8]) -> BTreeSet<TokenId> {
        let mut current: BTreeSet<StateId> = BTreeSet::new();
        if self.is_live(self.root) {
            current.insert(self.root);
        }
        for &b in input {
            let mut next = BTreeSet::new();
            for &id in &current {
                if let Some(succ) = self.state(id).and_then(|s| s.successors(b)) {
                    next.extend(succ.iter().copied());
                }
            }
            if next.is_empty() {
                return BTreeSet::new();
            }
            current = next;
        }
        current
            .iter()
            .filter_map(|&id| self.state(id))
            .flat_map(|s| s.accept.iter().copied())
            .collect()
    }

    pub fn accepts(&self, input: &[u8]) -> bool {
        !self.simulate(input).is_empty()
    }
}

impl Automaton for Nfa {
    fn start(&self) -> StateId {
        self.root
    }

    fn edges(&self, id: StateId) -> Vec<(u8, StateId)> {
        self.state(id)
            .map(|s| {
                s.transitions
                    .iter()
                    .flat_map(|(&b, set)| set.iter().map(move |&to| (b, to)))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn accept_tokens(&self, id: StateId) -> Option<&BTreeSet<TokenId>> {
        self.state(id).map(|s| &s.accept)
    }
}
