// src/automaton/dfa.rs
use std::collections::{BTreeMap, BTreeSet};

use super::{
    error::{AllocationError, LogicError},
    graph::{Automaton, StateId, TokenId},
};

/// One deterministic state. `configuration` is the sorted set of NFA states it
/// stands for; a missing transition means reject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DfaState {
    pub(crate) transitions: BTreeMap<u8, StateId>,
    pub(crate) accept: BTreeSet<TokenId>,
    pub(crate) configuration: Box<[StateId]>,
}

impl DfaState {
    pub fn transitions(&self) -> &BTreeMap<u8, StateId> {
        &self.transitions
    }

    pub fn accept(&self) -> &BTreeSet<TokenId> {
        &self.accept
    }

    pub fn configuration(&self) -> &[StateId] {
        &self.configuration
    }
}

/// Deterministic automaton produced by subset construction. States are dense:
/// ids run from 0 to `len() - 1`, and the start state is always 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dfa {
    states: Vec<DfaState>,
}

impl Dfa {
    pub(crate) fn create_state(
        &mut self,
        configuration: Box<[StateId]>,
        accept: BTreeSet<TokenId>,
        max_states: usize,
    ) -> Result<StateId, AllocationError> {
        let limit = AllocationError::StateLimit {
            graph: "DFA",
            states: self.states.len() + 1,
            max: max_states,
        };
        if self.states.len() >= max_states {
            return Err(limit);
        }
        let id = StateId(u32::try_from(self.states.len()).map_err(|_| limit)?);
        self.states.push(DfaState {
            transitions: BTreeMap::new(),
            accept,
            configuration,
        });
        Ok(id)
    }

    /// Installs `from --byte--> to`. Re-installing the same edge is a no-op;
    /// a different target for an existing edge would break determinism.
    pub fn add_transition(
        &mut self,
        from: StateId,
        byte: u8,
        to: StateId,
    ) -> Result<(), LogicError> {
        if self.state(to).is_none() {
            return Err(LogicError::DeadState(to));
        }
        let st = self
            .states
            .get_mut(from.index())
            .ok_or(LogicError::DeadState(from))?;
        match st.transitions.get(&byte) {
            Some(&existing) if existing != to => Err(LogicError::Nondeterministic {
                state: from,
                byte,
                existing,
                attempted: to,
            }),
            Some(_) => Ok(()),
            None => {
                st.transitions.insert(byte, to);
                Ok(())
            }
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn state(&self, id: StateId) -> Option<&DfaState> {
        self.states.get(id.index())
    }

    pub fn states(&self) -> impl Iterator<Item = (StateId, &DfaState)> {
        self.states
            .iter()
            .enumerate()
            .map(|(i, s)| (StateId(i as u32), s))
    }

    #[inline]
    pub fn step(&self, id: StateId, byte: u8) -> Option<StateId> {
        self.state(id)?.transitions.get(&byte).copied()
    }

    /// State reached after consuming all of `input`, if any.
    pub fn run(&self, input: &[u8]) -> Option<StateId> {
        if self.is_empty() {
            return None;
        }
        input
            .iter()
            .try_fold(self.start(), |at, &b| self.step(at, b))
    }

    pub fn accepted_tokens(&self, input: &[u8]) -> BTreeSet<TokenId> {
        self.run(input)
            .and_then(|s| self.state(s))
            .map(|s| s.accept.clone())
            .unwrap_or_default()
    }

    pub fn accepts(&self, input: &[u8]) -> bool {
        self.run(input).is_some_and(|s| self.is_accepting(s))
    }
}

impl Automaton for Dfa {
    fn start(&self) -> StateId {
        StateId(0)
    }

    fn edges(&self, id: StateId) -> Vec<(u8, StateId)> {
        self.state(id)
            .map(|s| s.transitions.iter().map(|(&b, &to)| (b, to)).collect())
            .unwrap_or_default()
    }

    fn accept_tokens(&self, id: StateId) -> Option<&BTreeSet<TokenId>> {
        self.state(id).map(|s| &s.accept)
    }
}
