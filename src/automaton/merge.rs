// src/automaton/merge.rs
// Whole-graph state unification; the parser's only way to build a loop.

use super::{
    error::LogicError,
    graph::{Nfa, StateId},
};

impl Nfa {
    /// Redirects every edge that targets `from` onto `to` and removes `from`.
    ///
    /// Both states must be reachable from `root`. The removed state is unified
    /// with `to`: its outgoing edges (already redirected) and accepted tokens
    /// move over before its slot is released, so nothing that was reachable
    /// through `from` is lost. Merging a state into itself is a no-op.
    pub fn merge_states(
        &mut self,
        root: StateId,
        from: StateId,
        to: StateId,
    ) -> Result<(), LogicError> {
        if from == to {
            return Ok(());
        }
        if from == root {
            return Err(LogicError::MergeRoot(root));
        }
        let nodes = self.reachable_states(root)?;
        for state in [from, to] {
            if !nodes.contains(&state) {
                return Err(LogicError::Unreachable { root, state });
            }
        }

        let mut rewritten = 0usize;
        for &id in &nodes {
            let st = self.state_mut(id)?;
            for targets in st.transitions.values_mut() {
                // Edge sets are ordered by content, so swapping a member keeps
                // them canonical without any separate re-indexing.
                if targets.remove(&from) {
                    targets.insert(to);
                    rewritten += 1;
                }
            }
        }

        let removed = self.free_state(from)?;
        let target = self.state_mut(to)?;
        for (byte, succ) in removed.transitions {
            target.transitions.entry(byte).or_default().extend(succ);
        }
        target.accept.extend(removed.accept);

        log::trace!("merged {from} into {to}: {rewritten} edge sets rewritten");
        Ok(())
    }

    /// Copies the outgoing edges and accepted tokens of a pattern's private
    /// `entry` onto the root, so the root gains that pattern's language and
    /// nothing else. `entry` is freed unless a state of its own pattern still
    /// points at it (a leading group). Returns whether `entry` survived.
    pub fn graft_entry(&mut self, entry: StateId) -> Result<bool, LogicError> {
        let root = self.root();
        if entry == root {
            return Ok(true);
        }
        let copied = self.state(entry).cloned().ok_or(LogicError::DeadState(entry))?;
        let pointed_at = self.reachable_states(entry)?.iter().any(|&id| {
            self.state(id)
                .is_some_and(|st| st.transitions.values().any(|t| t.contains(&entry)))
        });

        let target = self.state_mut(root)?;
        for (byte, succ) in copied.transitions {
            target.transitions.entry(byte).or_default().extend(succ);
        }
        target.accept.extend(copied.accept);

        if !pointed_at {
            self.free_state(entry)?;
        }
        log::trace!("grafted {entry} onto {root}, kept: {pointed_at}");
        Ok(pointed_at)
    }
}
