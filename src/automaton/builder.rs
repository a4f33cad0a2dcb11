// src/automaton/builder.rs
use super::{
    error::{Error, LogicError},
    graph::{Nfa, StateId, TokenId},
    parser::parse_pattern,
};
use crate::config::Limits;

/// Accumulates any number of patterns into one shared NFA.
///
/// Each pattern is parsed from a private entry state and then grafted onto the
/// root, so a pattern's loops never reach the root and patterns cannot change
/// what each other match.
#[derive(Debug, Clone)]
pub struct NfaBuilder {
    nfa: Nfa,
    limits: Limits,
    patterns: usize,
}

impl NfaBuilder {
    pub fn new() -> Result<Self, Error> {
        Self::with_limits(Limits::default())
    }

    pub fn with_limits(limits: Limits) -> Result<Self, Error> {
        Ok(Self {
            nfa: Nfa::new(&limits)?,
            limits,
            patterns: 0,
        })
    }

    /// Compiles `pattern` without an accepting token and returns its exit
    /// state. Use [`add_rule`](Self::add_rule) to make a pattern produce a
    /// token: marking the exit afterwards misses the empty match when the
    /// pattern can match nothing at all.
    ///
    /// On error the NFA is left exactly as it was before the call, so the
    /// caller can report the pattern and carry on with the next one.
    pub fn compile_pattern(&mut self, pattern: &str) -> Result<StateId, Error> {
        self.compile(pattern, None)
    }

    /// Compiles `pattern` and marks its exit state as accepting `token`.
    pub fn add_rule(&mut self, pattern: &str, token: TokenId) -> Result<StateId, Error> {
        self.compile(pattern, Some(token))
    }

    fn compile(&mut self, pattern: &str, token: Option<TokenId>) -> Result<StateId, Error> {
        let entry = self.nfa.create_state()?;
        let parsed = parse_pattern(&mut self.nfa, pattern, entry, self.limits.max_group_depth)
            .and_then(|exit| {
                if let Some(token) = token {
                    self.nfa.mark_accepting(exit, token)?;
                }
                Ok(exit)
            });
        let exit = match parsed {
            Ok(exit) => exit,
            Err(e) => {
                // Everything the pattern created hangs off its entry.
                let freed = self.nfa.destroy(entry)?;
                log::warn!("pattern {pattern:?} rejected ({freed} states released): {e}");
                return Err(e);
            }
        };

        let kept = self.nfa.graft_entry(entry)?;
        let exit = if exit == entry && !kept {
            self.nfa.root()
        } else {
            exit
        };
        self.patterns += 1;
        log::debug!(
            "compiled pattern #{} {pattern:?}: exit {exit}, {} live NFA states",
            self.patterns,
            self.nfa.live_states()
        );
        Ok(exit)
    }

    pub fn mark_accepting(&mut self, state: StateId, token: TokenId) -> Result<(), LogicError> {
        self.nfa.mark_accepting(state, token)?;
        Ok(())
    }

    pub fn patterns(&self) -> usize {
        self.patterns
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub fn nfa(&self) -> &Nfa {
        &self.nfa
    }

    pub fn finish(self) -> Nfa {
        self.nfa
    }
}
