// src/config.rs
// Build limits. Defaults are generous; every field can be overridden from the
// environment so the binaries and tests can be tightened without recompiling.

pub const ENV_MAX_NFA_STATES: &str = "RELEX_MAX_NFA_STATES";
pub const ENV_MAX_DFA_STATES: &str = "RELEX_MAX_DFA_STATES";
pub const ENV_MAX_GROUP_DEPTH: &str = "RELEX_MAX_GROUP_DEPTH";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Live NFA states allowed at any time (freed slots do not count).
    pub max_nfa_states: usize,
    /// DFA states subset construction may create.
    pub max_dfa_states: usize,
    /// Parenthesis nesting accepted by the parser; bounds its recursion.
    pub max_group_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_nfa_states: 1 << 16,
            max_dfa_states: 1 << 16,
            max_group_depth: 256,
        }
    }
}

fn env_usize(name: &str, default: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(default)
}

impl Limits {
    /// Defaults, overridden by any `RELEX_*` variables that parse as integers.
    pub fn from_env() -> Self {
        let d = Self::default();
        let limits = Self {
            max_nfa_states: env_usize(ENV_MAX_NFA_STATES, d.max_nfa_states),
            max_dfa_states: env_usize(ENV_MAX_DFA_STATES, d.max_dfa_states),
            max_group_depth: env_usize(ENV_MAX_GROUP_DEPTH, d.max_group_depth),
        };
        if limits != d {
            log::debug!("limits overridden from environment: {limits:?}");
        }
        limits
    }
}
