// src/automaton/error.rs
use thiserror::Error;

use super::graph::StateId;

/// Malformed pattern. Every variant carries the byte offset it refers to.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unterminated character class opened at offset {open}")]
    UnterminatedClass { open: usize },

    #[error("unterminated group opened at offset {open}")]
    UnterminatedGroup { open: usize },

    #[error("empty character class at offset {open}")]
    EmptyClass { open: usize },

    #[error("unmatched ')' at offset {at}")]
    UnmatchedClose { at: usize },

    #[error("non-ASCII byte 0x{byte:02X} at offset {at}")]
    NonAscii { at: usize, byte: u8 },

    #[error("groups nested deeper than {max} at offset {at}")]
    NestingTooDeep { at: usize, max: usize },
}

impl ParseError {
    pub fn offset(&self) -> usize {
        match *self {
            ParseError::UnterminatedClass { open }
            | ParseError::UnterminatedGroup { open }
            | ParseError::EmptyClass { open } => open,
            ParseError::UnmatchedClose { at }
            | ParseError::NonAscii { at, .. }
            | ParseError::NestingTooDeep { at, .. } => at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationError {
    #[error("{graph} state limit exceeded: {states} states (max: {max})")]
    StateLimit {
        graph: &'static str,
        states: usize,
        max: usize,
    },
}

/// Misuse of the graph API. These indicate a bug in the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogicError {
    #[error("state {0} is not live")]
    DeadState(StateId),

    #[error("state {0} freed twice")]
    DoubleFree(StateId),

    #[error("state {state} is not reachable from root {root}")]
    Unreachable { root: StateId, state: StateId },

    #[error("cannot merge away the root state {0}")]
    MergeRoot(StateId),

    #[error(
        "state {state} already has an edge on 0x{byte:02X} to {existing}, refusing {attempted}"
    )]
    Nondeterministic {
        state: StateId,
        byte: u8,
        existing: StateId,
        attempted: StateId,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Allocation(#[from] AllocationError),

    #[error(transparent)]
    Logic(#[from] LogicError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_reports_offset() {
        let e = ParseError::UnterminatedGroup { open: 3 };
        assert_eq!(e.offset(), 3);
        assert_eq!(e.to_string(), "unterminated group opened at offset 3");
    }

    #[test]
    fn wrapped_errors_display_transparently() {
        let e: Error = AllocationError::StateLimit {
            graph: "NFA",
            states: 9,
            max: 8,
        }
        .into();
        assert_eq!(e.to_string(), "NFA state limit exceeded: 9 states (max: 8)");
    }
}
