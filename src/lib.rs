pub mod automaton;
pub mod config;
pub mod dev;
pub mod lexer;

pub use automaton::{
    Automaton, Dfa, Error, Nfa, NfaBuilder, StateId, TokenId, determinize,
    error::{AllocationError, LogicError, ParseError},
};
pub use config::Limits;
