// src/automaton/mod.rs
pub mod builder;
pub mod dfa;
pub mod error;
pub mod graph;
mod merge;
pub mod parser;
pub mod subset;
pub mod visual;

pub use builder::NfaBuilder;
pub use dfa::{Dfa, DfaState};
pub use error::Error;
pub use graph::{Automaton, Nfa, NfaState, StateId, TokenId, reachable_states, walk};
pub use subset::determinize;
pub use visual::{DotWriter, GraphSink, edge_label, emit_graph, to_dot};
