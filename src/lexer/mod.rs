// src/lexer/mod.rs
pub mod cpu;
pub mod tables;

pub use cpu::{CpuToken, LexError, lex_on_cpu};
pub use tables::{LexTables, RuleSet, TokenRule, compile_rules};
