// src/lexer/tables/mod.rs
pub mod build;
pub mod io;
pub mod tokens;

pub use build::{build_tables, compile_rules, compile_rules_skipping};
pub use io::{load_tables_bin_bytes, load_tables_json_bytes, save_tables_bin, save_tables_json};
pub use tokens::{INVALID_TOKEN, RuleError, RuleSet, TokenId, TokenInfo, TokenRule};

// Marks a missing transition in `next`.
pub const NO_STATE: u32 = u32::MAX;

/// Dense lexer tables derived from a DFA.
///
/// Bytes that every state treats alike share a class, so `next` is
/// `n_states * n_classes` entries, row-major by state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexTables {
    pub byte_class: [u16; 256],
    pub n_classes: u32,
    pub n_states: u32,
    pub start: u32,
    pub next: Vec<u32>,     // state*n_classes + class -> state or NO_STATE
    pub token_of: Vec<u32>, // state -> lowest accepted token or INVALID_TOKEN
    pub tokens: Vec<TokenInfo>,
}

impl LexTables {
    #[inline]
    pub fn step(&self, state: u32, byte: u8) -> Option<u32> {
        let class = self.byte_class[byte as usize] as usize;
        let next = self.next[state as usize * self.n_classes as usize + class];
        (next != NO_STATE).then_some(next)
    }

    #[inline]
    pub fn token_at(&self, state: u32) -> Option<TokenId> {
        let t = self.token_of[state as usize];
        (t != INVALID_TOKEN).then_some(TokenId(t))
    }

    pub fn token(&self, id: TokenId) -> Option<&TokenInfo> {
        self.tokens.get(id.0 as usize)
    }

    /// Structural checks shared by both loaders.
    pub fn validate(&self) -> Result<(), String> {
        let n_states = self.n_states as usize;
        let n_classes = self.n_classes as usize;
        if n_states == 0 || n_classes == 0 {
            return Err("tables must have at least one state and one class".into());
        }
        if self.start >= self.n_states {
            return Err(format!("start {} out of range ({n_states} states)", self.start));
        }
        if let Some(c) = self.byte_class.iter().find(|&&c| c as usize >= n_classes) {
            return Err(format!("byte class {c} out of range ({n_classes} classes)"));
        }
        let expected = n_states
            .checked_mul(n_classes)
            .ok_or("n_states*n_classes overflow")?;
        if self.next.len() != expected {
            return Err(format!("next has {} entries, expected {expected}", self.next.len()));
        }
        if let Some(s) = self.next.iter().find(|&&s| s != NO_STATE && s >= self.n_states) {
            return Err(format!("transition to state {s} out of range"));
        }
        if self.token_of.len() != n_states {
            return Err(format!(
                "token_of has {} entries, expected {n_states}",
                self.token_of.len()
            ));
        }
        if let Some(t) = self
            .token_of
            .iter()
            .find(|&&t| t != INVALID_TOKEN && t as usize >= self.tokens.len())
        {
            return Err(format!("token {t} out of range ({} tokens)", self.tokens.len()));
        }
        Ok(())
    }
}
