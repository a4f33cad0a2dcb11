// src/lexer/tables/tokens.rs
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use crate::automaton::TokenId;

// Marks a state with no token in the packed tables.
pub const INVALID_TOKEN: u32 = u32::MAX;

/// One lexer rule. The rule's position in its `RuleSet` is its `TokenId`, so
/// earlier rules win when two rules accept the same text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRule {
    pub name: String,
    pub pattern: String,
    /// Matched but dropped from the token stream (whitespace, comments).
    #[serde(default)]
    pub skip: bool,
}

/// What the packed tables remember about each token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub name: String,
    #[serde(default)]
    pub skip: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    pub rules: Vec<TokenRule>,
}

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("failed to read rules from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse rules JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("rule set is empty")]
    Empty,

    #[error("duplicate rule name {name:?} (rules #{first} and #{second})")]
    DuplicateName {
        name: String,
        first: usize,
        second: usize,
    },

    #[error("rule #{index} {name:?} pattern {pattern:?}: {source}")]
    Pattern {
        index: usize,
        name: String,
        pattern: String,
        #[source]
        source: crate::automaton::Error,
    },

    #[error(transparent)]
    Automaton(#[from] crate::automaton::Error),
}

impl RuleError {
    /// For pattern errors: the pattern and a caret line under the offending
    /// byte, ready to print below the message.
    pub fn caret(&self) -> Option<String> {
        let RuleError::Pattern {
            pattern,
            source: crate::automaton::Error::Parse(pe),
            ..
        } = self
        else {
            return None;
        };
        Some(format!("  {pattern}\n  {}^", " ".repeat(pe.offset())))
    }
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule(mut self, name: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.rules.push(TokenRule {
            name: name.into(),
            pattern: pattern.into(),
            skip: false,
        });
        self
    }

    pub fn skip_rule(mut self, name: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.rules.push(TokenRule {
            name: name.into(),
            pattern: pattern.into(),
            skip: true,
        });
        self
    }

    pub fn from_json_bytes(data: &[u8]) -> Result<Self, RuleError> {
        let set: RuleSet = serde_json::from_slice(data)?;
        set.validate()?;
        Ok(set)
    }

    pub fn load(path: &Path) -> Result<Self, RuleError> {
        log::debug!("loading rules from {}", path.display());
        let data = std::fs::read(path).map_err(|source| RuleError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_bytes(&data)
    }

    /// Non-empty, with unique names.
    pub fn validate(&self) -> Result<(), RuleError> {
        if self.rules.is_empty() {
            return Err(RuleError::Empty);
        }
        for (second, r) in self.rules.iter().enumerate() {
            if let Some(first) = self.rules[..second].iter().position(|o| o.name == r.name) {
                return Err(RuleError::DuplicateName {
                    name: r.name.clone(),
                    first,
                    second,
                });
            }
        }
        Ok(())
    }

    pub fn token_infos(&self) -> Vec<TokenInfo> {
        self.rules
            .iter()
            .map(|r| TokenInfo {
                name: r.name.clone(),
                skip: r.skip,
            })
            .collect()
    }
}
