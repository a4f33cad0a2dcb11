// src/lexer/tables/build.rs
use std::time::Instant;

use hashbrown::HashMap;
use rayon::prelude::*;

use super::{
    INVALID_TOKEN, LexTables, NO_STATE,
    tokens::{RuleError, RuleSet, TokenId, TokenInfo},
};
use crate::{
    automaton::{Dfa, NfaBuilder, StateId, determinize},
    config::Limits,
};

/// Column of the transition function for one byte: the target of every state.
fn column(dfa: &Dfa, byte: u8) -> Vec<u32> {
    (0..dfa.len())
        .map(|s| {
            dfa.step(StateId(s as u32), byte)
                .map_or(NO_STATE, |t| t.0)
        })
        .collect()
}

/// Packs `dfa` into dense tables. When a state accepts several tokens the
/// lowest id is kept.
pub fn build_tables(dfa: &Dfa, tokens: Vec<TokenInfo>) -> LexTables {
    let t0 = Instant::now();
    let n_states = dfa.len();

    let columns: Vec<Vec<u32>> = (0u16..256)
        .into_par_iter()
        .map(|b| column(dfa, b as u8))
        .collect();

    // Intern identical columns; class ids follow first occurrence so the
    // result does not depend on hashing order.
    let mut byte_class = [0u16; 256];
    let mut representative: Vec<usize> = Vec::new();
    let mut interned: HashMap<&[u32], u16> = HashMap::new();
    for (b, col) in columns.iter().enumerate() {
        let fresh = representative.len() as u16;
        let class = *interned.entry(col.as_slice()).or_insert_with(|| {
            representative.push(b);
            fresh
        });
        byte_class[b] = class;
    }
    let n_classes = representative.len();

    let mut next = vec![NO_STATE; n_states * n_classes];
    next.par_chunks_mut(n_classes)
        .enumerate()
        .for_each(|(s, row)| {
            for (c, &b) in representative.iter().enumerate() {
                row[c] = columns[b][s];
            }
        });

    let token_of: Vec<u32> = dfa
        .states()
        .map(|(_, st)| st.accept().first().map_or(INVALID_TOKEN, |t| t.0))
        .collect();

    log::info!(
        "[tables] {n_states} states x {n_classes} byte classes ({} entries), {} tokens, took {:?}",
        next.len(),
        tokens.len(),
        t0.elapsed()
    );

    LexTables {
        byte_class,
        n_classes: n_classes as u32,
        n_states: n_states as u32,
        start: 0,
        next,
        token_of,
        tokens,
    }
}

/// Compiles every rule into one NFA, determinizes it and packs the tables.
/// The first malformed rule aborts the build.
pub fn compile_rules(rules: &RuleSet, limits: &Limits) -> Result<LexTables, RuleError> {
    let (tables, errors) = compile(rules, limits, false)?;
    debug_assert!(errors.is_empty());
    Ok(tables)
}

/// Like [`compile_rules`], but malformed rules are skipped and returned. A
/// skipped rule keeps its `TokenId`; it simply never matches.
pub fn compile_rules_skipping(
    rules: &RuleSet,
    limits: &Limits,
) -> Result<(LexTables, Vec<RuleError>), RuleError> {
    compile(rules, limits, true)
}

fn compile(
    rules: &RuleSet,
    limits: &Limits,
    keep_going: bool,
) -> Result<(LexTables, Vec<RuleError>), RuleError> {
    rules.validate()?;
    let mut builder = NfaBuilder::with_limits(*limits)?;
    let mut skipped = Vec::new();

    for (index, rule) in rules.rules.iter().enumerate() {
        if let Err(source) = builder.add_rule(&rule.pattern, TokenId(index as u32)) {
            let err = RuleError::Pattern {
                index,
                name: rule.name.clone(),
                pattern: rule.pattern.clone(),
                source,
            };
            if !keep_going {
                return Err(err);
            }
            log::warn!("skipping {err}");
            skipped.push(err);
        }
    }

    let dfa = determinize(builder.nfa(), limits)?;
    log::debug!(
        "{} rules -> {} NFA states -> {} DFA states",
        rules.rules.len(),
        builder.nfa().live_states(),
        dfa.len()
    );
    Ok((build_tables(&dfa, rules.token_infos()), skipped))
}
