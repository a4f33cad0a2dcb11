// src/automaton/subset.rs
// Powerset construction. Each DFA state stands for one reachable set of NFA
// states; the sets are hash-consed through their sorted encoding so a given
// set is materialized exactly once.

use std::{
    collections::{BTreeMap, BTreeSet},
    time::Instant,
};

use hashbrown::HashMap;

use super::{
    dfa::Dfa,
    error::Error,
    graph::{Nfa, StateId, TokenId},
};
use crate::config::Limits;

/// Sorted, immutable encoding of a set of NFA states.
type Configuration = Box<[StateId]>;

/// Union of the tokens accepted by any member of `config`.
fn accept_union(nfa: &Nfa, config: &[StateId]) -> BTreeSet<TokenId> {
    config
        .iter()
        .filter_map(|&s| nfa.state(s))
        .flat_map(|st| st.accept().iter().copied())
        .collect()
}

/// For every byte leaving `config`, the union of the NFA successors.
fn moves(nfa: &Nfa, config: &[StateId]) -> BTreeMap<u8, BTreeSet<StateId>> {
    let mut out: BTreeMap<u8, BTreeSet<StateId>> = BTreeMap::new();
    for st in config.iter().filter_map(|&s| nfa.state(s)) {
        for (&b, succ) in st.transitions() {
            out.entry(b).or_default().extend(succ.iter().copied());
        }
    }
    out
}

/// Builds the DFA equivalent to `nfa`, starting from the configuration
/// `{ nfa.root() }`. A DFA state accepts every token accepted by any NFA state
/// in its configuration.
pub fn determinize(nfa: &Nfa, limits: &Limits) -> Result<Dfa, Error> {
    let t0 = Instant::now();
    let mut dfa = Dfa::default();
    let mut memo: HashMap<Configuration, StateId> = HashMap::new();

    let seed: Configuration = Box::new([nfa.root()]);
    let start = dfa.create_state(seed.clone(), accept_union(nfa, &seed), limits.max_dfa_states)?;
    memo.insert(seed, start);

    // The memo is the cycle guard: a configuration is queued only when it is
    // first inserted, so each one is expanded exactly once.
    let mut pending = vec![start];
    while let Some(id) = pending.pop() {
        let config = match dfa.state(id) {
            Some(st) => st.configuration().to_vec(),
            None => continue,
        };
        for (byte, targets) in moves(nfa, &config) {
            if targets.is_empty() {
                continue;
            }
            let key: Configuration = targets.into_iter().collect();
            let next = match memo.get(&key) {
                Some(&existing) => existing,
                None => {
                    let accept = accept_union(nfa, &key);
                    let created = dfa.create_state(key.clone(), accept, limits.max_dfa_states)?;
                    memo.insert(key, created);
                    pending.push(created);
                    created
                }
            };
            dfa.add_transition(id, byte, next)?;
        }
    }

    log::debug!(
        "subset construction: {} NFA states -> {} DFA states in {:?}",
        nfa.live_states(),
        dfa.len(),
        t0.elapsed()
    );
    Ok(dfa)
}
