//! Differential tests: the DFA must accept exactly what the NFA accepts.
//!
//! Patterns and inputs come from the shared generator. Override the defaults
//! with RELEX_TEST_SEED / RELEX_TEST_CASES / RELEX_TEST_MAX_LEN.

use std::collections::BTreeSet;

use rand::{SeedableRng, rngs::StdRng};
use relex::{
    Automaton, Limits, Nfa, NfaBuilder, StateId, TokenId,
    automaton::{parser::parse_pattern, reachable_states},
    determinize,
    dev::generator::{all_inputs, gen_input, gen_pattern},
};

fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_usize(name: &str, default: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(default)
}

const ALPHABET: &[u8] = b"abc";

fn build(patterns: &[String]) -> Nfa {
    let mut b = NfaBuilder::new().expect("builder");
    for (i, p) in patterns.iter().enumerate() {
        b.add_rule(p, TokenId(i as u32))
            .unwrap_or_else(|e| panic!("pattern {p:?}: {e}"));
    }
    b.finish()
}

#[test]
fn literals_accept_exactly_themselves() {
    for lit in ["a", "abc", "hello", "x_1", "aaaa"] {
        let nfa = build(&[lit.to_string()]);
        let dfa = determinize(&nfa, &Limits::default()).unwrap();
        assert!(nfa.accepts(lit.as_bytes()), "{lit}");
        assert!(dfa.accepts(lit.as_bytes()), "{lit}");
        for cut in 0..lit.len() {
            assert!(!nfa.accepts(&lit.as_bytes()[..cut]), "{lit} prefix {cut}");
            assert!(!dfa.accepts(&lit.as_bytes()[..cut]), "{lit} prefix {cut}");
        }
        let longer = format!("{lit}a");
        assert!(!dfa.accepts(longer.as_bytes()));
        assert!(!dfa.accepts(b"zzz"));
    }
}

#[test]
fn repetition_of_single_atom() {
    // Parsed straight from a state, a group is a single self-looping state.
    let mut nfa = Nfa::new(&Limits::default()).unwrap();
    let root = nfa.root();
    let exit = parse_pattern(&mut nfa, "(a)", root, 8).unwrap();
    assert_eq!(exit, root);
    assert_eq!(nfa.live_states(), 1);
    assert_eq!(nfa.edges(root), vec![(b'a', root)]);

    // Through the builder the loop lives on the rule's own entry.
    let mut b = NfaBuilder::new().unwrap();
    let exit = b.add_rule("(a)", TokenId(0)).unwrap();
    let nfa = b.finish();
    assert_eq!(nfa.edges(exit), vec![(b'a', exit)]);
    assert_eq!(nfa.edges(nfa.root()), vec![(b'a', exit)]);

    let dfa = determinize(&nfa, &Limits::default()).unwrap();
    assert!(dfa.accepts(b""));
    assert!(dfa.accepts(b"aaaa"));
    assert!(!dfa.accepts(b"b"));
}

#[test]
fn rules_do_not_leak_into_each_other() {
    let nfa = build(&["(a)b".into(), "c".into(), "(c)".into()]);
    let dfa = determinize(&nfa, &Limits::default()).unwrap();
    assert_eq!(dfa.accepted_tokens(b"aac"), BTreeSet::new());
    assert_eq!(dfa.accepted_tokens(b"aab"), BTreeSet::from([TokenId(0)]));
    assert_eq!(dfa.accepted_tokens(b"c"), BTreeSet::from([TokenId(1), TokenId(2)]));
    assert_eq!(dfa.accepted_tokens(b"cc"), BTreeSet::from([TokenId(2)]));
    assert_eq!(dfa.accepted_tokens(b"ccb"), BTreeSet::new());
}

#[test]
fn random_patterns_agree_exhaustively() {
    let seed = env_u64("RELEX_TEST_SEED", 0x5eed);
    let cases = env_usize("RELEX_TEST_CASES", 150);
    let max_len = env_usize("RELEX_TEST_MAX_LEN", 5);
    let mut rng = StdRng::seed_from_u64(seed);
    let inputs = all_inputs(ALPHABET, max_len);

    for case in 0..cases {
        let patterns: Vec<String> = (0..3)
            .map(|_| gen_pattern(&mut rng, ALPHABET, 3, 2))
            .collect();
        let nfa = build(&patterns);
        let dfa = determinize(&nfa, &Limits::default()).unwrap();
        for w in &inputs {
            assert_eq!(
                dfa.accepted_tokens(w),
                nfa.simulate(w),
                "case {case} seed {seed} patterns {patterns:?} input {:?}",
                String::from_utf8_lossy(w)
            );
        }
        for _ in 0..20 {
            let w = gen_input(&mut rng, ALPHABET, 24);
            assert_eq!(dfa.accepts(&w), nfa.accepts(&w), "patterns {patterns:?}");
        }
    }
}

#[test]
fn determinizing_twice_gives_the_same_dfa() {
    let mut rng = StdRng::seed_from_u64(env_u64("RELEX_TEST_SEED", 42));
    for _ in 0..50 {
        let patterns: Vec<String> = (0..4)
            .map(|_| gen_pattern(&mut rng, ALPHABET, 4, 3))
            .collect();
        let nfa = build(&patterns);
        let a = determinize(&nfa, &Limits::default()).unwrap();
        let b = determinize(&nfa, &Limits::default()).unwrap();
        assert_eq!(a.len(), b.len());
        assert_eq!(a, b, "patterns {patterns:?}");
    }
}

#[test]
fn every_dfa_state_is_a_distinct_reachable_subset() {
    let nfa = build(&["a[ab](c)".into(), "ab(ca)".into(), "b(a)b".into()]);
    let dfa = determinize(&nfa, &Limits::default()).unwrap();

    let reachable = reachable_states(&dfa, dfa.start());
    assert_eq!(reachable.len(), dfa.len());

    let configs: BTreeSet<&[StateId]> = dfa.states().map(|(_, s)| s.configuration()).collect();
    assert_eq!(configs.len(), dfa.len());
    assert!(configs.iter().all(|c| !c.is_empty()));
}

#[test]
fn build_and_destroy_with_repetition_groups() {
    let mut b = NfaBuilder::new().unwrap();
    b.add_rule("(a)(b)", TokenId(0)).unwrap();
    b.add_rule("c(d)e", TokenId(1)).unwrap();
    let mut nfa = b.finish();
    let live = nfa.live_states();
    let root = nfa.root();

    let freed = nfa.destroy(root).unwrap();
    assert_eq!(freed, live);
    assert_eq!(nfa.live_states(), 0);
    // A second teardown is caught instead of double-freeing.
    assert!(nfa.destroy(root).is_err());
}

#[test]
fn class_edges_share_a_target() {
    let mut b = NfaBuilder::new().unwrap();
    let exit = b.compile_pattern("[abc]").unwrap();
    let nfa = b.finish();
    let edges = nfa.edges(nfa.root());
    assert_eq!(edges, vec![(b'a', exit), (b'b', exit), (b'c', exit)]);

    let mut dup = NfaBuilder::new().unwrap();
    dup.compile_pattern("[aab]").unwrap();
    let mut plain = NfaBuilder::new().unwrap();
    plain.compile_pattern("[ab]").unwrap();
    assert_eq!(
        dup.nfa().edges(dup.nfa().root()),
        plain.nfa().edges(plain.nfa().root())
    );
}
