// src/bin/fuzz_dfa.rs
// Random patterns, random inputs: the DFA must accept exactly the token set
// the NFA simulation accepts.
//   FUZZ_SEED=<u64>    (default 42)
//   FUZZ_ITERS=<n>     rule sets to try (default 2000)
//   FUZZ_RULES=<n>     patterns per rule set (default 4)
//   FUZZ_INPUTS=<n>    inputs per rule set (default 64)

use std::time::Instant;

use anyhow::{Context, Result, bail};
use rand::{SeedableRng, rngs::StdRng};
use relex::{
    Limits, NfaBuilder, TokenId, determinize,
    dev::generator::{gen_input, gen_pattern},
};

const ALPHABET: &[u8] = b"abcd";

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn main() -> Result<()> {
    let seed: u64 = env_or("FUZZ_SEED", 42);
    let iters: usize = env_or("FUZZ_ITERS", 2000);
    let n_rules: usize = env_or("FUZZ_RULES", 4);
    let n_inputs: usize = env_or("FUZZ_INPUTS", 64);
    let limits = Limits::from_env();

    println!("[fuzz_dfa] seed={seed} iters={iters} rules={n_rules} inputs={n_inputs}");
    let mut rng = StdRng::seed_from_u64(seed);
    let t0 = Instant::now();
    let mut max_dfa = 0;

    for iter in 0..iters {
        let patterns: Vec<String> = (0..n_rules)
            .map(|_| gen_pattern(&mut rng, ALPHABET, 4, 3))
            .collect();

        let mut builder = NfaBuilder::with_limits(limits)?;
        for (i, p) in patterns.iter().enumerate() {
            builder
                .add_rule(p, TokenId(i as u32))
                .with_context(|| format!("iter {iter}: generated pattern {p:?} rejected"))?;
        }
        let nfa = builder.finish();
        let dfa = determinize(&nfa, &limits)
            .with_context(|| format!("iter {iter}: patterns {patterns:?}"))?;
        max_dfa = max_dfa.max(dfa.len());

        for _ in 0..n_inputs {
            let w = gen_input(&mut rng, ALPHABET, 16);
            let want = nfa.simulate(&w);
            let got = dfa.accepted_tokens(&w);
            if want != got {
                let input = String::from_utf8_lossy(&w);
                bail!(
                    "mismatch at iter {iter} (seed {seed})\n  patterns: {patterns:?}\n  \
                     input: {input:?}\n  nfa: {want:?}\n  dfa: {got:?}"
                );
            }
        }
        if (iter + 1) % 500 == 0 {
            println!("[fuzz_dfa] {} / {iters} ok", iter + 1);
        }
    }

    println!(
        "[fuzz_dfa] {iters} rule sets agree (largest DFA {max_dfa} states) in {:?}",
        t0.elapsed()
    );
    Ok(())
}
