// src/bin/dfa_dot.rs
// Render the NFA or DFA for a set of patterns as Graphviz DOT.
// Usage:
//   cargo run --bin dfa_dot -- 'ab(c)' 'b[xy]'         # DFA to stdout
//   cargo run --bin dfa_dot -- --nfa 'ab(c)'           # NFA instead
//   cargo run --bin dfa_dot -- rules/demo.json out.dot
//
// Arguments ending in .json are loaded as rule files; one ending in .dot is
// the output path.

use std::{fs, path::Path};

use anyhow::{Context, Result, bail};
use relex::{
    Limits, NfaBuilder, TokenId,
    automaton::{determinize, to_dot},
    lexer::RuleSet,
};

fn main() -> Result<()> {
    let mut want_nfa = false;
    let mut out: Option<String> = None;
    let mut patterns: Vec<String> = Vec::new();

    for arg in std::env::args().skip(1) {
        if arg == "--nfa" {
            want_nfa = true;
        } else if arg.ends_with(".dot") {
            out = Some(arg);
        } else if arg.ends_with(".json") {
            let rules = RuleSet::load(Path::new(&arg))?;
            patterns.extend(rules.rules.into_iter().map(|r| r.pattern));
        } else {
            patterns.push(arg);
        }
    }
    if patterns.is_empty() {
        bail!("usage: dfa_dot [--nfa] <pattern|rules.json>... [out.dot]");
    }

    let limits = Limits::from_env();
    let mut builder = NfaBuilder::with_limits(limits)?;
    for (i, p) in patterns.iter().enumerate() {
        builder
            .add_rule(p, TokenId(i as u32))
            .with_context(|| format!("pattern #{i} {p:?}"))?;
    }

    let dot = if want_nfa {
        to_dot(builder.nfa())
    } else {
        let dfa = determinize(builder.nfa(), &limits)?;
        eprintln!(
            "[dfa_dot] {} patterns -> {} NFA states -> {} DFA states",
            patterns.len(),
            builder.nfa().live_states(),
            dfa.len()
        );
        to_dot(&dfa)
    };

    match out {
        Some(path) => {
            fs::write(&path, dot).with_context(|| format!("failed to write {path}"))?;
            eprintln!("[dfa_dot] wrote {path}");
        }
        None => print!("{dot}"),
    }
    Ok(())
}
