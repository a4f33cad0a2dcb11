// src/bin/gen_lex_tables.rs
// Compile a JSON rule file into lexer tables.
// Usage:
//   cargo run --bin gen_lex_tables -- rules/demo.json          # tables/lexer_tables.json
//   cargo run --bin gen_lex_tables -- rules/demo.json out.bin  # compact binary
//
// Malformed rules are reported and skipped; set GEN_STRICT=1 to fail instead.

use std::{env, fs, path::Path};

use anyhow::{Context, Result, bail};
use relex::{
    Limits,
    lexer::{
        RuleSet, compile_rules,
        tables::{INVALID_TOKEN, compile_rules_skipping, save_tables_bin, save_tables_json},
    },
};

fn main() -> Result<()> {
    let mut args = env::args().skip(1);
    let Some(rules_path) = args.next() else {
        bail!("usage: gen_lex_tables <rules.json> [out.json|out.bin]");
    };
    let out = args
        .next()
        .unwrap_or_else(|| "tables/lexer_tables.json".to_string());
    let out_path = Path::new(&out);
    let strict = env::var("GEN_STRICT").is_ok_and(|v| v == "1");

    let rules = RuleSet::load(Path::new(&rules_path))?;
    let limits = Limits::from_env();
    println!("[gen_lex_tables] {} rules from {rules_path}", rules.rules.len());

    let tables = if strict {
        compile_rules(&rules, &limits).inspect_err(|e| {
            if let Some(caret) = e.caret() {
                eprintln!("{caret}");
            }
        })?
    } else {
        let (tables, skipped) = compile_rules_skipping(&rules, &limits)?;
        for e in &skipped {
            eprintln!("warning: skipped {e}");
            if let Some(caret) = e.caret() {
                eprintln!("{caret}");
            }
        }
        tables
    };

    let accepting = tables.token_of.iter().filter(|&&t| t != INVALID_TOKEN).count();
    println!(
        "[gen_lex_tables] {} states x {} classes = {} entries, {} accepting states",
        tables.n_states,
        tables.n_classes,
        tables.next.len(),
        accepting
    );

    if let Some(parent) = out_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    match out_path.extension().and_then(|e| e.to_str()) {
        Some("bin") => save_tables_bin(out_path, &tables)?,
        Some("json") => save_tables_json(out_path, &tables)?,
        _ => bail!("output must end in .json or .bin: {}", out_path.display()),
    }
    println!("[gen_lex_tables] wrote {}", out_path.display());
    Ok(())
}
