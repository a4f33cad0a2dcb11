// src/main.rs
// Compile a small rule set in memory and tokenize a sample with it.

use relex::{
    Limits,
    lexer::{RuleSet, compile_rules, lex_on_cpu},
};

fn rules() -> RuleSet {
    let lower: String = ('a'..='z').collect();
    let digits: String = ('0'..='9').collect();
    RuleSet::new()
        .rule("LET", "let")
        .rule("IF", "if")
        .rule("IDENT", format!("[{lower}_]([{lower}_{digits}])"))
        .rule("INT", format!("[{digits}]([{digits}])"))
        .rule("EQEQ", "==")
        .rule("ASSIGN", "=")
        .rule("PLUS", "+")
        .rule("STAR", "*")
        .rule("SEMI", ";")
        .skip_rule("WS", "[ \t\r\n]([ \t\r\n])")
}

fn main() {
    let src = r#"
        let foo = 12 + bar;
        let iffy = foo * 7;
        if == iffy
    "#;

    let tables = match compile_rules(&rules(), &Limits::from_env()) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("rule error: {e}");
            if let Some(caret) = e.caret() {
                eprintln!("{caret}");
            }
            std::process::exit(1);
        }
    };
    println!(
        "[relex] {} states, {} byte classes, {} tokens",
        tables.n_states,
        tables.n_classes,
        tables.tokens.len()
    );

    match lex_on_cpu(&tables, src) {
        Ok(tokens) => {
            println!("TOKENS:");
            for t in tokens {
                let lexeme = &src[t.start..t.start + t.len];
                let name = tables.token(t.kind).map_or("?", |i| i.name.as_str());
                println!("{name:<8} {lexeme:?}");
            }
        }
        Err(e) => eprintln!("lex error: {e}"),
    }
}
