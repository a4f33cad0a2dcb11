//! The checked-in demo rule file compiles and lexes a small program, and the
//! packed tables survive both on-disk formats.

use std::path::{Path, PathBuf};

use relex::{
    Limits,
    lexer::{
        LexError, LexTables, RuleSet, compile_rules, lex_on_cpu,
        tables::{load_tables_bin_bytes, load_tables_json_bytes, save_tables_bin, save_tables_json},
    },
};

fn demo_rules() -> RuleSet {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("rules/demo.json");
    RuleSet::load(&path).expect("rules/demo.json")
}

fn demo_tables() -> LexTables {
    compile_rules(&demo_rules(), &Limits::default()).expect("demo rules compile")
}

fn names(t: &LexTables, src: &str) -> Vec<(String, String)> {
    lex_on_cpu(t, src)
        .unwrap()
        .into_iter()
        .map(|tok| {
            (
                t.token(tok.kind).unwrap().name.clone(),
                src[tok.start..tok.start + tok.len].to_string(),
            )
        })
        .collect()
}

fn scratch(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("relex-it-{}-{name}", std::process::id()))
}

#[test]
fn demo_program_tokenizes() {
    let t = demo_tables();
    let got = names(&t, "let x1 = 12 + y;\nif x1 == 3 { lettuce }");
    let want: Vec<(&str, &str)> = vec![
        ("LET", "let"),
        ("IDENT", "x1"),
        ("ASSIGN", "="),
        ("INT", "12"),
        ("PLUS", "+"),
        ("IDENT", "y"),
        ("SEMI", ";"),
        ("IF", "if"),
        ("IDENT", "x1"),
        ("EQEQ", "=="),
        ("INT", "3"),
        ("LBRACE", "{"),
        ("IDENT", "lettuce"),
        ("RBRACE", "}"),
    ];
    let want: Vec<(String, String)> = want
        .into_iter()
        .map(|(a, b)| (a.to_string(), b.to_string()))
        .collect();
    assert_eq!(got, want);
}

#[test]
fn unknown_byte_is_reported_with_context() {
    let t = demo_tables();
    let err = lex_on_cpu(&t, "let a = 1 $ 2").unwrap_err();
    let LexError::NoMatch { offset, byte, .. } = err;
    assert_eq!((offset, byte), (10, b'$'));
}

#[test]
fn both_formats_reload_to_the_same_tables() {
    let t = demo_tables();

    let json = scratch("demo.json");
    save_tables_json(&json, &t).unwrap();
    let from_json = load_tables_json_bytes(&std::fs::read(&json).unwrap()).unwrap();
    let _ = std::fs::remove_file(&json);

    let bin = scratch("demo.bin");
    save_tables_bin(&bin, &t).unwrap();
    let from_bin = load_tables_bin_bytes(&std::fs::read(&bin).unwrap()).unwrap();
    let _ = std::fs::remove_file(&bin);

    assert_eq!(from_json, t);
    assert_eq!(from_bin, t);
    let src = "let a = b * 2;";
    assert_eq!(names(&from_bin, src), names(&t, src));
}
