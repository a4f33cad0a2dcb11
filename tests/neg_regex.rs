//! Malformed patterns must come back as errors, never panics or hangs.

use relex::{Error, NfaBuilder, ParseError};

fn compile(pattern: &str) -> Result<(), Error> {
    let mut b = NfaBuilder::new().expect("builder");
    b.compile_pattern(pattern).map(|_| ())
}

#[test]
fn unterminated_group() {
    assert_eq!(
        compile("(a"),
        Err(Error::Parse(ParseError::UnterminatedGroup { open: 0 }))
    );
}

#[test]
fn unterminated_inner_group() {
    assert_eq!(
        compile("a(b(c)"),
        Err(Error::Parse(ParseError::UnterminatedGroup { open: 1 }))
    );
}

#[test]
fn unterminated_class() {
    assert_eq!(
        compile("[abc"),
        Err(Error::Parse(ParseError::UnterminatedClass { open: 0 }))
    );
}

#[test]
fn class_swallows_close_paren() {
    // ')' is literal inside brackets, so the group never closes.
    assert_eq!(
        compile("([)]"),
        Err(Error::Parse(ParseError::UnterminatedGroup { open: 0 }))
    );
}

#[test]
fn unmatched_close() {
    assert_eq!(
        compile("ab)"),
        Err(Error::Parse(ParseError::UnmatchedClose { at: 2 }))
    );
}

#[test]
fn empty_class() {
    assert_eq!(
        compile("a[]"),
        Err(Error::Parse(ParseError::EmptyClass { open: 1 }))
    );
}

#[test]
fn builder_survives_a_bad_pattern() {
    let mut b = NfaBuilder::new().expect("builder");
    assert!(b.compile_pattern("((x)").is_err());
    assert_eq!(b.nfa().live_states(), 1);
    assert!(b.compile_pattern("x").is_ok());
}
