// src/lexer/cpu.rs
// Maximal-munch tokenizer over packed lexer tables.

use thiserror::Error;

use crate::lexer::tables::{LexTables, TokenId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuToken {
    pub kind: TokenId,
    pub start: usize,
    pub len: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("no token matches at byte {offset} (0x{byte:02X}); context from {ctx_lo}:\n{context}")]
    NoMatch {
        offset: usize,
        byte: u8,
        ctx_lo: usize,
        context: String,
    },
}

fn slice_dbg(src: &[u8], i: usize) -> (usize, String) {
    let lo = i.saturating_sub(16);
    let hi = (i + 16).min(src.len());
    let mut s = String::new();
    for &b in &src[lo..hi] {
        s.push(
            if b.is_ascii_graphic() || b == b' ' || b == b'\n' || b == b'\t' || b == b'\r' {
                b as char
            } else {
                '·'
            },
        );
    }
    (lo, s)
}

/// Longest match first; ties go to the token the tables chose for the state.
/// Tokens whose rule is marked `skip` are consumed but not returned. Empty
/// matches are never produced.
pub fn lex_on_cpu(tables: &LexTables, input: &str) -> Result<Vec<CpuToken>, LexError> {
    let bytes = input.as_bytes();
    let n = bytes.len();
    let mut out = Vec::new();
    let mut pos = 0;

    while pos < n {
        let mut state = tables.start;
        let mut last: Option<(usize, TokenId)> = None;
        let mut i = pos;
        while i < n {
            let Some(next) = tables.step(state, bytes[i]) else {
                break;
            };
            state = next;
            i += 1;
            if let Some(tok) = tables.token_at(state) {
                last = Some((i, tok));
            }
        }

        let Some((end, kind)) = last else {
            let (ctx_lo, context) = slice_dbg(bytes, pos);
            return Err(LexError::NoMatch {
                offset: pos,
                byte: bytes[pos],
                ctx_lo,
                context,
            });
        };
        let keep = tables.token(kind).is_none_or(|t| !t.skip);
        if keep {
            out.push(CpuToken {
                kind,
                start: pos,
                len: end - pos,
            });
        }
        pos = end;
    }

    log::trace!("lexed {n} bytes into {} tokens", out.len());
    Ok(out)
}
