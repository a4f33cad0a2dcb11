// src/lexer/tables/io.rs
use std::{
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    time::Instant,
};

use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use thiserror::Error;

use super::{LexTables, tokens::TokenInfo};

#[derive(Debug, Error)]
pub enum TablesError {
    #[error("failed to write tables to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("tables JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("truncated tables: {0}")]
    Truncated(&'static str),

    #[error("bad magic in tables .bin")]
    BadMagic,

    #[error("invalid tables: {0}")]
    Invalid(String),
}

// -------------------- JSON (de)serialization --------------------

#[serde_as]
#[derive(Serialize, Deserialize)]
struct TablesDisk {
    #[serde_as(as = "[_; 256]")]
    byte_class: [u16; 256],
    n_classes: u32,
    n_states: u32,
    start: u32,
    next: Vec<u32>,
    token_of: Vec<u32>,
    tokens: Vec<TokenInfo>,
}

impl From<&LexTables> for TablesDisk {
    fn from(t: &LexTables) -> Self {
        Self {
            byte_class: t.byte_class,
            n_classes: t.n_classes,
            n_states: t.n_states,
            start: t.start,
            next: t.next.clone(),
            token_of: t.token_of.clone(),
            tokens: t.tokens.clone(),
        }
    }
}

impl TablesDisk {
    fn into_tables(self) -> LexTables {
        LexTables {
            byte_class: self.byte_class,
            n_classes: self.n_classes,
            n_states: self.n_states,
            start: self.start,
            next: self.next,
            token_of: self.token_of,
            tokens: self.tokens,
        }
    }
}

fn write_err(path: &Path) -> impl FnOnce(std::io::Error) -> TablesError {
    let path = path.to_path_buf();
    move |source| TablesError::Write { path, source }
}

pub fn save_tables_json(path: &Path, t: &LexTables) -> Result<(), TablesError> {
    let f = std::fs::File::create(path).map_err(write_err(path))?;
    let mut w = BufWriter::new(f);
    serde_json::to_writer(&mut w, &TablesDisk::from(t))?;
    w.flush().map_err(write_err(path))
}

pub fn load_tables_json_bytes(data: &[u8]) -> Result<LexTables, TablesError> {
    let t = serde_json::from_slice::<TablesDisk>(data)?.into_tables();
    t.validate().map_err(TablesError::Invalid)?;
    Ok(t)
}

// -------------------- Compact binary --------------------
//   magic: 8 bytes = "RLXTBL01"
//   u32:   n_states, n_classes, start, n_tokens
//   u16:   byte_class[256]
//   u32:   next[n_states * n_classes]   // NO_STATE = 0xFFFF_FFFF
//   u32:   token_of[n_states]           // INVALID_TOKEN = 0xFFFF_FFFF
//   per token: u8 skip, u32 name_len, name bytes (UTF-8)
// All integers little-endian.

const BIN_MAGIC: &[u8; 8] = b"RLXTBL01";

pub fn save_tables_bin(path: &Path, t: &LexTables) -> Result<(), TablesError> {
    let instant = Instant::now();
    let f = std::fs::File::create(path).map_err(write_err(path))?;
    let mut w = BufWriter::new(f);

    let n_tokens = u32::try_from(t.tokens.len())
        .map_err(|_| TablesError::Invalid("too many tokens".into()))?;

    let mut write = || -> std::io::Result<()> {
        w.write_all(BIN_MAGIC)?;
        for v in [t.n_states, t.n_classes, t.start, n_tokens] {
            w.write_all(&v.to_le_bytes())?;
        }
        for c in t.byte_class {
            w.write_all(&c.to_le_bytes())?;
        }
        for v in t.next.iter().chain(t.token_of.iter()) {
            w.write_all(&v.to_le_bytes())?;
        }
        for tok in &t.tokens {
            w.write_all(&[tok.skip as u8])?;
            w.write_all(&(tok.name.len() as u32).to_le_bytes())?;
            w.write_all(tok.name.as_bytes())?;
        }
        w.flush()
    };
    write().map_err(write_err(path))?;

    log::debug!(
        "wrote binary tables to {} in {:?}",
        path.display(),
        instant.elapsed()
    );
    Ok(())
}

#[inline]
fn take<'a>(buf: &mut &'a [u8], n: usize, what: &'static str) -> Result<&'a [u8], TablesError> {
    if buf.len() < n {
        return Err(TablesError::Truncated(what));
    }
    let (head, rest) = buf.split_at(n);
    *buf = rest;
    Ok(head)
}

#[inline]
fn take_u32(buf: &mut &[u8], what: &'static str) -> Result<u32, TablesError> {
    let mut le = [0u8; 4];
    le.copy_from_slice(take(buf, 4, what)?);
    Ok(u32::from_le_bytes(le))
}

#[inline]
fn take_u16(buf: &mut &[u8], what: &'static str) -> Result<u16, TablesError> {
    let mut le = [0u8; 2];
    le.copy_from_slice(take(buf, 2, what)?);
    Ok(u16::from_le_bytes(le))
}

pub fn load_tables_bin_bytes(mut data: &[u8]) -> Result<LexTables, TablesError> {
    if take(&mut data, 8, "magic")? != BIN_MAGIC {
        return Err(TablesError::BadMagic);
    }
    let n_states = take_u32(&mut data, "header")?;
    let n_classes = take_u32(&mut data, "header")?;
    let start = take_u32(&mut data, "header")?;
    let n_tokens = take_u32(&mut data, "header")? as usize;

    let mut byte_class = [0u16; 256];
    for slot in byte_class.iter_mut() {
        *slot = take_u16(&mut data, "byte_class")?;
    }

    let n_next = (n_states as usize)
        .checked_mul(n_classes as usize)
        .ok_or_else(|| TablesError::Invalid("n_states*n_classes overflow".into()))?;
    // Bound allocations by what the buffer can actually hold.
    if data.len() / 4 < n_next {
        return Err(TablesError::Truncated("next"));
    }
    let mut next = Vec::with_capacity(n_next);
    for _ in 0..n_next {
        next.push(take_u32(&mut data, "next")?);
    }
    let mut token_of = Vec::new();
    for _ in 0..n_states {
        token_of.push(take_u32(&mut data, "token_of")?);
    }

    let mut tokens = Vec::new();
    for _ in 0..n_tokens {
        let skip = take(&mut data, 1, "token")?[0] != 0;
        let len = take_u32(&mut data, "token")? as usize;
        let name = std::str::from_utf8(take(&mut data, len, "token name")?)
            .map_err(|e| TablesError::Invalid(format!("token name is not UTF-8: {e}")))?
            .to_owned();
        tokens.push(TokenInfo { name, skip });
    }
    if !data.is_empty() {
        return Err(TablesError::Invalid(format!(
            "{} trailing bytes",
            data.len()
        )));
    }

    let t = LexTables {
        byte_class,
        n_classes,
        n_states,
        start,
        next,
        token_of,
        tokens,
    };
    t.validate().map_err(TablesError::Invalid)?;
    Ok(t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::Limits,
        lexer::tables::{RuleSet, compile_rules},
    };

    fn sample() -> LexTables {
        let rules = RuleSet::new()
            .rule("NUM", "[0123456789]([0123456789])")
            .rule("PLUS", "+")
            .skip_rule("WS", " ( )");
        compile_rules(&rules, &Limits::default()).unwrap()
    }

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("relex-{}-{name}", std::process::id()))
    }

    #[test]
    fn json_file_reloads_identically() {
        let t = sample();
        let path = scratch("tables.json");
        save_tables_json(&path, &t).unwrap();
        let back = load_tables_json_bytes(&std::fs::read(&path).unwrap()).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(back, t);
    }

    #[test]
    fn bin_file_reloads_identically() {
        let t = sample();
        let path = scratch("tables.bin");
        save_tables_bin(&path, &t).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(&bytes[..8], BIN_MAGIC);
        assert_eq!(load_tables_bin_bytes(&bytes).unwrap(), t);

        assert!(matches!(
            load_tables_bin_bytes(&bytes[..bytes.len() - 1]),
            Err(TablesError::Truncated(_))
        ));
    }

    #[test]
    fn bad_magic_is_rejected() {
        assert!(matches!(
            load_tables_bin_bytes(b"NOTMAGIC\0\0\0\0"),
            Err(TablesError::BadMagic)
        ));
    }

    #[test]
    fn out_of_range_json_is_rejected() {
        let mut t = sample();
        t.next[0] = t.n_states + 5;
        let json = serde_json::to_vec(&TablesDisk::from(&t)).unwrap();
        assert!(matches!(
            load_tables_json_bytes(&json),
            Err(TablesError::Invalid(_))
        ));
    }
}
