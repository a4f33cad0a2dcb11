// src/automaton/parser.rs
// Recursive-descent pattern parser that grows the NFA while it reads.
//
//   expression := group*
//   group      := '(' expression ')' | atom
//   atom       := byte | '[' byte+ ']'
//
// A parenthesized group is always a zero-or-more repetition anchored at the
// state it started from. Inside brackets every byte except ']' is literal.

use super::{
    error::{Error, ParseError},
    graph::{Nfa, StateId},
};

struct Cursor<'a> {
    input: &'a [u8],
    pos: usize,
}

impl Cursor<'_> {
    #[inline]
    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    #[inline]
    fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        Some(b)
    }
}

struct Parser<'a, 'n> {
    nfa: &'n mut Nfa,
    cursor: Cursor<'a>,
    entry: StateId,
    max_depth: usize,
}

/// Parses `pattern` starting at `start` and returns the state reached after the
/// last atom. The whole pattern must be consumed.
///
/// Every state the pattern touches is reachable from `start`, and loops are
/// folded relative to it, so `start` should be a state no other pattern uses.
pub fn parse_pattern(
    nfa: &mut Nfa,
    pattern: &str,
    start: StateId,
    max_depth: usize,
) -> Result<StateId, Error> {
    let mut p = Parser {
        nfa,
        cursor: Cursor {
            input: pattern.as_bytes(),
            pos: 0,
        },
        entry: start,
        max_depth,
    };
    let exit = p.expression(start, 0)?;
    if p.cursor.peek() == Some(b')') {
        return Err(ParseError::UnmatchedClose { at: p.cursor.pos }.into());
    }
    Ok(exit)
}

impl Parser<'_, '_> {
    fn expression(&mut self, start: StateId, depth: usize) -> Result<StateId, Error> {
        let mut current = start;
        loop {
            match self.cursor.peek() {
                None | Some(b')') => return Ok(current),
                Some(b'(') => current = self.group(current, depth)?,
                Some(b) => current = self.atom(current, b)?,
            }
        }
    }

    fn group(&mut self, start: StateId, depth: usize) -> Result<StateId, Error> {
        let open = self.cursor.pos;
        if depth >= self.max_depth {
            return Err(ParseError::NestingTooDeep {
                at: open,
                max: self.max_depth,
            }
            .into());
        }
        self.cursor.bump();

        let exit = self.expression(start, depth + 1)?;
        if self.cursor.bump() != Some(b')') {
            return Err(ParseError::UnterminatedGroup { open }.into());
        }

        // Fold the loop: whatever the group reached becomes its entry again.
        self.nfa.merge_states(self.entry, exit, start)?;
        Ok(start)
    }

    /// `first` is the byte under the cursor, already known to be present.
    fn atom(&mut self, start: StateId, first: u8) -> Result<StateId, Error> {
        let at = self.cursor.pos;
        self.cursor.bump();
        let bytes = if first == b'[' {
            self.class(at)?
        } else {
            ascii(first, at)?;
            vec![first]
        };

        let next = self.nfa.create_state()?;
        for b in bytes {
            self.nfa.add_transition(start, b, next)?;
        }
        Ok(next)
    }

    /// Reads the members of a bracket expression whose '[' sits at `open`.
    fn class(&mut self, open: usize) -> Result<Vec<u8>, ParseError> {
        let mut members = Vec::new();
        loop {
            let at = self.cursor.pos;
            match self.cursor.bump() {
                None => return Err(ParseError::UnterminatedClass { open }),
                Some(b']') => break,
                Some(b) => {
                    ascii(b, at)?;
                    members.push(b);
                }
            }
        }
        if members.is_empty() {
            return Err(ParseError::EmptyClass { open });
        }
        Ok(members)
    }
}

#[inline]
fn ascii(byte: u8, at: usize) -> Result<(), ParseError> {
    if byte.is_ascii() {
        Ok(())
    } else {
        Err(ParseError::NonAscii { at, byte })
    }
}
