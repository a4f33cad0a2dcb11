// src/dev/generator.rs
// Random patterns and inputs shared by the differential tests and fuzz_dfa.

use rand::{Rng, seq::IndexedRandom};

/// A syntactically valid pattern over `alphabet`: atoms, bracket classes and
/// groups nested at most `max_depth` deep. `alphabet` must not contain any of
/// `()[]`.
pub fn gen_pattern<R: Rng + ?Sized>(
    rng: &mut R,
    alphabet: &[u8],
    max_items: usize,
    max_depth: usize,
) -> String {
    let mut out = String::new();
    push_expression(rng, alphabet, max_items, max_depth, &mut out);
    out
}

fn push_expression<R: Rng + ?Sized>(
    rng: &mut R,
    alphabet: &[u8],
    max_items: usize,
    depth_left: usize,
    out: &mut String,
) {
    let items = rng.random_range(0..=max_items);
    for _ in 0..items {
        match rng.random_range(0..6) {
            0 if depth_left > 0 => {
                out.push('(');
                let inner = max_items.saturating_sub(1).max(1);
                push_expression(rng, alphabet, inner, depth_left - 1, out);
                out.push(')');
            }
            1 => {
                out.push('[');
                let members = rng.random_range(1..=alphabet.len().min(4));
                for _ in 0..members {
                    if let Some(&b) = alphabet.choose(rng) {
                        out.push(b as char);
                    }
                }
                out.push(']');
            }
            _ => {
                if let Some(&b) = alphabet.choose(rng) {
                    out.push(b as char);
                }
            }
        }
    }
}

pub fn gen_input<R: Rng + ?Sized>(rng: &mut R, alphabet: &[u8], max_len: usize) -> Vec<u8> {
    let len = rng.random_range(0..=max_len);
    (0..len)
        .filter_map(|_| alphabet.choose(rng).copied())
        .collect()
}

/// Every string over `alphabet` of length at most `max_len`, shortest first.
pub fn all_inputs(alphabet: &[u8], max_len: usize) -> Vec<Vec<u8>> {
    let mut out = vec![Vec::new()];
    let mut frontier = vec![Vec::new()];
    for _ in 0..max_len {
        let mut next = Vec::with_capacity(frontier.len() * alphabet.len());
        for prefix in &frontier {
            for &b in alphabet {
                let mut s: Vec<u8> = prefix.clone();
                s.push(b);
                next.push(s);
            }
        }
        out.extend(next.iter().cloned());
        frontier = next;
    }
    out
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::NfaBuilder;

    #[test]
    fn generated_patterns_parse() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let p = gen_pattern(&mut rng, b"abc", 4, 3);
            let mut b = NfaBuilder::new().unwrap();
            assert!(b.compile_pattern(&p).is_ok(), "pattern {p:?}");
        }
    }

    #[test]
    fn all_inputs_counts() {
        assert_eq!(all_inputs(b"ab", 0).len(), 1);
        assert_eq!(all_inputs(b"ab", 3).len(), 1 + 2 + 4 + 8);
    }
}
