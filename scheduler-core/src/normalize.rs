//! Canonicalization of caller-supplied participant pairs.
//!
//! A pair is well-formed for the model builder once it is ordered `(u, v)` with
//! `u < v`, both indices lie in `1..=participants`, and it appears only once in
//! its output list. Malformed pairs are dropped silently rather than rejected:
//! only the structural request bounds in [`crate::types::ScheduleRequest`] are
//! validated as `InvalidInput`.

use crate::types::Pair;
use std::collections::HashSet;

/// Canonicalizes a list of pairs against a participant count.
///
/// Drops self-pairs (`u == v`), drops pairs referencing a participant outside
/// `1..=participants`, and deduplicates by canonical form. The output
/// preserves the first-seen order of its input, which keeps downstream
/// reporting deterministic.
pub fn normalize_pairs(pairs: &[Pair], participants: u32) -> Vec<Pair> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for pair in pairs {
        let (u, v) = (pair.0, pair.1);
        if u == v {
            continue;
        }
        if u == 0 || v == 0 || u > participants || v > participants {
            continue;
        }
        let canonical = if u < v { (u, v) } else { (v, u) };
        if seen.insert(canonical) {
            out.push(Pair(canonical.0, canonical.1));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_self_pairs() {
        let out = normalize_pairs(&[Pair(2, 2)], 5);
        assert!(out.is_empty());
    }

    #[test]
    fn drops_out_of_range_pairs() {
        let out = normalize_pairs(&[Pair(1, 10), Pair(0, 2)], 5);
        assert!(out.is_empty());
    }

    #[test]
    fn orders_and_deduplicates() {
        let out = normalize_pairs(&[Pair(3, 1), Pair(1, 3), Pair(1, 3)], 5);
        assert_eq!(out, vec![Pair(1, 3)]);
    }

    #[test]
    fn preserves_first_seen_order() {
        let out = normalize_pairs(&[Pair(4, 5), Pair(1, 2)], 5);
        assert_eq!(out, vec![Pair(4, 5), Pair(1, 2)]);
    }
}
