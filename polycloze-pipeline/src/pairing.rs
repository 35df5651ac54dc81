//! Canonical ordering of a language pair.
//!
//! Links and translations between L1 and L2 are shared by both
//! directions of a pair, stored once under the lexicographically
//! smaller code. Every task that reads or writes a per-pair file goes
//! through here so the convention stays in one place.

use std::cmp::Ordering;

/// `(lo, hi)` with `lo < hi`.
pub fn canonical<'a>(l1: &'a str, l2: &'a str) -> (&'a str, &'a str) {
    match l1.cmp(l2) {
        Ordering::Less => (l1, l2),
        _ => (l2, l1),
    }
}

/// Whether L2 is the first (lexicographically smaller) column of the
/// canonical `{lo}-{hi}.csv` file for this pair.
pub fn l2_is_first_column(l1: &str, l2: &str) -> bool {
    l2 < l1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_orders_lexicographically() {
        assert_eq!(canonical("spa", "eng"), ("eng", "spa"));
        assert_eq!(canonical("eng", "spa"), ("eng", "spa"));
    }

    #[test]
    fn l2_first_column_matches_canonical_order() {
        assert!(l2_is_first_column("spa", "eng"));
        assert!(!l2_is_first_column("eng", "spa"));
    }
}
