//! Translation links between sentences.

/// An unordered pair of sentence IDs asserting mutual translation,
/// stored as an ordered `(source, target)` pair once canonicalised:
/// `source` belongs to the lexicographically smaller language code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Link {
    pub source: i64,
    pub target: i64,
}

impl Link {
    pub fn new(source: i64, target: i64) -> Self {
        Self { source, target }
    }

    /// Canonicalise a raw `(a, b)` pair given the language code each
    /// side belongs to, returning `None` if `code_a == code_b` (links
    /// between sentences of the same language are not meaningful
    /// translation pairs and are dropped by Phase A).
    pub fn canonicalize(a: i64, code_a: &str, b: i64, code_b: &str) -> Option<Self> {
        if code_a == code_b {
            return None;
        }
        if code_a < code_b {
            Some(Self::new(a, b))
        } else {
            Some(Self::new(b, a))
        }
    }
}
