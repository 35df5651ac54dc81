//! The difficulty-propagation algorithm: word/sentence difficulty via
//! a two-phase scan with a per-word bounded top-K of easiest example
//! sentences.
//!
//! This module is pure — no filesystem or database access — so the
//! algorithm can be unit-tested directly against S1–S5 from the
//! distilled spec without standing up SQLite.

use rustc_hash::FxHashMap;

use polycloze_core::types::canonicalize;

/// Characters numeric tokens may contain besides digits: time, money,
/// percentages, game scores (`3-1`), ordinal markers.
const NUMERIC_CHARS: &str = "-.,%:x+\u{00ba}\u{00aa}\u{20ac}$\u{20b1}\u{00a5}\u{00a3}";

/// A token is numeric if every character is a digit or one of
/// [`NUMERIC_CHARS`]. The empty string is not numeric.
pub fn is_numeric_token(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_digit() || NUMERIC_CHARS.contains(c))
}

/// Per-word running state while scanning L2 sentences: the initial
/// frequency-class guess, and a bounded ascending list of the easiest
/// example-sentence difficulties seen so far.
#[derive(Debug, Clone)]
pub struct WordEntry {
    pub frequency_class: i32,
    examples: Vec<i32>,
    heap_k: usize,
}

impl WordEntry {
    pub fn new(frequency_class: i32, heap_k: usize) -> Self {
        Self { frequency_class, examples: Vec::with_capacity(heap_k + 1), heap_k }
    }

    /// Push a new example-sentence difficulty, keeping only the
    /// `heap_k` smallest values.
    pub fn add_example(&mut self, difficulty: i32) {
        let pos = self.examples.partition_point(|&d| d < difficulty);
        self.examples.insert(pos, difficulty);
        self.examples.truncate(self.heap_k);
    }

    /// Final word difficulty: the largest of the retained (smallest-K)
    /// example difficulties, or the frequency-class guess if the word
    /// never appeared in a surviving sentence.
    pub fn difficulty(&self) -> i32 {
        match self.examples.last() {
            Some(&d) => d,
            None => self.frequency_class,
        }
    }
}

/// Map of canonicalised surface -> running difficulty state, built
/// from a language's `words.csv` before the sentence scan begins.
pub type WordTable = FxHashMap<String, WordEntry>;

pub fn word_table(entries: impl IntoIterator<Item = (String, i32)>, heap_k: usize) -> WordTable {
    entries.into_iter().map(|(surface, fc)| (surface, WordEntry::new(fc, heap_k))).collect()
}

/// Scans one sentence's tokens against `words`, returning the
/// sentence's difficulty, or `None` if it contains an out-of-vocabulary
/// token (length > 1, non-numeric, absent from `words`).
///
/// On success, pushes the resulting difficulty into the bounded heap
/// of every known word the sentence contains.
pub fn score_sentence(tokens: &[String], words: &mut WordTable) -> Option<i32> {
    let mut difficulty = -1;
    let mut known: Vec<String> = Vec::with_capacity(tokens.len());

    for token in tokens {
        let canon = canonicalize(token);
        match words.get(&canon) {
            Some(entry) => {
                difficulty = difficulty.max(entry.frequency_class);
                known.push(canon);
            }
            None => {
                if canon.chars().count() > 1 && !is_numeric_token(&canon) {
                    return None;
                }
            }
        }
    }

    for surface in &known {
        if let Some(entry) = words.get_mut(surface) {
            entry.add_example(difficulty);
        }
    }

    Some(difficulty)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn add_example_keeps_at_most_heap_k_entries_sorted_ascending(
            heap_k in 1usize..8,
            values in proptest::collection::vec(-1000i32..1000, 0..50),
        ) {
            let mut entry = WordEntry::new(0, heap_k);
            for v in &values {
                entry.add_example(*v);
            }
            prop_assert!(entry.examples.len() <= heap_k);
            prop_assert!(entry.examples.windows(2).all(|w| w[0] <= w[1]));
            if !values.is_empty() {
                let mut sorted = values.clone();
                sorted.sort();
                prop_assert_eq!(&entry.examples[..], &sorted[..entry.examples.len()]);
            }
        }
    }
}
