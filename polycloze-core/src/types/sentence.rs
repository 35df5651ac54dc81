//! A single sentence from the Tatoeba corpus, tagged with its
//! tokenization.

use serde::{Deserialize, Serialize};

/// A sentence pulled from the Tatoeba corpus: its id, raw text,
/// tokenization, and language code.
///
/// `tokens` is retained verbatim (JSON-encoded on disk) so sentences
/// can be re-tokenized later without re-running the external
/// tokenizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    pub tatoeba_id: i64,
    pub text: String,
    pub tokens: Vec<String>,
    pub language: String,
}

impl Sentence {
    pub fn new(tatoeba_id: i64, text: impl Into<String>, tokens: Vec<String>, language: impl Into<String>) -> Self {
        Self {
            tatoeba_id,
            text: text.into(),
            tokens,
            language: language.into(),
        }
    }

    /// Serialize `tokens` as the JSON array stored in `sentences.csv`
    /// and in the `sentence.tokens` database column.
    pub fn tokens_json(&self) -> String {
        serde_json::to_string(&self.tokens).expect("token list is always valid JSON")
    }
}
