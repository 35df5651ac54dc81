//! Tokenization collaborator.

/// One token of a tokenized sentence. `whitespace_after` records
/// whether the tokenizer saw whitespace immediately following this
/// token in the source text, so whitespace can be treated as a
/// distinct token when the caller needs it (e.g. reconstructing the
/// original surface form).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub whitespace_after: bool,
}

pub trait Tokenizer {
    fn tokenize(&self, text: &str) -> Vec<Token>;
}

/// Splits on whitespace boundaries. Real per-language tokenization
/// (compound splitting, clitic handling, script-specific segmentation)
/// is a collaborator concern, not this crate's.
#[derive(Debug, Default, Clone, Copy)]
pub struct WhitespaceTokenizer;

impl Tokenizer for WhitespaceTokenizer {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut chars = text.char_indices().peekable();
        let mut start = None;

        while let Some((idx, c)) = chars.next() {
            if c.is_whitespace() {
                if let Some(s) = start.take() {
                    tokens.push(Token {
                        text: text[s..idx].to_string(),
                        whitespace_after: true,
                    });
                } else if let Some(last) = tokens.last_mut() {
                    last.whitespace_after = true;
                }
            } else if start.is_none() {
                start = Some(idx);
            }
        }
        if let Some(s) = start {
            tokens.push(Token {
                text: text[s..].to_string(),
                whitespace_after: false,
            });
        }
        tokens
    }
}
