//! `TokenizeLanguage(code)`: wraps the external tokenizer and word
//! classifier collaborators to turn one language's raw sentence
//! partition into the `sentences.csv`/`words.csv` artifacts the
//! Difficulty Engine and Course Assembler consume.
//!
//! Grounded on `examples/original_source/python/scripts/tokenizer.py`
//! (`process_language`: tokenize, count words, classify, write).

use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::sync::Arc;

use csv::WriterBuilder;
use polycloze_core::collab::{Tokenizer, WordClassifier};
use polycloze_core::types::{canonicalize, Word};
use polycloze_scheduler::{Task, TaskId};
use rustc_hash::FxHashMap;

use crate::errors::{PipelineError, PipelineResult};
use crate::paths::BuildPaths;
use crate::publish;

pub struct TokenizeLanguageTask {
    pub code: String,
    pub paths: Arc<BuildPaths>,
    pub tokenizer: Arc<dyn Tokenizer + Send + Sync>,
    pub classifier: Arc<dyn WordClassifier + Send + Sync>,
}

impl Task for TokenizeLanguageTask {
    fn id(&self) -> TaskId {
        TaskId::TokenizeLanguage(self.code.clone())
    }

    fn inputs(&self) -> Vec<PathBuf> {
        vec![self.paths.partitioned_sentences(&self.code)]
    }

    fn outputs(&self) -> Vec<PathBuf> {
        vec![
            self.paths.language_sentences_csv(&self.code),
            self.paths.language_words_csv(&self.code),
        ]
    }

    fn run(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        tokenize_language(&self.code, &self.paths, self.tokenizer.as_ref(), self.classifier.as_ref())?;
        Ok(())
    }
}

pub fn tokenize_language(
    code: &str,
    paths: &BuildPaths,
    tokenizer: &(dyn Tokenizer + Send + Sync),
    classifier: &(dyn WordClassifier + Send + Sync),
) -> PipelineResult<()> {
    let source = paths.partitioned_sentences(code);
    let file = fs::File::open(&source).map_err(|e| PipelineError::Read { path: source.clone(), source: e })?;
    let reader = BufReader::new(file);

    let tmp = tempfile::tempdir().map_err(|e| PipelineError::Write { path: source.clone(), source: e })?;
    let sentences_path = tmp.path().join("sentences.csv");
    let mut sentences_writer = WriterBuilder::new()
        .from_path(&sentences_path)
        .map_err(|e| PipelineError::Csv { path: sentences_path.clone(), source: e })?;
    sentences_writer
        .write_record(["tatoeba_id", "text", "tokens"])
        .map_err(|e| PipelineError::Csv { path: sentences_path.clone(), source: e })?;

    let mut frequencies: FxHashMap<String, i64> = FxHashMap::default();

    for line in reader.lines() {
        let line = line.map_err(|e| PipelineError::Read { path: source.clone(), source: e })?;
        let Some((id, text)) = line.split_once('\t') else {
            return Err(PipelineError::MalformedRow {
                path: source.clone(),
                detail: format!("expected id\\ttext, got {line:?}"),
            });
        };

        let tokens = tokenizer.tokenize(text);
        let token_strings: Vec<String> = tokens
            .iter()
            .flat_map(|t| {
                let mut v = vec![t.text.clone()];
                if t.whitespace_after {
                    v.push(" ".to_string());
                }
                v
            })
            .collect();

        // Whitespace markers reconstruct the original surface form but
        // are never vocabulary: they'd otherwise dominate the
        // frequency table and skew every real word's frequency_class.
        for token in &tokens {
            let canon = canonicalize(&token.text);
            if canon.is_empty() {
                continue;
            }
            *frequencies.entry(canon).or_insert(0) += 1;
        }

        let tokens_json = serde_json::to_string(&token_strings)
            .map_err(|e| PipelineError::TokensJson { path: sentences_path.clone(), source: e })?;
        sentences_writer
            .write_record([id, text, &tokens_json])
            .map_err(|e| PipelineError::Csv { path: sentences_path.clone(), source: e })?;
    }
    sentences_writer.flush().map_err(|e| PipelineError::Write { path: sentences_path.clone(), source: e })?;

    let max_frequency = frequencies.values().copied().max().unwrap_or(1);

    let words_path = tmp.path().join("words.csv");
    let mut words_writer = WriterBuilder::new()
        .from_path(&words_path)
        .map_err(|e| PipelineError::Csv { path: words_path.clone(), source: e })?;
    words_writer
        .write_record(["word", "frequency", "frequency_class"])
        .map_err(|e| PipelineError::Csv { path: words_path.clone(), source: e })?;

    let log_path = tmp.path().join("nonwords.txt");
    let mut log = fs::File::create(&log_path).map_err(|e| PipelineError::Write { path: log_path.clone(), source: e })?;

    let mut ordered: Vec<(String, i64)> = frequencies.into_iter().collect();
    ordered.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    for (word, frequency) in &ordered {
        if classifier.is_word(code, word) {
            let frequency_class = Word::frequency_class(*frequency, max_frequency);
            words_writer
                .write_record([word.as_str(), &frequency.to_string(), &frequency_class.to_string()])
                .map_err(|e| PipelineError::Csv { path: words_path.clone(), source: e })?;
        } else {
            writeln!(log, "{word}").map_err(|e| PipelineError::Write { path: log_path.clone(), source: e })?;
        }
    }
    words_writer.flush().map_err(|e| PipelineError::Write { path: words_path.clone(), source: e })?;

    publish::publish_file(&sentences_path, &paths.language_sentences_csv(code))
        .map_err(|e| PipelineError::Write { path: paths.language_sentences_csv(code), source: e })?;
    publish::publish_file(&words_path, &paths.language_words_csv(code))
        .map_err(|e| PipelineError::Write { path: paths.language_words_csv(code), source: e })?;
    publish::publish_file(&log_path, &paths.language_nonwords_log(code))
        .map_err(|e| PipelineError::Write { path: paths.language_nonwords_log(code), source: e })?;

    Ok(())
}
