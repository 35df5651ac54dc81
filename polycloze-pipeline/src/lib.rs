//! Difficulty Engine and Course Assembler: the task bodies that turn
//! decompressed Tatoeba archives into per-pair course databases, plus
//! [`build_graph`], which wires them into a [`polycloze_scheduler::Graph`]
//! for a requested set of L1/L2 language pairs.
//!
//! Grounded on `examples/original_source/python/scripts/build.py`'s
//! `build_dependency_graph`: decompress -> prepare -> per-language
//! tokenize -> (partition links, independent of tokenization) ->
//! per-pair difficulty -> per-pair course build.

pub mod assembler;
pub mod difficulty;
pub mod errors;
pub mod lru;
pub mod pairing;
pub mod paths;
pub mod publish;
pub mod skip_reason;
pub mod tasks;

use std::collections::BTreeSet;
use std::sync::Arc;

use polycloze_core::collab::{ArchiveSource, TarBz2Source, WordClassifier, RegistryWordClassifier, Tokenizer, WhitespaceTokenizer};
use polycloze_core::BuildConfig;
use polycloze_scheduler::{Graph, TaskId};

use paths::BuildPaths;
use tasks::{
    BuildCourseTask, ComputeDifficultyTask, DecompressLinksTask, DecompressSentencesTask, PartitionLinksTask,
    PrepareSentencesTask, TokenizeLanguageTask,
};

/// One requested course direction: vocabulary/example language L2,
/// taught to speakers of L1.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CoursePair {
    pub l1: String,
    pub l2: String,
}

impl CoursePair {
    pub fn new(l1: impl Into<String>, l2: impl Into<String>) -> Self {
        Self { l1: l1.into(), l2: l2.into() }
    }
}

/// Registers every task needed to build `pairs` into `graph`, using
/// the default collaborator implementations
/// ([`TarBz2Source`], [`WhitespaceTokenizer`], [`RegistryWordClassifier`]).
pub fn build_graph(graph: &mut Graph, config: &BuildConfig, pairs: &[CoursePair]) {
    build_graph_with_collaborators(
        graph,
        config,
        pairs,
        Arc::new(TarBz2Source),
        Arc::new(WhitespaceTokenizer),
        Arc::new(RegistryWordClassifier),
    )
}

/// Same as [`build_graph`], with collaborator implementations supplied
/// explicitly — the seam tests use to swap in fixtures instead of the
/// real archive/tokenizer/classifier.
pub fn build_graph_with_collaborators(
    graph: &mut Graph,
    config: &BuildConfig,
    pairs: &[CoursePair],
    archive_source: Arc<dyn ArchiveSource + Send + Sync>,
    tokenizer: Arc<dyn Tokenizer + Send + Sync>,
    classifier: Arc<dyn WordClassifier + Send + Sync>,
) {
    let paths = Arc::new(BuildPaths::new(config.effective_build_root()));
    let lru_cap = config.effective_lru_cap();
    let heap_k = config.effective_heap_k();
    let max_examples = config.effective_max_examples();

    graph.add(
        Box::new(DecompressSentencesTask { paths: paths.clone(), archive_source: archive_source.clone() }),
        vec![],
    );
    graph.add(
        Box::new(DecompressLinksTask { paths: paths.clone(), archive_source: archive_source.clone() }),
        vec![],
    );
    graph.add(
        Box::new(PrepareSentencesTask { paths: paths.clone() }),
        vec![TaskId::DecompressSentences],
    );
    graph.add(
        Box::new(PartitionLinksTask { paths: paths.clone(), lru_cap }),
        vec![TaskId::DecompressSentences, TaskId::DecompressLinks],
    );

    let mut languages: BTreeSet<String> = BTreeSet::new();
    for pair in pairs {
        languages.insert(pair.l1.clone());
        languages.insert(pair.l2.clone());
    }
    for code in &languages {
        graph.add(
            Box::new(TokenizeLanguageTask {
                code: code.clone(),
                paths: paths.clone(),
                tokenizer: tokenizer.clone(),
                classifier: classifier.clone(),
            }),
            vec![TaskId::PrepareSentences],
        );
    }

    for pair in pairs {
        if pair.l1 == pair.l2 {
            continue;
        }
        graph.add(
            Box::new(ComputeDifficultyTask { l1: pair.l1.clone(), l2: pair.l2.clone(), paths: paths.clone(), heap_k }),
            vec![TaskId::TokenizeLanguage(pair.l2.clone()), TaskId::PartitionLinks],
        );
        graph.add(
            Box::new(BuildCourseTask { l1: pair.l1.clone(), l2: pair.l2.clone(), paths: paths.clone(), max_examples }),
            vec![
                TaskId::ComputeDifficulty(pair.l1.clone(), pair.l2.clone()),
                TaskId::TokenizeLanguage(pair.l1.clone()),
                TaskId::PartitionLinks,
            ],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_every_pair_and_shared_prerequisite_tasks() {
        let mut graph = Graph::new(false);
        let config = BuildConfig::default();
        let pairs = vec![CoursePair::new("eng", "spa"), CoursePair::new("eng", "fra")];
        build_graph(&mut graph, &config, &pairs);
        // No panics and no duplicate-registration errors is the behavior
        // under test; `Graph` has no introspection API beyond `execute`,
        // so this mostly guards against the wiring code itself panicking
        // (e.g. on an out-of-range index or an unwrap on absent config).
        drop(graph);
    }

    #[test]
    fn same_language_pair_is_skipped() {
        let mut graph = Graph::new(false);
        let config = BuildConfig::default();
        let pairs = vec![CoursePair::new("eng", "eng")];
        build_graph(&mut graph, &config, &pairs);
    }
}
