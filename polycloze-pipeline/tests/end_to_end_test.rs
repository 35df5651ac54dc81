//! End-to-end course build: raw Tatoeba-shaped TSVs in, a finished
//! course database out. Exercises every task in order the way the CLI
//! would, without going through the scheduler (that's
//! `polycloze-scheduler`'s own test suite) or a real `tar.bz2` archive
//! (that's `ArchiveSource`'s).

use std::fs;

use polycloze_core::collab::{RegistryWordClassifier, WhitespaceTokenizer};
use polycloze_pipeline::assembler::assemble_course;
use polycloze_pipeline::paths::BuildPaths;
use polycloze_pipeline::tasks::compute_difficulty::compute_difficulty;
use polycloze_pipeline::tasks::partition_links::partition_links;
use polycloze_pipeline::tasks::prepare_sentences::prepare_sentences;
use polycloze_pipeline::tasks::tokenize::tokenize_language;
use rusqlite::Connection;

fn seed(paths: &BuildPaths) {
    fs::create_dir_all(paths.tatoeba_dir()).unwrap();
    // No trailing punctuation: `WhitespaceTokenizer` doesn't split
    // punctuation off a word, so a glued-on period would make every
    // token in the sentence with one look like an out-of-vocabulary
    // word to the word classifier.
    fs::write(
        paths.raw_sentences_csv(),
        "1\teng\tThe cat sat\n\
         2\tspa\tEl gato se sento\n\
         3\teng\tHello world\n\
         4\tspa\tHola mundo\n\
         5\teng\tUnrelated sentence\n",
    )
    .unwrap();
    fs::write(
        paths.raw_links_csv(),
        "1\t2\n\
         2\t1\n\
         3\t4\n\
         4\t3\n",
    )
    .unwrap();
}

fn run_build(paths: &BuildPaths) {
    prepare_sentences(paths).unwrap();
    tokenize_language("eng", paths, &WhitespaceTokenizer, &RegistryWordClassifier).unwrap();
    tokenize_language("spa", paths, &WhitespaceTokenizer, &RegistryWordClassifier).unwrap();
    partition_links(paths, 100).unwrap();
    compute_difficulty("eng", "spa", paths, 3).unwrap();
    assemble_course("eng", "spa", paths, 30).unwrap();
}

#[test]
fn builds_a_course_database_with_no_orphans() {
    let dir = tempfile::tempdir().unwrap();
    let paths = BuildPaths::new(dir.path());
    seed(&paths);

    run_build(&paths);

    let conn = Connection::open(paths.course_db("eng", "spa")).unwrap();

    let languages: i64 = conn.query_row("SELECT COUNT(*) FROM language", [], |r| r.get(0)).unwrap();
    assert_eq!(languages, 2);

    let sentence_count: i64 = conn.query_row("SELECT COUNT(*) FROM sentence", [], |r| r.get(0)).unwrap();
    assert!(sentence_count >= 1, "at least the translated spa sentence should survive");

    // Every contains edge must reference a surviving sentence and word.
    let orphan_contains: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM contains
             WHERE sentence NOT IN (SELECT id FROM sentence)
                OR word NOT IN (SELECT id FROM word)",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(orphan_contains, 0);

    // contains-tightness: sentence.frequency_class <= word.frequency_class for every edge.
    let violations: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM contains c
             JOIN sentence s ON s.id = c.sentence
             JOIN word w ON w.id = c.word
             WHERE s.frequency_class > w.frequency_class",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(violations, 0);

    // Every translates.source must resolve against sentence.tatoeba_id,
    // every translates.target against translation.tatoeba_id.
    let dangling_translates: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM translates
             WHERE source NOT IN (SELECT tatoeba_id FROM sentence)
                OR target NOT IN (SELECT tatoeba_id FROM translation)",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(dangling_translates, 0);
}

#[test]
fn unrelated_untranslated_sentence_never_reaches_the_course() {
    let dir = tempfile::tempdir().unwrap();
    let paths = BuildPaths::new(dir.path());
    seed(&paths);

    run_build(&paths);

    let conn = Connection::open(paths.course_db("eng", "spa")).unwrap();
    let text: String = conn
        .query_row(
            "SELECT COUNT(*) FROM translation WHERE text = 'Unrelated sentence'",
            [],
            |r| r.get::<_, i64>(0).map(|n| n.to_string()),
        )
        .unwrap();
    assert_eq!(text, "0");
}

#[test]
fn skipped_csv_records_the_untranslated_sentence() {
    let dir = tempfile::tempdir().unwrap();
    let paths = BuildPaths::new(dir.path());
    seed(&paths);

    prepare_sentences(&paths).unwrap();
    tokenize_language("eng", &paths, &WhitespaceTokenizer, &RegistryWordClassifier).unwrap();
    tokenize_language("spa", &paths, &WhitespaceTokenizer, &RegistryWordClassifier).unwrap();
    partition_links(&paths, 100).unwrap();
    compute_difficulty("eng", "spa", &paths, 3).unwrap();

    let skipped = fs::read_to_string(paths.difficulty_skipped_csv("eng", "spa")).unwrap();
    assert!(skipped.contains("not translated"));
}
