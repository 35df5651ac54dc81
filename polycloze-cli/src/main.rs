//! Course builder CLI: `polycloze-build [-B] [l1] [l2]`.
//!
//! Wires the requested language pairs into a [`polycloze_scheduler::Graph`]
//! and runs it to completion. Everything interesting — scheduling,
//! difficulty scoring, course assembly — lives in
//! `polycloze-scheduler` and `polycloze-pipeline`; this binary only
//! parses arguments and reports the result.

mod args;

use std::process::ExitCode;

use polycloze_core::BuildConfig;
use polycloze_pipeline::CoursePair;
use polycloze_scheduler::Graph;

fn main() -> ExitCode {
    polycloze_core::tracing_setup::init();

    let raw_args: Vec<String> = std::env::args().skip(1).collect();
    let parsed = match args::parse(&raw_args) {
        Ok(parsed) => parsed,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let config = load_config(parsed.force_rebuild);

    let mut pairs = Vec::new();
    for l1 in &parsed.l1s {
        for l2 in &parsed.l2s {
            if l1 != l2 {
                pairs.push(CoursePair::new(l1.clone(), l2.clone()));
            }
        }
    }

    let mut graph = Graph::new(config.force_rebuild);
    polycloze_pipeline::build_graph(&mut graph, &config, &pairs);

    match graph.execute(config.effective_workers()) {
        Ok(summary) => {
            let ran = summary.ran().count();
            let skipped = summary.skipped().count();
            println!("built {ran} task(s), skipped {skipped} already-fresh task(s)");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "build failed");
            eprintln!("build failed: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Loads `polycloze.toml` from the current directory if present,
/// falling back to defaults; the CLI's one flag (`-B`) always wins
/// over whatever the file says.
fn load_config(force_rebuild: bool) -> BuildConfig {
    let mut config = match std::fs::read_to_string("polycloze.toml") {
        Ok(text) => match BuildConfig::from_toml_str(&text) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("ignoring invalid polycloze.toml: {err}");
                BuildConfig::default()
            }
        },
        Err(_) => BuildConfig::default(),
    };
    config.force_rebuild = config.force_rebuild || force_rebuild;
    config
}
