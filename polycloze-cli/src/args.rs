//! Plain positional argument parsing.
//!
//! Grounded on `examples/original_source/python/scripts/build.py`'s
//! `parse_args`/`parse_languages`: two positional language-list
//! arguments (`l1`, `l2`), each either `_` (every registered language)
//! or a comma-separated list of codes, plus a `-B` flag to force a
//! full rebuild. No subcommands, no flag combinators — the spec treats
//! argument parsing itself as out of scope, so this stays intentionally
//! plain rather than reaching for a parsing crate the teacher never
//! needed for anything this small.

use polycloze_core::registry;

#[derive(Debug)]
pub struct Args {
    pub l1s: Vec<String>,
    pub l2s: Vec<String>,
    pub force_rebuild: bool,
}

#[derive(Debug)]
pub enum ArgsError {
    UnknownLanguage(String),
    Usage(String),
}

impl std::fmt::Display for ArgsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownLanguage(code) => write!(f, "unknown language: {code}"),
            Self::Usage(message) => write!(f, "{message}"),
        }
    }
}

fn parse_languages(spec: &str) -> Result<Vec<String>, ArgsError> {
    if spec == "_" {
        return Ok(registry::all().into_iter().map(|l| l.code.to_string()).collect());
    }
    spec.split(',')
        .map(|code| {
            registry::find(code)
                .map(|l| l.code.to_string())
                .ok_or_else(|| ArgsError::UnknownLanguage(code.to_string()))
        })
        .collect()
}

/// Parses `args` (excluding argv[0]): `[-B] [l1] [l2]`, both
/// positionals defaulting to `_` (every registered language).
pub fn parse(args: &[String]) -> Result<Args, ArgsError> {
    let mut force_rebuild = false;
    let mut positionals = Vec::new();

    for arg in args {
        match arg.as_str() {
            "-B" => force_rebuild = true,
            other if other.starts_with('-') => {
                return Err(ArgsError::Usage(format!("unrecognized flag: {other}")))
            }
            other => positionals.push(other.to_string()),
        }
    }

    if positionals.len() > 2 {
        return Err(ArgsError::Usage("usage: polycloze-build [-B] [l1] [l2]".to_string()));
    }

    let l1 = positionals.first().map(String::as_str).unwrap_or("_");
    let l2 = positionals.get(1).map(String::as_str).unwrap_or("_");

    Ok(Args { l1s: parse_languages(l1)?, l2s: parse_languages(l2)?, force_rebuild })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_every_language_in_both_slots() {
        let args = parse(&[]).unwrap();
        assert_eq!(args.l1s.len(), registry::all().len());
        assert_eq!(args.l2s.len(), registry::all().len());
        assert!(!args.force_rebuild);
    }

    #[test]
    fn parses_comma_separated_codes() {
        let args = parse(&["eng".to_string(), "fra,spa".to_string()]).unwrap();
        assert_eq!(args.l1s, vec!["eng"]);
        assert_eq!(args.l2s, vec!["fra", "spa"]);
    }

    #[test]
    fn rejects_unknown_language() {
        let err = parse(&["xyz".to_string()]).unwrap_err();
        assert!(matches!(err, ArgsError::UnknownLanguage(code) if code == "xyz"));
    }

    #[test]
    fn recognizes_force_rebuild_flag() {
        let args = parse(&["-B".to_string(), "eng".to_string()]).unwrap();
        assert!(args.force_rebuild);
        assert_eq!(args.l1s, vec!["eng"]);
    }

    #[test]
    fn rejects_too_many_positionals() {
        let err = parse(&["eng".to_string(), "spa".to_string(), "fra".to_string()]).unwrap_err();
        assert!(matches!(err, ArgsError::Usage(_)));
    }
}
