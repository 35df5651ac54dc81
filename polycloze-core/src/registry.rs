//! Built-in language registry.
//!
//! Backs the default `WordClassifier` and supplies the `name`/`bcp47`
//! columns of the `language` table. Sixteen entries, the same set the
//! Tatoeba-derived course builder this workspace grew out of shipped
//! with: a practical baseline, not a claim of linguistic completeness.

use rustc_hash::FxHashSet;

use crate::types::Language;

const APOSTROPHE_HYPHEN: [char; 2] = ['\'', '-'];

fn set(chars: &str) -> FxHashSet<char> {
    chars.chars().collect()
}

fn latin_lower() -> String {
    ('a'..='z').collect()
}

fn lang(code: &'static str, name: &'static str, bcp47: &'static str, extra: &str) -> Language {
    let mut alphabet = latin_lower();
    alphabet.push_str(extra);
    Language {
        code,
        name,
        bcp47,
        alphabet: set(&alphabet),
        symbols: APOSTROPHE_HYPHEN.into_iter().collect(),
    }
}

/// All sixteen built-in registry entries, in no particular order.
pub fn all() -> Vec<Language> {
    vec![
        lang("dan", "Danish", "da", "æøå"),
        lang("deu", "German", "de", "äöüß"),
        lang("eng", "English", "en", ""),
        lang("fin", "Finnish", "fi", "äö"),
        lang("fra", "French", "fr", "àâæçéèêëîïôœùûüÿ"),
        lang("hrv", "Croatian", "hr", "čćđšž"),
        lang("ita", "Italian", "it", "àèéìíîòóùú"),
        lang("lit", "Lithuanian", "lt", "ąčęėįšųūž"),
        lang("nld", "Dutch", "nl", "éèëï"),
        lang("nob", "Norwegian Bokmål", "nb", "æøå"),
        lang("pol", "Polish", "pl", "ąćęłńóśźż"),
        lang("por", "Portuguese", "pt", "áâãàçéêíóôõú"),
        lang("ron", "Romanian", "ro", "ăâîșț"),
        lang("spa", "Spanish", "es", "áéíñóúü"),
        lang("swe", "Swedish", "sv", "åäö"),
        lang("tgl", "Tagalog", "tl", "ñ"),
    ]
}

/// Look up a registry entry by its ISO 639-3 code (e.g. `"eng"`).
pub fn find(code: &str) -> Option<Language> {
    all().into_iter().find(|l| l.code == code)
}
