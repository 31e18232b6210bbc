//! Transliteration of free text into slug fragments.
//!
//! Cyrillic (plus a handful of Ukrainian, Turkic and Western-European accented
//! letters) is mapped onto ASCII; punctuation, whitespace, quotes and dashes are
//! mapped onto one of two separators:
//!
//! - `_` separates words (spaces, most punctuation, quotes),
//! - `-` joins words (hyphens and dashes).
//!
//! Runs of either separator are collapsed and both are trimmed from the ends.
//! Characters found in neither table are kept, lowercased.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Word separator.
pub const SEPARATOR: char = '_';
/// Word joiner.
pub const JOINER: char = '-';

static LETTERS: LazyLock<HashMap<char, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        // Russian
        ('а', "a"),
        ('б', "b"),
        ('в', "v"),
        ('г', "g"),
        ('д', "d"),
        ('е', "e"),
        ('ё', "e"),
        ('ж', "zh"),
        ('з', "z"),
        ('и', "i"),
        ('й', "y"),
        ('к', "k"),
        ('л', "l"),
        ('м', "m"),
        ('н', "n"),
        ('о', "o"),
        ('п', "p"),
        ('р', "r"),
        ('с', "s"),
        ('т', "t"),
        ('у', "u"),
        ('ф', "f"),
        ('х', "kh"),
        ('ц', "ts"),
        ('ч', "ch"),
        ('ш', "sh"),
        ('щ', "shch"),
        ('ъ', ""),
        ('ы', "y"),
        ('ь', ""),
        ('э', "e"),
        ('ю', "yu"),
        ('я', "ya"),
        // Ukrainian
        ('ґ', "g"),
        ('є', "ie"),
        ('ї', "i"),
        ('і', "i"),
        // Turkic
        ('ç', "c"),
        ('ş', "s"),
        ('ğ', "g"),
        ('ı', "i"),
        // German
        ('ä', "ae"),
        ('ö', "oe"),
        ('ü', "ue"),
        ('ß', "ss"),
        // French
        ('à', "a"),
        ('â', "a"),
        ('è', "e"),
        ('é', "e"),
        ('ê', "e"),
        ('ô', "o"),
        ('û', "u"),
        ('ĭ', "y"),
    ])
});

/// Punctuation, whitespace and quote variants that become a separator.
static SEPARATORS: LazyLock<HashMap<char, char>> = LazyLock::new(|| {
    let words = [
        ' ', '\t', '\n', '\r', '\u{00A0}', '?', '<', '>', '~', '@', '"', '\'', '`', ':', ';', '#', '$', '%', '^', '&',
        '*', '(', ')', '[', ']', '{', '}', '=', '\\', '|', '/', '.', ',', '!', '+', '«', '»', '“', '”', '„', '‘', '’',
        '‚', '‹', '›', '…', '№',
    ];
    let joins = ['-', '‐', '‑', '‒', '−', '–', '—'];
    words.into_iter().map(|c| (c, SEPARATOR)).chain(joins.into_iter().map(|c| (c, JOINER))).collect()
});

static SEPARATOR_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new("_{2,}").unwrap());
static JOINER_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new("-{2,}").unwrap());

/// Transliterates arbitrary text into a lowercase slug fragment.
///
/// Total and deterministic: every input produces an output (possibly empty).
///
/// ```
/// use bookland_catalog::transliterate;
///
/// assert_eq!(transliterate("Пушкин Александр"), "pushkin_aleksandr");
/// assert_eq!(transliterate("Don't Panic!"), "don_t_panic");
/// assert_eq!(transliterate("Пикник на обочине — 1972"), "piknik_na_obochine_-_1972");
/// ```
pub fn transliterate(text: impl AsRef<str>) -> String {
    let mut mapped = String::with_capacity(text.as_ref().len());
    for c in text.as_ref().chars() {
        // `to_lowercase` may expand to several characters (e.g. `İ`).
        for lower in c.to_lowercase() {
            if let Some(latin) = LETTERS.get(&lower) {
                mapped.push_str(latin);
            } else if let Some(separator) = SEPARATORS.get(&lower) {
                mapped.push(*separator);
            } else {
                mapped.push(lower);
            }
        }
    }
    let collapsed = SEPARATOR_RUNS.replace_all(&mapped, "_");
    let collapsed = JOINER_RUNS.replace_all(&collapsed, "-");
    collapsed.trim_matches([SEPARATOR, JOINER]).to_lowercase()
}

/// Whether `s` only contains characters allowed in a slug (`[a-z0-9_-]`).
pub fn is_slug_safe(s: &str) -> bool {
    s.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == SEPARATOR || c == JOINER)
}

/// Folds word separators into joiners (`pushkin_aleksandr` → `pushkin-aleksandr`).
pub(crate) fn hyphenate(fragment: &str) -> String {
    let joined = fragment.replace(SEPARATOR, "-");
    JOINER_RUNS.replace_all(&joined, "-").trim_matches(JOINER).to_string()
}
