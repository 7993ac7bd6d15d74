//! Display titles derived from ROM file names.
//!
//! Dumps are usually named after the No-Intro / Redump conventions, e.g.
//! `Lunar_-_Eternal_Blue_(USA)_Track01.cue`. The normalizer strips release
//! tags, track suffixes and separators to get something fit for a game list.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use tracing::warn;

/// Bracketed or parenthesized tags, with their contents.
const TAG_PATTERN: &str = r"[\[\(].*?[\]\)]";
/// `Track01`, `Track 02`, `track7`.
const TRACK_PATTERN: &str = r"(?i)Track\s?\d+";
const WHITESPACE_PATTERN: &str = r"\s+";

/// Case-sensitive fixups applied after title casing, longest match first so
/// ` Iii` is never half-rewritten by the ` Ii` rule.
const CORRECTIONS: &[(&str, &str)] = &[
    (" Iii", " III"),
    (" Ii", " II"),
    (" Iv", " IV"),
    (" Usa", " USA"),
];

static TAG_RE: OnceLock<Option<Regex>> = OnceLock::new();
static TRACK_RE: OnceLock<Option<Regex>> = OnceLock::new();
static WHITESPACE_RE: OnceLock<Option<Regex>> = OnceLock::new();

fn compiled(cell: &'static OnceLock<Option<Regex>>, pattern: &str) -> Option<&'static Regex> {
    cell.get_or_init(|| match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            warn!("Title pattern {:?} does not compile, step skipped: {}", pattern, e);
            None
        }
    })
    .as_ref()
}

fn replace_all(text: String, regex: Option<&Regex>, with: &str) -> String {
    match regex {
        Some(re) => re.replace_all(&text, with).into_owned(),
        None => text,
    }
}

/// Converts a raw ROM file name into a display title.
///
/// Deterministic and infallible; an empty string is a valid result.
///
/// ```
/// use megadeck_core::normalize_title;
///
/// assert_eq!(normalize_title("Lunar_-_Eternal_Blue_(USA).cue"), "Lunar Eternal Blue");
/// assert_eq!(normalize_title("Policenauts_[T-En]_Track_01.bin"), "Policenauts");
/// ```
pub fn normalize_title(file_name: &str) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);

    let text = stem.replace(['_', '-'], " ");
    let text = replace_all(text, compiled(&TAG_RE, TAG_PATTERN), "");
    let text = replace_all(text, compiled(&TRACK_RE, TRACK_PATTERN), "");
    let text = replace_all(text, compiled(&WHITESPACE_RE, WHITESPACE_PATTERN), " ");

    let mut title = title_case(text.trim());
    for (from, to) in CORRECTIONS {
        title = title.replace(from, to);
    }
    title
}

/// Invariant title case: the first letter of every word goes upper case and
/// the remaining letters lower case.
///
/// Any character that is not a letter ends a word, except an apostrophe
/// inside a word (`Don't`).
fn title_case(text: &str) -> String {
    let mut title = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                title.extend(c.to_lowercase());
            } else {
                title.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            title.push(c);
            in_word = in_word && c == '\'';
        }
    }
    title
}
