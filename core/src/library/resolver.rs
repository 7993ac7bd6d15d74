//! Picking one library entry from a title typed on the command line
//!
//! A title as printed by `megadeck list` always wins. Otherwise the query
//! may differ in case or be cut short, as long as exactly one game is left.
//! When nothing matches, titles a few keystrokes away are offered instead.
//!
//! Titles are not unique across platforms (the same game on Saturn and
//! PlayStation normalizes to one title), so only the verbatim match may pick
//! among duplicates.

use megadeck_shared::GameRecord;

/// Suggestions further away than this are not offered.
const DISTANCE_THRESHOLD: usize = 3;
const MAX_SUGGESTIONS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ResolutionError {
    pub message: String,
    /// Near misses, or the candidates of an ambiguous query
    pub suggestion: Option<Vec<String>>,
}

/// Matches `query` against the keys of `items`.
///
/// `get_key` yields each item's key and `item_kind` is the noun used in
/// error messages ("Game"). An ambiguous query reports every candidate in
/// [`ResolutionError::suggestion`].
pub fn resolve_by<'a, T, F>(
    query: &str,
    items: &'a [T],
    get_key: F,
    item_kind: &str,
) -> Result<&'a T, ResolutionError>
where
    F: Fn(&T) -> &str,
{
    let query = query.trim();
    if query.is_empty() {
        return Err(ResolutionError {
            message: format!("Empty {} name", item_kind),
            suggestion: None,
        });
    }

    // Verbatim key
    if let Some(item) = items.iter().find(|item| get_key(item) == query) {
        return Ok(item);
    }

    let lower_query = query.to_lowercase();

    let exact: Vec<&T> = items
        .iter()
        .filter(|item| get_key(item).to_lowercase() == lower_query)
        .collect();
    if exact.len() == 1 {
        return Ok(exact[0]);
    }

    let prefix_matches: Vec<&T> = items
        .iter()
        .filter(|item| get_key(item).to_lowercase().starts_with(&lower_query))
        .collect();

    match prefix_matches.len() {
        0 => {
            let suggestions = find_similar(query, items, &get_key);
            Err(ResolutionError {
                message: format!("{} '{}' not found", item_kind, query),
                suggestion: (!suggestions.is_empty()).then_some(suggestions),
            })
        }
        1 => Ok(prefix_matches[0]),
        _ => {
            let candidates: Vec<String> = prefix_matches
                .iter()
                .map(|item| get_key(item).to_string())
                .collect();
            Err(ResolutionError {
                message: format!("Ambiguous {} '{}' matches multiple items", item_kind, query),
                suggestion: Some(candidates),
            })
        }
    }
}

/// Resolves a game by its display title.
pub fn resolve_title<'a>(
    query: &str,
    games: &'a [GameRecord],
) -> Result<&'a GameRecord, ResolutionError> {
    resolve_by(query, games, |g| g.title.as_str(), "Game")
}

/// Near-miss keys for a failed query, fewest edits first, duplicates dropped.
pub fn find_similar<T, F>(query: &str, items: &[T], get_key: F) -> Vec<String>
where
    F: Fn(&T) -> &str,
{
    let lower_query = query.to_lowercase();
    let mut matches: Vec<(String, usize)> = items
        .iter()
        .map(|item| {
            let key = get_key(item);
            (key.to_string(), levenshtein_distance(&lower_query, &key.to_lowercase()))
        })
        .filter(|(_, dist)| *dist <= DISTANCE_THRESHOLD)
        .collect();

    matches.sort_by_key(|(_, dist)| *dist);
    matches.dedup_by(|a, b| a.0 == b.0);
    matches
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|(key, _)| key)
        .collect()
}

/// Edit distance between two strings, counted in chars.
pub fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let chars1: Vec<char> = s1.chars().collect();
    let chars2: Vec<char> = s2.chars().collect();

    if chars1.is_empty() {
        return chars2.len();
    }
    if chars2.is_empty() {
        return chars1.len();
    }

    // Two rolling rows instead of the full matrix
    let mut prev: Vec<usize> = (0..=chars2.len()).collect();
    let mut curr = vec![0; chars2.len() + 1];

    for (i, c1) in chars1.iter().enumerate() {
        curr[0] = i + 1;
        for (j, c2) in chars2.iter().enumerate() {
            let cost = usize::from(c1 != c2);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[chars2.len()]
}
