//! Helpers for validating names used as single path components.

/// Returns true if a ROM or image file name is safe to use as a single path
/// component on all platforms.
///
/// Rules:
/// - Must be non-empty and not "." or ".."
/// - Must not contain path separators ('/' or '\\')
/// - Must not contain control characters or NUL
/// - Must not contain Windows-reserved filename characters
/// - Must not end with '.' or space (Windows restriction)
pub fn is_safe_file_name(name: &str) -> bool {
    if name.is_empty() || name == "." || name == ".." {
        return false;
    }

    if name.ends_with('.') || name.ends_with(' ') {
        return false;
    }

    name.chars().all(|c| {
        !(c == '/'
            || c == '\\'
            || c.is_control()
            || matches!(c, ':' | '*' | '?' | '"' | '<' | '>' | '|'))
    })
}
