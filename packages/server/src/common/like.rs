//! Helpers for case-insensitive substring matching with `ILIKE`.

/// `%term%` with LIKE metacharacters escaped, for use with `ILIKE $n`.
/// Postgres treats backslash as the default escape character.
pub fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
