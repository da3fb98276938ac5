//! CQL text-literal escaping.

/// Characters with reserved meaning inside a CQL text literal.
const CQL_SPECIALS: &str = "\\*+-!():^[]{}~?|&/\"'";

/// Escape one free-text token for use inside a CQL `~` literal.
///
/// - Trims surrounding whitespace
/// - Strips trailing `*` so user-supplied wildcards are not escaped
/// - Backslash-prefixes every reserved character
/// - Appends a single `*`, turning every token into a prefix match
///
/// A blank token escapes to the empty string; callers drop those before
/// joining.
///
/// # Examples
/// ```
/// use cql_shorthand::escape_cql_token;
/// assert_eq!(escape_cql_token("test"), "test*");
/// assert_eq!(escape_cql_token("test*"), "test*");
/// assert_eq!(escape_cql_token("*test"), "\\*test*");
/// assert_eq!(escape_cql_token("   "), "");
/// ```
pub fn escape_cql_token(token: &str) -> String {
    let token = token.trim();
    if token.is_empty() {
        return String::new();
    }
    let token = token.trim_end_matches('*');

    let mut escaped = String::with_capacity(token.len() + 1);
    for c in token.chars() {
        if CQL_SPECIALS.contains(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('*');
    escaped
}
