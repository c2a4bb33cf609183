//! Selection of the greatest all-lowercase token.

/// Placeholder returned when no token qualifies. Clients rely on always receiving one
/// element, so "nothing found" is a single space rather than an empty list.
pub const NO_LOWERCASE_SENTINEL: &str = " ";

/// Returns the greatest token that is unchanged by lowercasing, as a one-element list.
///
/// Tokens qualify when `token.to_lowercase() == token`, which admits punctuation, digits
/// and the empty string but rejects anything containing an uppercase letter. Candidates
/// are compared by codepoint order.
pub fn highest_lowercase<S: AsRef<str>>(tokens: &[S]) -> Vec<String> {
    let highest = tokens
        .iter()
        .map(|token| token.as_ref())
        .filter(|token: &&str| token.to_lowercase() == *token)
        .max()
        .unwrap_or(NO_LOWERCASE_SENTINEL);

    vec![highest.to_string()]
}
