//! Token normalization shared by indexing and querying

/// Characters stripped from both ends of every token
const TRIM_CHARS: &[char] = &['.', ',', '!', '?', ';', ':', '"', '(', ')'];

/// Tokens shorter than this many bytes are not indexed
pub const MIN_TOKEN_LEN: usize = 3;

/// Normalizes a single raw token
///
/// Lowercases, trims punctuation from both ends, and rejects anything shorter
/// than [`MIN_TOKEN_LEN`] bytes of UTF-8, so `"éé"` (4 bytes) is kept.
///
/// # Examples
///
/// ```
/// use sumi_index::index::normalize_token;
///
/// assert_eq!(normalize_token("(Hello!)"), Some("hello".to_string()));
/// assert_eq!(normalize_token("is"), None);
/// ```
pub fn normalize_token(raw: &str) -> Option<String> {
    let lowered = raw.to_lowercase();
    let trimmed = lowered.trim_matches(TRIM_CHARS);

    if trimmed.len() < MIN_TOKEN_LEN {
        return None;
    }

    Some(trimmed.to_string())
}

/// Splits text on whitespace and yields the normalized tokens
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace().filter_map(normalize_token)
}
