//! RFC 6901 JSON Pointer codec.
//!
//! Pointers are carried as strings on patch operations; this module converts
//! between that string form and unescaped reference tokens.

use crate::error::PathError;

/// Escape one reference token (`~` → `~0`, `/` → `~1`).
pub fn escape_token(token: &str) -> String {
    if !token.contains(['~', '/']) {
        return token.to_string();
    }
    token.replace('~', "~0").replace('/', "~1")
}

/// Unescape one reference token.
///
/// A `~` that is not followed by `0` or `1` is malformed.
pub fn unescape_token(token: &str) -> Result<String, PathError> {
    if !token.contains('~') {
        return Ok(token.to_string());
    }
    let mut out = String::with_capacity(token.len());
    let mut chars = token.chars();
    while let Some(c) = chars.next() {
        if c != '~' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('0') => out.push('~'),
            Some('1') => out.push('/'),
            _ => return Err(PathError::InvalidEscape(token.to_string())),
        }
    }
    Ok(out)
}

/// Parse a pointer into unescaped tokens.
///
/// - `"" -> []`
/// - `"/" -> [""]`
/// - `"/a~1b/~0k/0" -> ["a/b", "~k", "0"]`
pub fn parse_pointer(pointer: &str) -> Result<Vec<String>, PathError> {
    if pointer.is_empty() {
        return Ok(Vec::new());
    }
    let Some(rest) = pointer.strip_prefix('/') else {
        return Err(PathError::NotAbsolute(pointer.to_string()));
    };
    rest.split('/').map(unescape_token).collect()
}

/// Format unescaped tokens as a pointer.
pub fn format_pointer<I, S>(tokens: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::new();
    for token in tokens {
        out.push('/');
        out.push_str(&escape_token(token.as_ref()));
    }
    out
}

/// Returns `true` if `prefix` is a strict ancestor of `tokens`.
pub fn is_strict_prefix(prefix: &[String], tokens: &[String]) -> bool {
    prefix.len() < tokens.len() && tokens[..prefix.len()] == *prefix
}

/// Interpret a token as an array index.
///
/// Only canonical decimal forms are indices: `"0"`, `"17"`, but not `"01"`
/// or `"-"`.
pub fn array_index(token: &str) -> Option<usize> {
    if token.is_empty() || (token.len() > 1 && token.starts_with('0')) {
        return None;
    }
    if !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}
