//! Variable reference expansion for values and directive arguments.
//!
//! A reference is `${key}` or `${key1,key2,...}`. Each name is trimmed and
//! looked up in order against the store (environment fallback included); the
//! first one that exists is substituted. Expansion is a single pass: text that
//! was substituted in is never expanded again.
//!
//! When no name matches, [`MissingPolicy`] decides the outcome. The default,
//! [`MissingPolicy::Keep`], leaves the token in place so an unresolved
//! reference shows up in the loaded value.

use super::Store;

/// What to substitute for a reference none of whose names exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingPolicy {
    /// Leave the `${...}` token unchanged.
    #[default]
    Keep,
    /// Replace the token with the empty string.
    Empty,
}

/// Expands every `${...}` reference in `raw` against `store`.
///
/// A `${` without a closing `}` is copied through verbatim.
pub fn resolve_references(raw: &str, store: &Store, policy: MissingPolicy) -> String {
    let mut result = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];

        let Some(end) = after_open.find('}') else {
            // Unclosed reference
            result.push_str(&rest[start..]);
            return result;
        };

        let token = &rest[start..start + 2 + end + 1];
        match lookup_first(&after_open[..end], store) {
            Some(value) => result.push_str(&value),
            None => match policy {
                MissingPolicy::Keep => result.push_str(token),
                MissingPolicy::Empty => {}
            },
        }
        rest = &after_open[end + 1..];
    }

    result.push_str(rest);
    result
}

/// Returns the value of the first name in a comma-separated list that exists.
fn lookup_first(names: &str, store: &Store) -> Option<String> {
    names
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .find(|name| store.exists(name))
        .map(|name| store.string(name))
}
