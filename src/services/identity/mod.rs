//! Pack identifier normalization and display name derivation.
//!
//! Identifiers double as Fabric mod ids and output jar names, so they are
//! restricted to `[a-z0-9_]`.

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

/// Compiled regex for characters not allowed in an identifier.
static RE_NON_IDENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9_]").expect("Invalid regex"));

/// Suffix appended to every generated display name.
pub const DISPLAY_SUFFIX: &str = " (Patched)";

/// Separator the normalizer substitutes for disallowed characters.
pub const SEPARATOR: char = '_';

/// Normalized pack identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PackIdentity(String);

impl PackIdentity {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Fabric rejects mod ids that do not start with a letter.
    pub fn starts_with_letter(&self) -> bool {
        self.0.chars().next().is_some_and(|c| c.is_ascii_lowercase())
    }
}

impl fmt::Display for PackIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalize a source name into an identifier.
///
/// Lowercases, then replaces every character outside `[a-z0-9_]` with `_`
/// (one underscore per character, nothing is collapsed). `"My Pack!!"`
/// becomes `"my_pack__"`.
pub fn normalize(name: &str) -> PackIdentity {
    let lower = name.to_lowercase();
    PackIdentity(RE_NON_IDENT.replace_all(&lower, "_").into_owned())
}

/// Derive a human-readable name from an identifier.
///
/// Splits on `_`, drops empty segments, capitalizes each segment's first
/// character and appends [`DISPLAY_SUFFIX`].
pub fn display_name(identity: &PackIdentity) -> String {
    let words: Vec<String> = identity
        .as_str()
        .split(SEPARATOR)
        .filter(|s| !s.is_empty())
        .map(capitalize)
        .collect();

    let base = if words.is_empty() {
        identity.as_str().to_string()
    } else {
        words.join(" ")
    };
    format!("{base}{DISPLAY_SUFFIX}")
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
#[path = "tests/identity_tests.rs"]
mod tests;
