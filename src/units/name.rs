//! Unit name derivation
//!
//! Unit names live in a flat directory, so separators and dots are replaced
//! rather than rejected.

use std::path::Path;

/// Characters replaced with [`NAME_SEPARATOR`] in derived names, in
/// addition to any whitespace
pub const NAME_SUBSTITUTIONS: &[char] = &[' ', '/', '\\', '.'];

pub const NAME_SEPARATOR: char = '-';

/// Used when neither an explicit name nor a command token yields anything
pub const FALLBACK_NAME: &str = "service";

/// Derive the unit name from an explicit override or the command's first token
///
/// The command token is reduced to its base name first, so
/// `/usr/local/bin/myapp` becomes `myapp`.
pub fn normalize_name(explicit: Option<&str>, command: &[String]) -> String {
    let base = match explicit.filter(|n| !n.is_empty()) {
        Some(name) => name,
        None => command.first().map(|t| base_name(t)).unwrap_or_default(),
    };

    let name = substitute(base);
    if name.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        name
    }
}

/// Apply the fixed character substitution
pub fn substitute(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_whitespace() || NAME_SUBSTITUTIONS.contains(&c) {
                NAME_SEPARATOR
            } else {
                c
            }
        })
        .collect()
}

fn base_name(token: &str) -> &str {
    Path::new(token)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(token)
}
