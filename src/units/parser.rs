//! INI-style unit file parser
//!
//! Reads unit text back into sections so rendered output can be checked
//! structurally before it is installed.

use std::collections::HashMap;

/// A section maps upper-cased keys to every value given for them.
/// The u32 is the order the value appeared (for stable ordering).
pub type ParsedSection = HashMap<String, Vec<(u32, String)>>;

/// A parsed unit file is a map of section headers (`[Unit]`) to their contents
pub type ParsedFile = HashMap<String, ParsedSection>;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Section '{0}' appears more than once")]
    DuplicateSection(String),

    #[error("Line {0} is outside any section: {1}")]
    OutsideSection(usize, String),

    #[error("Line {0} is not a key=value assignment: {1}")]
    MalformedLine(usize, String),
}

/// Keys that accept space-separated multiple values
const SPACE_SEPARATED_KEYS: &[&str] = &["AFTER", "BEFORE", "REQUIRES", "WANTS", "WANTEDBY"];

/// Parse unit text
pub fn parse_file(content: &str) -> Result<ParsedFile, ParseError> {
    let mut sections: ParsedFile = HashMap::new();
    let mut current: Option<String> = None;
    let mut entry_number = 0u32;

    for (idx, raw) in content.lines().enumerate() {
        let line = raw.trim();
        let lineno = idx + 1;

        // Skip comments and empty lines
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            if sections.contains_key(line) {
                return Err(ParseError::DuplicateSection(line.to_string()));
            }
            sections.insert(line.to_string(), HashMap::new());
            current = Some(line.to_string());
            continue;
        }

        let Some(section_name) = &current else {
            return Err(ParseError::OutsideSection(lineno, line.to_string()));
        };
        let Some((key, value)) = line.split_once('=') else {
            return Err(ParseError::MalformedLine(lineno, line.to_string()));
        };

        let key = key.trim().to_uppercase();
        let value = value.trim();
        let values: Vec<&str> = if SPACE_SEPARATED_KEYS.contains(&key.as_str()) {
            value.split_whitespace().collect()
        } else {
            vec![value]
        };

        let section = sections.entry(section_name.clone()).or_default();
        let entries = section.entry(key).or_default();
        for v in values {
            if !v.is_empty() {
                entries.push((entry_number, v.to_string()));
                entry_number += 1;
            }
        }
    }

    Ok(sections)
}

/// Values of `key` in `section`, in file order
pub fn values<'a>(parsed: &'a ParsedFile, section: &str, key: &str) -> Vec<&'a str> {
    let Some(entries) = parsed.get(section).and_then(|s| s.get(&key.to_uppercase())) else {
        return Vec::new();
    };
    let mut sorted: Vec<&(u32, String)> = entries.iter().collect();
    sorted.sort_by_key(|(order, _)| *order);
    sorted.into_iter().map(|(_, v)| v.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_service() {
        let content = r#"
[Unit]
Description=Test Service
After=network.target

[Service]
Type=simple
ExecStart=/usr/bin/test

[Install]
WantedBy=multi-user.target
"#;
        let parsed = parse_file(content).unwrap();

        assert!(parsed.contains_key("[Unit]"));
        assert!(parsed.contains_key("[Service]"));
        assert!(parsed.contains_key("[Install]"));
        assert_eq!(values(&parsed, "[Unit]", "Description"), vec!["Test Service"]);
        assert_eq!(values(&parsed, "[Install]", "WantedBy"), vec!["multi-user.target"]);
    }

    #[test]
    fn test_empty_file() {
        let parsed = parse_file("").unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_comments_only() {
        let parsed = parse_file("# This is a comment\n; Another comment\n").unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_repeated_keys_keep_order() {
        let content = r#"
[Service]
Environment=B=2
Environment=A=1
Environment=B=3
"#;
        let parsed = parse_file(content).unwrap();
        assert_eq!(
            values(&parsed, "[Service]", "Environment"),
            vec!["B=2", "A=1", "B=3"]
        );
    }

    #[test]
    fn test_value_with_equals_and_commas() {
        let content = r#"
[Service]
Environment=FOO=bar=baz
ExecStart=/usr/bin/app --list a,b,c
"#;
        let parsed = parse_file(content).unwrap();
        assert_eq!(values(&parsed, "[Service]", "Environment"), vec!["FOO=bar=baz"]);
        assert_eq!(
            values(&parsed, "[Service]", "ExecStart"),
            vec!["/usr/bin/app --list a,b,c"]
        );
    }

    #[test]
    fn test_space_separated_dependencies() {
        let content = r#"
[Unit]
After=a.target b.target c.target
"#;
        let parsed = parse_file(content).unwrap();
        assert_eq!(
            values(&parsed, "[Unit]", "After"),
            vec!["a.target", "b.target", "c.target"]
        );
    }

    #[test]
    fn test_key_case_insensitive() {
        let content = r#"
[Unit]
description=Lower
Description=Mixed
"#;
        let parsed = parse_file(content).unwrap();
        assert_eq!(values(&parsed, "[Unit]", "DESCRIPTION").len(), 2);
    }

    #[test]
    fn test_duplicate_section_error() {
        let content = r#"
[Unit]
Description=First

[Unit]
Description=Second
"#;
        assert!(matches!(
            parse_file(content),
            Err(ParseError::DuplicateSection(_))
        ));
    }

    #[test]
    fn test_line_outside_section() {
        assert!(matches!(
            parse_file("Description=orphan\n[Unit]\n"),
            Err(ParseError::OutsideSection(1, _))
        ));
    }

    #[test]
    fn test_malformed_line() {
        assert!(matches!(
            parse_file("[Service]\nnot an assignment\n"),
            Err(ParseError::MalformedLine(2, _))
        ));
    }

    #[test]
    fn test_missing_key() {
        let parsed = parse_file("[Service]\nType=simple\n").unwrap();
        assert!(values(&parsed, "[Service]", "User").is_empty());
        assert!(values(&parsed, "[Nope]", "User").is_empty());
    }
}
