//! `.env` document model
//!
//! The document is parsed into lines that are either assignments, commented
//! assignments or opaque text (comments, blanks). Edits address keys exactly,
//! never by pattern, and rendering reproduces untouched lines verbatim.

use std::fmt::Write as _;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Line {
    /// `KEY=value`; `raw` keeps the original text until the value changes
    Entry { key: String, value: String, raw: Option<String> },
    /// `# KEY=value`, a disabled assignment a later `set` can activate
    Disabled { key: String, raw: String },
    Text(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvDocument {
    lines: Vec<Line>,
}

impl EnvDocument {
    pub fn parse(content: &str) -> Self {
        Self {
            lines: content.lines().map(parse_line).collect(),
        }
    }

    /// Current value of `key`, unquoted
    pub fn get(&self, key: &str) -> Option<&str> {
        self.lines.iter().find_map(|line| match line {
            Line::Entry { key: k, value, .. } if k == key => Some(value.as_str()),
            _ => None,
        })
    }

    /// Set `key`: rewrite the existing assignment, else activate a disabled
    /// one, else append. Returns whether the document changed.
    pub fn set(&mut self, key: &str, value: &str) -> bool {
        let entry = Line::Entry {
            key: key.to_string(),
            value: value.to_string(),
            raw: None,
        };

        if let Some(pos) = self
            .lines
            .iter()
            .position(|l| matches!(l, Line::Entry { key: k, .. } if k == key))
        {
            if self.get(key) == Some(value) {
                return false;
            }
            self.lines[pos] = entry;
            return true;
        }

        if let Some(pos) = self
            .lines
            .iter()
            .position(|l| matches!(l, Line::Disabled { key: k, .. } if k == key))
        {
            self.lines[pos] = entry;
            return true;
        }

        self.lines.push(entry);
        true
    }

    #[cfg(test)]
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().filter_map(|line| match line {
            Line::Entry { key, .. } => Some(key.as_str()),
            _ => None,
        })
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            match line {
                Line::Entry {
                    raw: Some(raw), ..
                }
                | Line::Disabled { raw, .. }
                | Line::Text(raw) => out.push_str(raw),
                Line::Entry {
                    key,
                    value,
                    raw: None,
                } => {
                    let _ = write!(out, "{key}={}", quote(value));
                }
            }
            out.push('\n');
        }
        out
    }
}

fn parse_line(raw: &str) -> Line {
    let trimmed = raw.trim_start();

    if let Some(rest) = trimmed.strip_prefix('#') {
        if let Some((key, _)) = split_assignment(rest.trim_start()) {
            return Line::Disabled {
                key: key.to_string(),
                raw: raw.to_string(),
            };
        }
        return Line::Text(raw.to_string());
    }

    match split_assignment(trimmed) {
        Some((key, value)) => Line::Entry {
            key: key.to_string(),
            value: unquote(value),
            raw: Some(raw.to_string()),
        },
        None => Line::Text(raw.to_string()),
    }
}

/// `KEY=value` with a shell-style key
fn split_assignment(text: &str) -> Option<(&str, &str)> {
    let (key, value) = text.split_once('=')?;
    let valid_key = !key.is_empty()
        && key.chars().next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    valid_key.then_some((key, value))
}

fn unquote(value: &str) -> String {
    let value = value.trim();
    if value.len() >= 2 {
        if let Some(inner) = value.strip_prefix('"').and_then(|v| v.strip_suffix('"')) {
            let mut out = String::with_capacity(inner.len());
            let mut chars = inner.chars();
            while let Some(c) = chars.next() {
                if c == '\\' {
                    if let Some(next) = chars.next() {
                        out.push(next);
                    }
                } else {
                    out.push(c);
                }
            }
            return out;
        }
        if let Some(inner) = value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')) {
            return inner.to_string();
        }
    }
    value.to_string()
}

fn quote(value: &str) -> String {
    let needs_quotes = value
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '#' | '"' | '\'' | '=' | '\\' | '$'));
    if !needs_quotes {
        return value.to_string();
    }
    // double quotes would let the framework expand `${...}`
    if value.contains('$') && !value.contains('\'') {
        return format!("'{value}'");
    }
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}
