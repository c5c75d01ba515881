//! Line-oriented document parser.
//!
//! Each line is trimmed and classified, in this order: blank, comment (`#` or
//! `;`), directive (`@`), section header (`[name]`), assignment (`key=value`).
//! Assignments are committed to the store as soon as they are read, so values
//! and directive arguments further down can reference them.

use super::directive::Directive;
use super::fetch::Fetcher;
use super::resolve::{resolve_references, MissingPolicy};
use super::{ConfigError, Store};

/// Name under which in-memory documents appear in errors.
pub const MEMORY_SOURCE: &str = "<memory>";

#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Blank,
    Comment,
    Directive(&'a str),
    Section(&'a str),
    Assignment { key: &'a str, value: &'a str },
}

#[derive(Debug, PartialEq, Eq)]
enum LineError {
    UnclosedSection,
    MissingAssignment,
}

fn classify(line: &str) -> Result<Line<'_>, LineError> {
    if line.is_empty() {
        return Ok(Line::Blank);
    }
    if line.starts_with('#') || line.starts_with(';') {
        return Ok(Line::Comment);
    }
    if let Some(rest) = line.strip_prefix('@') {
        return Ok(Line::Directive(rest));
    }
    if let Some(rest) = line.strip_prefix('[') {
        let name = rest.strip_suffix(']').ok_or(LineError::UnclosedSection)?;
        return Ok(Line::Section(name.trim()));
    }
    let (key, value) = line.split_once('=').ok_or(LineError::MissingAssignment)?;
    Ok(Line::Assignment {
        key: key.trim(),
        value: value.trim(),
    })
}

/// Parses documents into a [`Store`], following `@load` directives.
#[derive(Debug, Clone, Copy)]
pub struct DocumentParser<'a> {
    pub fetcher: &'a dyn Fetcher,
    pub policy: MissingPolicy,
    pub max_depth: usize,
}

impl DocumentParser<'_> {
    /// Parses `text` into `store`, starting in `section`.
    ///
    /// `depth` counts the `@load` directives that led here; the top-level
    /// document is depth 0. Entries committed before an error stay in the
    /// store.
    pub fn parse(
        &self,
        store: &mut Store,
        text: &str,
        source_name: &str,
        section: &str,
        depth: usize,
    ) -> Result<(), ConfigError> {
        if depth > self.max_depth {
            return Err(ConfigError::LoadLoop {
                depth,
                limit: self.max_depth,
            });
        }

        let mut section = section.to_string();

        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            let classified = classify(line).map_err(|e| {
                let (source_name, line_no, text) =
                    (source_name.to_string(), index + 1, line.to_string());
                match e {
                    LineError::UnclosedSection => ConfigError::UnclosedSection {
                        source_name,
                        line: line_no,
                        text,
                    },
                    LineError::MissingAssignment => ConfigError::MissingAssignment {
                        source_name,
                        line: line_no,
                        text,
                    },
                }
            })?;

            match classified {
                Line::Blank | Line::Comment => {}
                Line::Directive(body) => self.run_directive(store, body, &section, depth)?,
                Line::Section(name) => {
                    tracing::debug!(source = source_name, section = name, "entering section");
                    section = name.to_string();
                }
                Line::Assignment { key, value } => {
                    let key = if section.is_empty() {
                        key.to_string()
                    } else {
                        format!("{section}.{key}")
                    };
                    let value = resolve_references(value, store, self.policy);
                    store.set(key, value);
                }
            }
        }

        Ok(())
    }

    fn run_directive(
        &self,
        store: &mut Store,
        body: &str,
        section: &str,
        depth: usize,
    ) -> Result<(), ConfigError> {
        let directive = Directive::parse(body)?;
        let loaded = match directive.execute(store, self.fetcher) {
            Ok(loaded) => loaded,
            Err(ConfigError::EmptyValue) => {
                tracing::trace!(directive = body, "skipping directive with empty argument");
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        tracing::debug!(uri = %loaded.uri, depth = depth + 1, "loading included document");
        let text = String::from_utf8_lossy(&loaded.bytes);
        self.parse(store, &text, &loaded.uri, section, depth + 1)
    }
}
