//! The `wut` config file format.
//!
//! Parsing is delegated to `configparser`, which reads the classic INI
//! dialect: `[section]` headers, `key = value` / `key: value` pairs and `#`
//! or `;` comments. Section names and keys are case-insensitive. Keys set in
//! `[DEFAULT]` are visible from every other section that does not set them
//! itself.

use std::collections::BTreeMap;

/// Section whose keys every other section inherits
pub const DEFAULT_SECTION: &str = "default";

/// Parsed config document: section name -> (key -> value)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ini {
    sections: BTreeMap<String, BTreeMap<String, String>>,
}

/// The document could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct IniError(String);

impl Ini {
    /// Parse INI text
    pub fn parse(text: &str) -> Result<Self, IniError> {
        let mut parser = configparser::ini::Ini::new();
        let map = parser.read(text.to_string()).map_err(IniError)?;

        // A bare `key` with no delimiter reads as an empty value
        let sections = map
            .into_iter()
            .map(|(section, entries)| {
                let entries = entries
                    .into_iter()
                    .map(|(key, value)| (key, value.unwrap_or_default()))
                    .collect();
                (section, entries)
            })
            .collect();

        Ok(Self { sections })
    }

    /// Raw value of `section.key`, empty strings included. Falls back to
    /// `[DEFAULT]` when the section does not set the key.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        let key = key.to_lowercase();
        let lookup = |name: &str| {
            self.sections
                .get(name)
                .and_then(|entries| entries.get(&key))
                .map(String::as_str)
        };
        lookup(&section.to_lowercase()).or_else(|| lookup(DEFAULT_SECTION))
    }

    pub fn has_section(&self, section: &str) -> bool {
        self.sections.contains_key(&section.to_lowercase())
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}
