//! Configuration file store
//!
//! Reads and writes the line-oriented configuration format:
//!
//! ```text
//! CONFIG_CPU_K2526=y
//! # CONFIG_CPU_K2521 is not set
//! CONFIG_SYSTEM_AUTOEXEC_STR="DIR"
//! ```
//!
//! Every line is kept. Lines that are not entries (comments, blanks, junk)
//! and entries nobody updates are written back unchanged and in place.

use std::collections::HashMap;
use std::sync::LazyLock;

use cfgsync_content::{ConfigValue, Line, LineEnding, join_lines, split_lines};
use cfgsync_fs::{NormalizedPath, TextFile, io};
use regex::Regex;
use serde::Serialize;

use crate::Result;

/// `KEY=value`
static SET_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([A-Za-z0-9_]+)=(.*?)\s*$").expect("Invalid set regex")
});

/// `# KEY is not set`
static UNSET_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*#\s*([A-Za-z0-9_]+) is not set\s*$").expect("Invalid unset regex")
});

/// Parse one configuration line into a key and state.
pub fn parse_entry(text: &str) -> Option<(String, ConfigValue)> {
    if let Some(caps) = UNSET_REGEX.captures(text) {
        return Some((caps[1].to_string(), ConfigValue::Unselected));
    }
    let caps = SET_REGEX.captures(text)?;
    Some((caps[1].to_string(), ConfigValue::parse(&caps[2])))
}

/// A key whose state changed during a merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigChange {
    pub key: String,
    /// `None` when the key was appended.
    pub before: Option<ConfigValue>,
    pub after: ConfigValue,
}

#[derive(Debug, Clone)]
struct ConfigLine {
    line: Line,
    key: Option<String>,
}

/// An in-memory configuration file.
#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
    lines: Vec<ConfigLine>,
    /// Keys in first-seen order with their last assigned value.
    order: Vec<String>,
    values: HashMap<String, ConfigValue>,
    file: TextFile,
}

impl ConfigFile {
    /// Parse configuration text.
    pub fn parse(text: &str) -> Self {
        Self::from_file(TextFile::utf8(text))
    }

    fn from_file(file: TextFile) -> Self {
        let mut config = Self::default();
        for line in split_lines(&file.content) {
            let key = match parse_entry(&line.text) {
                Some((key, value)) => {
                    config.record(&key, value);
                    Some(key)
                }
                None => None,
            };
            config.lines.push(ConfigLine { line, key });
        }
        config.file = file;
        config
    }

    /// Build a fresh file with one line per entry, in the given order.
    pub fn from_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, ConfigValue)>,
        K: Into<String>,
    {
        let mut config = Self::default();
        for (key, value) in entries {
            let key = key.into();
            config.lines.push(ConfigLine {
                line: Line::new(value.render(&key), LineEnding::Lf),
                key: Some(key.clone()),
            });
            config.record(&key, value);
        }
        config.file = TextFile::utf8(config.render());
        config
    }

    /// Load a configuration file. A missing file is an empty configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        match io::read_text_if_exists(path)? {
            Some(file) => {
                let config = Self::from_file(file);
                tracing::debug!(path = %path, keys = config.order.len(), "loaded configuration");
                Ok(config)
            }
            None => {
                tracing::debug!(path = %path, "configuration does not exist, starting empty");
                Ok(Self::default())
            }
        }
    }

    fn record(&mut self, key: &str, value: ConfigValue) {
        if self.values.insert(key.to_string(), value).is_none() {
            self.order.push(key.to_string());
        }
    }

    /// State of `key`; the last assignment in the file wins.
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.values.get(key)
    }

    /// Keys and states in first-seen order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.order
            .iter()
            .filter_map(|k| self.values.get(k).map(|v| (k.as_str(), v)))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Set `key` in memory, replacing every line assigning it or appending a
    /// line if there is none. Returns the change, or `None` if the value is
    /// unchanged. Lines of a key whose value already matches keep their
    /// formatting (`KEY=n`, unquoted text).
    pub fn set(&mut self, key: &str, value: ConfigValue) -> Option<ConfigChange> {
        let before = self.values.get(key).cloned();
        if before.as_ref() == Some(&value) {
            return None;
        }
        let rendered = value.render(key);
        let mut touched = false;
        let mut changed = false;

        for entry in self.lines.iter_mut().filter(|l| l.key.as_deref() == Some(key)) {
            touched = true;
            if entry.line.text != rendered {
                entry.line.text.clone_from(&rendered);
                changed = true;
            }
        }

        if !touched {
            let ending = LineEnding::dominant(self.lines.iter().map(|l| l.line.ending));
            if let Some(last) = self.lines.last_mut()
                && last.line.ending == LineEnding::None
            {
                last.line.ending = ending;
            }
            self.lines.push(ConfigLine {
                line: Line::new(rendered, ending),
                key: Some(key.to_string()),
            });
            changed = true;
        }

        self.record(key, value.clone());
        if !changed {
            return None;
        }
        tracing::debug!(%key, %value, appended = !touched, "configuration entry updated");
        Some(ConfigChange {
            key: key.to_string(),
            before,
            after: value,
        })
    }

    /// Merge entries in place: existing lines for a key are replaced where
    /// they stand, new keys are appended in the given order, every other
    /// line is kept verbatim.
    pub fn merge<I, K>(&mut self, updates: I) -> Vec<ConfigChange>
    where
        I: IntoIterator<Item = (K, ConfigValue)>,
        K: AsRef<str>,
    {
        updates
            .into_iter()
            .filter_map(|(key, value)| self.set(key.as_ref(), value))
            .collect()
    }

    /// Render the file text.
    pub fn render(&self) -> String {
        let lines: Vec<Line> = self.lines.iter().map(|l| l.line.clone()).collect();
        join_lines(&lines)
    }

    /// Rendered content in the encoding the file was read with.
    pub fn to_text_file(&self) -> TextFile {
        self.file.with_content(self.render())
    }

    /// Whether rendering would differ from what was loaded.
    pub fn is_modified(&self) -> bool {
        self.render() != self.file.content
    }

    /// Text as loaded.
    pub fn original(&self) -> &str {
        &self.file.content
    }
}
