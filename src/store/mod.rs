//! In-memory config collections
//!
//! A [`ConfigSet`] holds the keys collected from one or more config files,
//! grouped into sections in discovery order. Values for keys the default
//! registry knows are normalized through their type as they are ingested,
//! so a stored value is always in canonical form.

pub mod paths;

use std::path::{Path, PathBuf};

use crate::defaults;
use crate::error::ConfigError;
use crate::parser;
use crate::writer;

pub use paths::ConfigPaths;

/// One key under a section. `name` may contain dots when the key came
/// from a `[section "subsection"]` header.
#[derive(Debug, Clone)]
pub struct ConfigItem {
    pub name: String,
    pub value: String,
    /// Not present in the default registry
    pub is_custom: bool,
}

/// A section and its keys, in discovery order
#[derive(Debug, Clone)]
pub struct ConfigSection {
    pub name: String,
    pub items: Vec<ConfigItem>,
}

/// Which config files feed a [`ConfigSet`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// The system wide file only
    System,
    /// The per-user file only
    User,
    /// System first, then user, with user values winning
    Merged,
}

/// Answer to a [`ConfigSet::query`]
#[derive(Debug, PartialEq)]
pub enum Resolved<'a> {
    /// Value set in a config file
    Current(&'a str),
    /// Nothing set; rendered default from the registry
    Default(String),
}

/// Borrowed view of one stored key for iteration
#[derive(Debug)]
pub struct Entry<'a> {
    pub section: &'a str,
    pub name: &'a str,
    pub value: &'a str,
}

/// Config keys collected from files, plus the files they came from
#[derive(Debug, Default)]
pub struct ConfigSet {
    sections: Vec<ConfigSection>,
    sources: Vec<PathBuf>,
}

impl ConfigSet {
    pub fn new() -> Self {
        ConfigSet::default()
    }

    /// Load the files selected by `scope`. Missing or unreadable files
    /// are skipped; files that parse with errors or hold bad typed
    /// values are fatal.
    pub fn load(paths: &ConfigPaths, scope: Scope) -> Result<Self, ConfigError> {
        let mut set = ConfigSet::new();
        match scope {
            Scope::System => {
                set.read_file_soft(&paths.system)?;
            }
            Scope::User => {
                if let Some(user) = &paths.user {
                    set.read_file_soft(user)?;
                }
            }
            Scope::Merged => {
                // An exclusive file replaces the whole search path
                if let Some(exclusive) = &paths.exclusive {
                    set.read_file_soft(exclusive)?;
                    return Ok(set);
                }
                if paths.use_system {
                    set.read_file_soft(&paths.system)?;
                }
                if paths.use_user {
                    if let Some(user) = &paths.user {
                        if paths::user_file_usable(user) {
                            set.read_file_soft(user)?;
                        }
                    }
                }
            }
        }
        Ok(set)
    }

    /// Ingest config text. `origin` names the source in error messages.
    pub fn read_str(&mut self, text: &str, origin: &str) -> Result<(), ConfigError> {
        parser::parse_str(text, origin, |key, value| self.collect(origin, key, value))
    }

    fn read_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let label = path.display().to_string();
        parser::parse_file(path, |key, value| self.collect(&label, key, value))?;
        self.sources.push(path.to_path_buf());
        Ok(())
    }

    fn read_file_soft(&mut self, path: &Path) -> Result<(), ConfigError> {
        match self.read_file(path) {
            Ok(()) => Ok(()),
            Err(ConfigError::Io(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Store one parsed key. Keys the registry knows pass through their
    /// type; a key with no value stores as implicit true.
    fn collect(&mut self, path: &str, key: &str, value: Option<&str>) -> Result<(), ConfigError> {
        if let Some((section, name)) = key.split_once('.') {
            let stored = match defaults::lookup(section, name) {
                Some(default) => {
                    default.value.normalize(key, value).map_err(|e| match e {
                        ConfigError::BadValue { key } => ConfigError::BadFileValue {
                            key,
                            path: path.to_string(),
                        },
                        other => other,
                    })?
                }
                None => value.unwrap_or("true").to_string(),
            };
            self.upsert(section, name, stored);
        }
        Ok(())
    }

    /// Replace in place when the key exists, else append. A replaced key
    /// keeps its position.
    fn upsert(&mut self, section: &str, name: &str, value: String) {
        let is_custom = defaults::lookup(section, name).is_none();
        let pos = match self.sections.iter().position(|s| s.name == section) {
            Some(pos) => pos,
            None => {
                self.sections.push(ConfigSection {
                    name: section.to_string(),
                    items: Vec::new(),
                });
                self.sections.len() - 1
            }
        };
        let section = &mut self.sections[pos];
        match section.items.iter_mut().find(|i| i.name == name) {
            Some(item) => item.value = value,
            None => section.items.push(ConfigItem {
                name: name.to_string(),
                value,
                is_custom,
            }),
        }
    }

    /// Value currently set for `section.name`, if any
    pub fn get(&self, section: &str, name: &str) -> Option<&str> {
        self.sections
            .iter()
            .find(|s| s.name == section)?
            .items
            .iter()
            .find(|i| i.name == name)
            .map(|i| i.value.as_str())
    }

    /// Set value, falling back to the registry default when nothing is
    /// set. None when the key is in neither.
    pub fn query(&self, section: &str, name: &str) -> Option<Resolved<'_>> {
        if let Some(value) = self.get(section, name) {
            return Some(Resolved::Current(value));
        }
        defaults::lookup(section, name).map(|d| Resolved::Default(d.value.render()))
    }

    /// Set `section.name` to `value`, normalizing through the registry
    /// type when the key is known
    pub fn set_value(&mut self, section: &str, name: &str, value: &str) -> Result<(), ConfigError> {
        let stored = match defaults::lookup(section, name) {
            Some(default) => {
                let key = format!("{}.{}", section, name);
                default.value.normalize(&key, Some(value))?
            }
            None => value.to_string(),
        };
        self.upsert(section, name, stored);
        Ok(())
    }

    /// All stored keys in section, then item, discovery order
    pub fn entries(&self) -> impl Iterator<Item = Entry<'_>> {
        self.sections.iter().flat_map(|section| {
            section.items.iter().map(move |item| Entry {
                section: &section.name,
                name: &item.name,
                value: &item.value,
            })
        })
    }

    /// Every registry key with its current or default value, then the
    /// custom keys in discovery order. Pairs are `(section.name, value)`.
    pub fn entries_with_defaults(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        for default in defaults::DEFAULT_CONFIGS {
            let value = match self.get(default.section, default.name) {
                Some(current) => current.to_string(),
                None => default.value.render(),
            };
            out.push((format!("{}.{}", default.section, default.name), value));
        }
        for section in &self.sections {
            for item in &section.items {
                if item.is_custom {
                    out.push((format!("{}.{}", section.name, item.name), item.value.clone()));
                }
            }
        }
        out
    }

    /// True when no file contributed any key
    pub fn is_empty(&self) -> bool {
        self.sections.iter().all(|s| s.items.is_empty())
    }

    pub fn sections(&self) -> &[ConfigSection] {
        &self.sections
    }

    /// Files that contributed keys, in read order
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    /// Write the whole set to `path` in config file format
    pub fn write(&self, path: &Path) -> Result<(), ConfigError> {
        writer::write_file(self, path)
    }
}

/// Split a dotted key from the command line into its section and name
/// parts. The section is everything before the first dot; the rest is
/// the name and may contain further dots naming a subsection. Section
/// and final name segment fold to lowercase, the subsection keeps its
/// case.
pub fn split_key(key: &str) -> Result<(String, String), ConfigError> {
    let (section, rest) = match key.split_once('.') {
        Some((section, rest)) if !section.is_empty() => (section, rest),
        _ => {
            return Err(ConfigError::MissingSection {
                key: key.to_string(),
            })
        }
    };
    if rest.is_empty() {
        return Err(ConfigError::MissingName {
            key: key.to_string(),
        });
    }
    if !section.chars().all(parser::is_key_char) {
        return Err(ConfigError::InvalidKey {
            key: key.to_string(),
        });
    }

    let (subsection, name) = match rest.rsplit_once('.') {
        Some((subsection, name)) => (Some(subsection), name),
        None => (None, rest),
    };
    if subsection.map_or(false, |s| s.contains('\n')) {
        return Err(ConfigError::InvalidKey {
            key: key.to_string(),
        });
    }
    let mut chars = name.chars();
    let name_ok = match chars.next() {
        Some(c) => c.is_ascii_alphabetic() && chars.all(parser::is_key_char),
        None => false,
    };
    if !name_ok {
        return Err(ConfigError::InvalidKey {
            key: key.to_string(),
        });
    }

    let section = section.to_ascii_lowercase();
    let name = match subsection {
        Some(subsection) => format!("{}.{}", subsection, name.to_ascii_lowercase()),
        None => name.to_ascii_lowercase(),
    };
    Ok((section, name))
}
