//! Entry points declared by installed distributions
//!
//! Entry points reach us in two shapes: already split into module and
//! attribute (built programmatically), or as the combined `module:attr`
//! string found in `entry_points.txt`. [`EntryPoint`] is the single type
//! callers see; [`EntryPoints`] keeps declarations in their source shape and
//! converts them when a group is selected.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::MetadataError;

/// Group of console launchers
pub const CONSOLE_SCRIPTS: &str = "console_scripts";
/// Group of GUI launchers
pub const GUI_SCRIPTS: &str = "gui_scripts";

/// `module[:attr[.attr...]] [extras]`, the `importlib.metadata` value pattern
static VALUE_PATTERN: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(
        r"^(?P<module>[\w.]+)\s*(:\s*(?P<attr>[\w.]+)\s*)?((?P<extras>\[.*\])\s*)?$",
    )
    .ok()
});

/// A named reference to an importable callable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPoint {
    name: String,
    group: String,
    module: String,
    attr: Option<String>,
    extras: Vec<String>,
}

impl EntryPoint {
    /// Build an entry point from its structured parts
    pub fn new(
        group: impl Into<String>,
        name: impl Into<String>,
        module: impl Into<String>,
        attr: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            group: group.into(),
            module: module.into(),
            attr: Some(attr.into()),
            extras: Vec::new(),
        }
    }

    /// Parse a combined `module:attr [extras]` value
    pub fn parse(group: &str, name: &str, value: &str) -> Result<Self, MetadataError> {
        let invalid = || MetadataError::InvalidEntryPoint {
            group: group.to_string(),
            name: name.to_string(),
            value: value.to_string(),
        };

        let pattern = VALUE_PATTERN.as_ref().ok_or_else(invalid)?;
        let captures = pattern.captures(value.trim()).ok_or_else(invalid)?;
        let module = captures
            .name("module")
            .map(|m| m.as_str().to_string())
            .ok_or_else(invalid)?;
        let attr = captures.name("attr").map(|m| m.as_str().to_string());
        let extras = captures
            .name("extras")
            .map(|m| {
                m.as_str()
                    .trim_start_matches('[')
                    .trim_end_matches(']')
                    .split(',')
                    .map(str::trim)
                    .filter(|extra| !extra.is_empty())
                    .map(ToString::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            name: name.to_string(),
            group: group.to_string(),
            module,
            attr,
            extras,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn attr(&self) -> Option<&str> {
        self.attr.as_deref()
    }

    pub fn extras(&self) -> &[String] {
        &self.extras
    }

    /// The combined `module:attr` form
    pub fn value(&self) -> String {
        match &self.attr {
            Some(attr) => format!("{}:{}", self.module, attr),
            None => self.module.clone(),
        }
    }

    /// The callable's dotted path, required for anything that invokes it
    pub fn callable(&self) -> Result<&str, MetadataError> {
        self.attr
            .as_deref()
            .ok_or_else(|| MetadataError::MissingAttribute {
                group: self.group.clone(),
                name: self.name.clone(),
                value: self.value(),
            })
    }
}

/// A declaration in the shape it was read in
#[derive(Debug, Clone, PartialEq, Eq)]
enum Declaration {
    Structured(EntryPoint),
    Text { name: String, value: String },
}

/// Entry points of one distribution, grouped in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryPoints {
    groups: IndexMap<String, Vec<Declaration>>,
}

impl EntryPoints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `entry_points.txt` content
    ///
    /// Lines outside any `[group]` header are ignored, as are `#` and `;`
    /// comments. Values are kept as text until their group is selected.
    pub fn parse(content: &str) -> Self {
        let mut entry_points = Self::new();
        let mut current_group: Option<String> = None;

        for line in content.lines() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if line.starts_with('[') && line.ends_with(']') {
                current_group = Some(line[1..line.len() - 1].trim().to_string());
                continue;
            }

            let Some(group) = current_group.as_ref() else {
                continue;
            };
            let Some((name, value)) = line.split_once('=') else {
                continue;
            };
            entry_points.push_text(group, name.trim(), value.trim());
        }

        entry_points
    }

    pub fn push(&mut self, entry_point: EntryPoint) {
        self.groups
            .entry(entry_point.group.clone())
            .or_default()
            .push(Declaration::Structured(entry_point));
    }

    pub fn push_text(&mut self, group: &str, name: &str, value: &str) {
        self.groups
            .entry(group.to_string())
            .or_default()
            .push(Declaration::Text {
                name: name.to_string(),
                value: value.to_string(),
            });
    }

    /// Group names in declaration order
    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.groups.values().all(Vec::is_empty)
    }

    /// Entry points of `group`, converting text declarations on the way
    pub fn select<'a>(
        &'a self,
        group: &'a str,
    ) -> impl Iterator<Item = Result<EntryPoint, MetadataError>> + 'a {
        self.groups
            .get(group)
            .into_iter()
            .flatten()
            .map(move |declaration| match declaration {
                Declaration::Structured(entry_point) => Ok(entry_point.clone()),
                Declaration::Text { name, value } => EntryPoint::parse(group, name, value),
            })
    }
}
