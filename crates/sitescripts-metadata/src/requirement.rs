//! Requirement specifiers (`Requires-Dist` values and CLI dependency names)

use std::fmt;
use std::str::FromStr;

use pep508_rs::{MarkerTree, Requirement as PepRequirement, VersionOrUrl};

use crate::errors::MetadataError;
use crate::normalize::normalize_name;

/// A named reference to a distribution, optionally constrained
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    name: String,
    key: String,
    extras: Vec<String>,
    specifier: Option<String>,
    marker: Option<MarkerTree>,
}

impl Requirement {
    /// Parse a PEP 508 requirement, `name [extras] (specifier) ; marker`
    pub fn parse(raw: &str) -> Result<Self, MetadataError> {
        let requirement = PepRequirement::from_str(raw.trim()).map_err(|e| {
            MetadataError::InvalidRequirement {
                requirement: raw.to_string(),
                reason: e.to_string(),
            }
        })?;

        let name = requirement.name.to_string();
        let specifier = match requirement.version_or_url.as_ref() {
            Some(VersionOrUrl::VersionSpecifier(specifiers)) => {
                Some(specifiers.to_string()).filter(|s| !s.is_empty())
            }
            Some(VersionOrUrl::Url(url)) => Some(format!("@ {}", url)),
            None => None,
        };

        Ok(Self {
            key: normalize_name(&name),
            name,
            extras: requirement
                .extras
                .iter()
                .map(ToString::to_string)
                .collect(),
            specifier,
            marker: requirement.marker,
        })
    }

    /// Distribution name, as canonicalized by the parser
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Normalized lookup key
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn extras(&self) -> &[String] {
        &self.extras
    }

    pub fn specifier(&self) -> Option<&str> {
        self.specifier.as_deref()
    }

    pub fn marker(&self) -> Option<&MarkerTree> {
        self.marker.as_ref()
    }

    /// Only pulled in when an extra is requested: every way of satisfying
    /// the marker needs an `extra == ...` test to hold.
    pub fn is_optional(&self) -> bool {
        self.marker.as_ref().is_some_and(requires_extra)
    }

    /// Depends on the target environment; markers are not evaluated
    pub fn is_conditional(&self) -> bool {
        self.marker.is_some()
    }

    /// Attach an environment marker, and-ing it with an existing one
    pub(crate) fn with_marker(mut self, marker: &str) -> Result<Self, MetadataError> {
        let marker = marker.trim();
        if marker.is_empty() {
            return Ok(self);
        }
        let parsed = MarkerTree::from_str(marker).map_err(|e| MetadataError::InvalidRequirement {
            requirement: format!("{}; {}", self, marker),
            reason: e.to_string(),
        })?;
        self.marker = Some(match self.marker.take() {
            Some(existing) => MarkerTree::And(vec![existing, parsed]),
            None => parsed,
        });
        Ok(self)
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.extras.is_empty() {
            write!(f, "[{}]", self.extras.join(","))?;
        }
        if let Some(specifier) = &self.specifier {
            write!(f, " {}", specifier)?;
        }
        if let Some(marker) = &self.marker {
            write!(f, "; {}", marker)?;
        }
        Ok(())
    }
}

/// Whether `marker` can only be true when some extra is active
fn requires_extra(marker: &MarkerTree) -> bool {
    match marker {
        MarkerTree::Expression(expression) => is_extra_equality(&expression.to_string()),
        MarkerTree::And(operands) => operands.iter().any(requires_extra),
        MarkerTree::Or(operands) => !operands.is_empty() && operands.iter().all(requires_extra),
    }
}

/// `extra == "name"`, in either operand order
fn is_extra_equality(expression: &str) -> bool {
    let tokens: Vec<&str> = expression.split_whitespace().collect();
    matches!(tokens.as_slice(), ["extra", "==", _] | [_, "==", "extra"])
}
