//! Distributions indexed by normalized name, and the system/user split

use std::path::Path;

use indexmap::IndexMap;
use tracing::debug;

use crate::discovery::list_distributions;
use crate::distribution::Distribution;
use crate::errors::MetadataError;
use crate::normalize::normalize_name;

/// Installed distributions keyed by normalized name, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkingSet {
    distributions: IndexMap<String, Distribution>,
}

impl WorkingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enumerate `search_paths` into a working set.
    ///
    /// Earlier paths shadow later ones, like `sys.path`.
    pub fn from_paths<P: AsRef<Path>>(search_paths: &[P]) -> Result<Self, MetadataError> {
        let mut working_set = Self::new();
        for distribution in list_distributions(search_paths) {
            working_set.insert(distribution?);
        }
        Ok(working_set)
    }

    /// Add a distribution unless one with the same normalized name exists.
    ///
    /// Returns whether it was added.
    pub fn insert(&mut self, distribution: Distribution) -> bool {
        if let Some(existing) = self.distributions.get(distribution.key()) {
            debug!(
                "{} {} at {:?} is shadowed by {} at {:?}",
                distribution.name(),
                distribution.version(),
                distribution.location(),
                existing.version(),
                existing.location()
            );
            return false;
        }
        self.distributions
            .insert(distribution.key().to_string(), distribution);
        true
    }

    /// Look up by any spelling of the name
    pub fn get(&self, name: &str) -> Option<&Distribution> {
        self.distributions.get(&normalize_name(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.distributions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distributions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Distribution> {
        self.distributions.values()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.distributions.keys().map(String::as_str)
    }

    /// Combine two sets; entries of `self` shadow those of `other`
    pub fn overlay(mut self, other: WorkingSet) -> Self {
        for distribution in other.distributions.into_values() {
            self.insert(distribution);
        }
        self
    }
}

impl<'a> IntoIterator for &'a WorkingSet {
    type Item = &'a Distribution;
    type IntoIter = indexmap::map::Values<'a, String, Distribution>;

    fn into_iter(self) -> Self::IntoIter {
        self.distributions.values()
    }
}

/// System and user site-packages, with user installs taking precedence.
///
/// A distribution found in both layers belongs to `user` only, matching how
/// user site-packages shadow system ones at import time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SitePartition {
    pub system: WorkingSet,
    pub user: WorkingSet,
}

impl SitePartition {
    pub fn from_paths<P: AsRef<Path>, Q: AsRef<Path>>(
        system_paths: &[P],
        user_paths: &[Q],
    ) -> Result<Self, MetadataError> {
        let system = WorkingSet::from_paths(system_paths)?;
        let user = WorkingSet::from_paths(user_paths)?;
        Ok(Self::new(system, user))
    }

    /// Remove every user-owned name from the system set
    pub fn new(system: WorkingSet, user: WorkingSet) -> Self {
        let mut system_only = WorkingSet::new();
        for (key, distribution) in system.distributions {
            if user.distributions.contains_key(&key) {
                debug!("{} is provided by user site-packages", distribution.name());
                continue;
            }
            system_only.distributions.insert(key, distribution);
        }
        Self {
            system: system_only,
            user,
        }
    }

    /// Everything importable: user entries first, then system-only ones
    pub fn universe(&self) -> WorkingSet {
        self.user.clone().overlay(self.system.clone())
    }
}
