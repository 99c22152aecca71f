//! Transitive dependency closure over a working set
//!
//! The walk is an explicit depth-first worklist: requirements are visited in
//! the caller's order, each distribution's own requirements before the next
//! sibling. A distribution is emitted once, on first visit, so cycles and
//! diamonds terminate and never duplicate.

use indexmap::IndexMap;
use tracing::debug;

use crate::distribution::Distribution;
use crate::errors::MetadataError;
use crate::requirement::Requirement;
use crate::working_set::WorkingSet;

/// Distributions reachable from a set of requirements, in visitation order
#[derive(Debug, Clone, Default)]
pub struct DependencyClosure<'a> {
    distributions: IndexMap<&'a str, &'a Distribution>,
}

impl<'a> DependencyClosure<'a> {
    pub fn len(&self) -> usize {
        self.distributions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distributions.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.distributions.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Distribution> + '_ {
        self.distributions.values().copied()
    }

    /// Normalized names in visitation order
    pub fn keys(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.distributions.keys().copied()
    }
}

struct Pending<'a> {
    requirement: &'a Requirement,
    required_by: Option<&'a Distribution>,
}

/// Resolve `requirements` against `universe`.
///
/// Optional (extra-only) requirements are never followed. Conditional
/// requirements absent from the universe are skipped, since their marker may
/// not apply here; any other missing requirement is an error.
pub fn resolve<'a>(
    requirements: &'a [Requirement],
    universe: &'a WorkingSet,
) -> Result<DependencyClosure<'a>, MetadataError> {
    let mut closure = DependencyClosure::default();
    let mut stack: Vec<Pending<'a>> = requirements
        .iter()
        .rev()
        .map(|requirement| Pending {
            requirement,
            required_by: None,
        })
        .collect();

    while let Some(Pending {
        requirement,
        required_by,
    }) = stack.pop()
    {
        if requirement.is_optional() {
            continue;
        }

        let Some(distribution) = universe.get(requirement.key()) else {
            if requirement.is_conditional() {
                debug!("Skipping conditional requirement '{}'", requirement);
                continue;
            }
            return Err(MetadataError::RequirementNotFound {
                name: requirement.name().to_string(),
                required_by: required_by.map(|parent| parent.name().to_string()),
            });
        };

        if closure.contains(distribution.key()) {
            continue;
        }
        closure
            .distributions
            .insert(distribution.key(), distribution);

        stack.extend(distribution.requires().iter().rev().map(|child| Pending {
            requirement: child,
            required_by: Some(distribution),
        }));
    }

    Ok(closure)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(spec: &str) -> Requirement {
        Requirement::parse(spec).unwrap_or_else(|_| unreachable!())
    }

    fn dist(name: &str, requires: &[&str]) -> Distribution {
        requires
            .iter()
            .fold(Distribution::new(name, "1.0", "/site"), |d, r| {
                d.with_requirement(req(r))
            })
    }

    fn universe(dists: Vec<Distribution>) -> WorkingSet {
        let mut working_set = WorkingSet::new();
        for d in dists {
            working_set.insert(d);
        }
        working_set
    }

    #[test]
    fn test_diamond_yields_shared_dependency_once() {
        let ws = universe(vec![
            dist("A", &["B", "C"]),
            dist("B", &["D"]),
            dist("C", &["D"]),
            dist("D", &[]),
        ]);
        let requirements = [req("A")];

        let first: Vec<String> = resolve(&requirements, &ws)
            .map(|c| c.keys().map(ToString::to_string).collect())
            .unwrap_or_default();
        assert_eq!(first, ["a", "b", "d", "c"]);

        let second: Vec<String> = resolve(&requirements, &ws)
            .map(|c| c.keys().map(ToString::to_string).collect())
            .unwrap_or_default();
        assert_eq!(first, second);
    }

    #[test]
    fn test_cycle_terminates() {
        let ws = universe(vec![dist("a", &["b"]), dist("b", &["c"]), dist("c", &["a"])]);
        let requirements = [req("b")];
        let closure = resolve(&requirements, &ws);
        assert!(closure.is_ok_and(|c| c.keys().collect::<Vec<_>>() == ["b", "c", "a"]));
    }

    #[test]
    fn test_caller_order_is_preserved() {
        let ws = universe(vec![dist("x", &[]), dist("y", &["z"]), dist("z", &[])]);
        let requirements = [req("y"), req("x"), req("z")];
        let closure = resolve(&requirements, &ws);
        assert!(closure.is_ok_and(|c| c.keys().collect::<Vec<_>>() == ["y", "z", "x"]));
    }

    #[test]
    fn test_names_are_normalized() {
        let ws = universe(vec![dist("My_Package", &["Other.Lib>=1"]), dist("other-lib", &[])]);
        let requirements = [req("my-package")];
        let closure = resolve(&requirements, &ws);
        assert!(closure.is_ok_and(|c| c.len() == 2 && c.contains("other-lib")));
    }

    #[test]
    fn test_missing_requirement_is_an_error() {
        let ws = universe(vec![dist("a", &["missing"])]);
        let requirements = [req("a")];
        match resolve(&requirements, &ws) {
            Err(MetadataError::RequirementNotFound { name, required_by }) => {
                assert_eq!(name, "missing");
                assert_eq!(required_by.as_deref(), Some("a"));
            }
            other => panic!("expected RequirementNotFound, got {other:?}"),
        }

        let requirements = [req("nope")];
        assert!(matches!(
            resolve(&requirements, &ws),
            Err(MetadataError::RequirementNotFound { required_by: None, .. })
        ));
    }

    #[test]
    fn test_optional_and_conditional_requirements() {
        let ws = universe(vec![
            dist(
                "a",
                &[
                    "pytest; extra == 'test'",
                    "colorama; sys_platform == 'win32'",
                    "b; python_version >= '3'",
                ],
            ),
            dist("b", &[]),
        ]);
        let requirements = [req("a")];
        let closure = resolve(&requirements, &ws);
        assert!(closure.is_ok_and(|c| c.keys().collect::<Vec<_>>() == ["a", "b"]));
    }

    #[test]
    fn test_requirement_needed_without_extras_is_followed() {
        let ws = universe(vec![
            dist("a", &["b; extra == 'cli' or python_version >= '3'"]),
            dist("b", &[]),
        ]);
        let requirements = [req("a")];
        let closure = resolve(&requirements, &ws);
        assert!(closure.is_ok_and(|c| c.keys().collect::<Vec<_>>() == ["a", "b"]));
    }

    #[test]
    fn test_empty_requirements() {
        let ws = universe(vec![dist("a", &[])]);
        assert!(resolve(&[], &ws).is_ok_and(|c| c.is_empty()));
    }
}
