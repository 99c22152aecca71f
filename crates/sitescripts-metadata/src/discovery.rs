//! Distribution enumeration over site-packages search paths

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::distribution::{Distribution, MetadataFormat};
use crate::errors::MetadataError;

/// List the distributions installed under `search_paths`, in path order.
///
/// Each path is read only when the iterator reaches it. Missing paths yield
/// nothing; within a path, records are visited in file-name order.
pub fn list_distributions<P: AsRef<Path>>(search_paths: &[P]) -> Distributions {
    Distributions {
        paths: search_paths
            .iter()
            .map(|p| p.as_ref().to_path_buf())
            .collect(),
        pending: VecDeque::new(),
    }
}

/// Lazy iterator returned by [`list_distributions`]
#[derive(Debug)]
pub struct Distributions {
    paths: VecDeque<PathBuf>,
    pending: VecDeque<(PathBuf, MetadataFormat)>,
}

impl Distributions {
    fn load_next_path(&mut self) -> Option<Result<(), MetadataError>> {
        let path = self.paths.pop_front()?;
        Some(scan_metadata_records(&path).map(|records| {
            debug!("Found {} metadata records in {:?}", records.len(), path);
            self.pending.extend(records);
        }))
    }
}

impl Iterator for Distributions {
    type Item = Result<Distribution, MetadataError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((path, format)) = self.pending.pop_front() {
                return Some(Distribution::read(&path, format));
            }
            match self.load_next_path()? {
                Ok(()) => continue,
                Err(err) => return Some(Err(err)),
            }
        }
    }
}

/// Metadata records directly inside `site_dir`, sorted by file name
fn scan_metadata_records(site_dir: &Path) -> Result<Vec<(PathBuf, MetadataFormat)>, MetadataError> {
    if !site_dir.is_dir() {
        debug!("Skipping missing search path {:?}", site_dir);
        return Ok(Vec::new());
    }

    let mut records: Vec<(PathBuf, MetadataFormat)> = Vec::new();
    for entry in fs::read_dir(site_dir).map_err(|e| MetadataError::io(site_dir, e))? {
        let path = entry.map_err(|e| MetadataError::io(site_dir, e))?.path();
        if let Some(format) = MetadataFormat::detect(&path) {
            records.push((path, format));
        }
    }
    records.sort_by(|a, b| a.0.file_name().cmp(&b.0.file_name()));

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_dist_info(site: &Path, dir_name: &str, name: &str) -> bool {
        let dist_info = site.join(dir_name);
        fs::create_dir_all(&dist_info).is_ok()
            && fs::write(
                dist_info.join("METADATA"),
                format!("Metadata-Version: 2.1\nName: {}\nVersion: 1.0\n", name),
            )
            .is_ok()
    }

    #[test]
    fn test_empty_search_paths() {
        let paths: [PathBuf; 0] = [];
        assert_eq!(list_distributions(&paths).count(), 0);
    }

    #[test]
    fn test_missing_path_is_not_an_error() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        let missing = temp_dir.path().join("nope");
        assert_eq!(list_distributions(&[missing]).count(), 0);
    }

    #[test]
    fn test_lists_in_path_then_name_order() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        let first = temp_dir.path().join("first");
        let second = temp_dir.path().join("second");
        let ok = make_dist_info(&first, "zeta-1.0.dist-info", "zeta")
            && make_dist_info(&first, "alpha-1.0.dist-info", "alpha")
            && make_dist_info(&second, "beta-1.0.dist-info", "beta")
            && fs::create_dir_all(second.join("beta")).is_ok()
            && fs::write(second.join("README.txt"), "not metadata").is_ok();
        if !ok {
            return;
        }

        let names: Vec<String> = list_distributions(&[first, second])
            .filter_map(Result::ok)
            .map(|d| d.name().to_string())
            .collect();
        assert_eq!(names, ["alpha", "zeta", "beta"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_path_is_an_error() {
        use std::os::unix::fs::PermissionsExt;

        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        let site = temp_dir.path().join("site");
        if !make_dist_info(&site, "foo-1.0.dist-info", "foo")
            || fs::set_permissions(&site, fs::Permissions::from_mode(0o000)).is_err()
        {
            return;
        }
        // Privileged users can list the directory anyway
        let readable = fs::read_dir(&site).is_ok();

        let results: Vec<_> = list_distributions(&[site.clone()]).collect();
        let _ = fs::set_permissions(&site, fs::Permissions::from_mode(0o755));
        if readable {
            return;
        }
        assert_eq!(results.len(), 1);
        assert!(matches!(results.first(), Some(Err(MetadataError::Io { path, .. })) if *path == site));
    }

    #[test]
    fn test_is_lazy_over_paths() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        let site = temp_dir.path().join("site");
        if !make_dist_info(&site, "foo-1.0.dist-info", "foo") {
            return;
        }

        let mut distributions = list_distributions(&[site.clone(), site]);
        assert!(distributions.next().is_some_and(|d| d.is_ok()));
        assert_eq!(distributions.paths.len(), 1);
    }
}
