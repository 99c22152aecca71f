//! Site-packages discovery for system and user installations
//!
//! These are pure functions of an explicit base prefix, Python version and
//! user base: nothing here asks a running interpreter, so callers (and tests)
//! decide exactly which installation is being described.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

use crate::venv_paths::PYTHON_LIB_DIR;

/// `major.minor` version of a Python installation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PythonVersion {
    pub major: u8,
    pub minor: u8,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid Python version '{0}': expected MAJOR.MINOR")]
pub struct ParseVersionError(pub String);

impl PythonVersion {
    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }

    /// Directory name used under `lib/`, e.g. `python3.12`
    pub fn lib_dir_name(&self) -> String {
        format!("python{}.{}", self.major, self.minor)
    }
}

impl fmt::Display for PythonVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for PythonVersion {
    type Err = ParseVersionError;

    /// Accepts `3.12`, `3.12.1` and `3.12.0rc1`; only major and minor are kept.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseVersionError(s.to_string());
        let mut parts = s.trim().split('.');
        let major = parts
            .next()
            .and_then(|p| p.parse::<u8>().ok())
            .ok_or_else(err)?;
        let minor_digits: String = parts
            .next()
            .map(|p| p.chars().take_while(char::is_ascii_digit).collect())
            .unwrap_or_default();
        let minor = minor_digits.parse::<u8>().map_err(|_| err())?;
        Ok(Self { major, minor })
    }
}

/// Ordered search-path lists for the two site-packages layers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SitePaths {
    pub system: Vec<PathBuf>,
    pub user: Vec<PathBuf>,
}

impl SitePaths {
    /// Describe the system and user layers of one installation.
    ///
    /// `user_base` is `None` when user site-packages are disabled.
    pub fn discover(
        base_prefix: &Path,
        version: PythonVersion,
        platlibdir: &str,
        user_base: Option<&Path>,
    ) -> Self {
        Self {
            system: system_site_packages(base_prefix, version, platlibdir),
            user: user_base
                .map(|base| vec![user_site_packages(base, version)])
                .unwrap_or_default(),
        }
    }
}

/// System site-packages directories of `base_prefix`, in lookup order.
///
/// Paths are returned whether or not they exist, like `site.getsitepackages`;
/// the enumerator skips missing directories.
#[cfg(not(windows))]
pub fn system_site_packages(
    base_prefix: &Path,
    version: PythonVersion,
    platlibdir: &str,
) -> Vec<PathBuf> {
    let versioned = version.lib_dir_name();
    let mut candidates = vec![base_prefix
        .join(platlibdir)
        .join(&versioned)
        .join("site-packages")];
    if platlibdir != PYTHON_LIB_DIR {
        candidates.push(
            base_prefix
                .join(PYTHON_LIB_DIR)
                .join(&versioned)
                .join("site-packages"),
        );
    }
    // Debian-patched interpreters install into dist-packages instead
    candidates.push(
        base_prefix
            .join("local")
            .join(PYTHON_LIB_DIR)
            .join(&versioned)
            .join("dist-packages"),
    );
    candidates.push(
        base_prefix
            .join(PYTHON_LIB_DIR)
            .join(format!("python{}", version.major))
            .join("dist-packages"),
    );

    dedup_preserving_order(candidates)
}

#[cfg(windows)]
pub fn system_site_packages(
    base_prefix: &Path,
    _version: PythonVersion,
    _platlibdir: &str,
) -> Vec<PathBuf> {
    vec![
        base_prefix.to_path_buf(),
        base_prefix.join(PYTHON_LIB_DIR).join("site-packages"),
    ]
}

/// PEP 370 user site-packages directory below `user_base`
#[cfg(not(windows))]
pub fn user_site_packages(user_base: &Path, version: PythonVersion) -> PathBuf {
    user_base
        .join(PYTHON_LIB_DIR)
        .join(version.lib_dir_name())
        .join("site-packages")
}

#[cfg(windows)]
pub fn user_site_packages(user_base: &Path, version: PythonVersion) -> PathBuf {
    user_base
        .join(format!("Python{}{}", version.major, version.minor))
        .join("site-packages")
}

/// Default PEP 370 user base: `PYTHONUSERBASE`, else the platform location.
pub fn default_user_base() -> Option<PathBuf> {
    if let Some(base) = std::env::var_os("PYTHONUSERBASE").filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(base));
    }

    #[cfg(windows)]
    let base = dirs::data_dir().map(|appdata| appdata.join("Python"));

    #[cfg(not(windows))]
    let base = dirs::home_dir().map(|home| home.join(".local"));

    base
}

/// Pick `lib64` when the prefix has a `lib64/pythonX.Y` tree, else `lib`.
pub fn detect_platlibdir(base_prefix: &Path, version: PythonVersion) -> &'static str {
    if base_prefix
        .join("lib64")
        .join(version.lib_dir_name())
        .is_dir()
    {
        "lib64"
    } else {
        PYTHON_LIB_DIR
    }
}

fn dedup_preserving_order(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut seen = std::collections::HashSet::new();
    paths
        .into_iter()
        .filter(|p| seen.insert(p.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_python_version() {
        assert_eq!("3.12".parse(), Ok(PythonVersion::new(3, 12)));
        assert_eq!("3.11.4".parse(), Ok(PythonVersion::new(3, 11)));
        assert_eq!("3.13.0rc1".parse(), Ok(PythonVersion::new(3, 13)));
        assert!("three".parse::<PythonVersion>().is_err());
        assert!("3".parse::<PythonVersion>().is_err());
    }

    #[test]
    fn test_version_display() {
        let version = PythonVersion::new(3, 9);
        assert_eq!(version.to_string(), "3.9");
        assert_eq!(version.lib_dir_name(), "python3.9");
    }

    #[test]
    #[cfg(not(windows))]
    fn test_system_site_packages_lib() {
        let paths = system_site_packages(Path::new("/usr"), PythonVersion::new(3, 12), "lib");
        assert_eq!(
            paths.first(),
            Some(&PathBuf::from("/usr/lib/python3.12/site-packages"))
        );
        assert!(paths.contains(&PathBuf::from("/usr/local/lib/python3.12/dist-packages")));
        assert!(paths.contains(&PathBuf::from("/usr/lib/python3/dist-packages")));
        assert_eq!(paths.len(), 3);
    }

    #[test]
    #[cfg(not(windows))]
    fn test_system_site_packages_lib64() {
        let paths = system_site_packages(Path::new("/usr"), PythonVersion::new(3, 11), "lib64");
        assert_eq!(
            &paths[..2],
            &[
                PathBuf::from("/usr/lib64/python3.11/site-packages"),
                PathBuf::from("/usr/lib/python3.11/site-packages"),
            ]
        );
    }

    #[test]
    #[cfg(not(windows))]
    fn test_user_site_packages() {
        let path = user_site_packages(Path::new("/home/u/.local"), PythonVersion::new(3, 10));
        assert_eq!(
            path,
            PathBuf::from("/home/u/.local/lib/python3.10/site-packages")
        );
    }

    #[test]
    fn test_site_paths_without_user_base() {
        let paths = SitePaths::discover(Path::new("/opt/py"), PythonVersion::new(3, 12), "lib", None);
        assert!(paths.user.is_empty());
        assert!(!paths.system.is_empty());
    }
}
