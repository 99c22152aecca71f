//! Layout of Python installations and virtual environments
//!
//! Locates the environment owning a scripts directory, its interpreter, and
//! the `pythonX.Y` library directory of an installation prefix.

use crate::site_paths::PythonVersion;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Library directory of a prefix
#[cfg(windows)]
pub const PYTHON_LIB_DIR: &str = "Lib";
#[cfg(not(windows))]
pub const PYTHON_LIB_DIR: &str = "lib";

/// Scripts directory of an environment
#[cfg(windows)]
pub const PYTHON_BIN_DIR: &str = "Scripts";
#[cfg(not(windows))]
pub const PYTHON_BIN_DIR: &str = "bin";

/// Marker file written by `venv`/`virtualenv` at the environment root
pub const PYVENV_CFG: &str = "pyvenv.cfg";

#[cfg(not(windows))]
const PYTHON_EXE_CANDIDATES: &[&str] = &["python3", "python"];
#[cfg(windows)]
const PYTHON_EXE_CANDIDATES: &[&str] = &["python.exe", "python3.exe"];

/// Failure to locate part of a Python installation
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VenvPathError {
    #[error("Virtual environment not found: {}", .0.display())]
    VenvNotFound(PathBuf),

    #[error("No {what} in {}", .dir.display())]
    Missing { what: &'static str, dir: PathBuf },

    #[error("Cannot list {}: {reason}", .dir.display())]
    Unreadable { dir: PathBuf, reason: String },
}

/// Return the virtual environment root that owns `scripts_dir`.
///
/// A scripts directory such as `.tox/py/bin` belongs to `.tox/py` when that
/// directory carries a `pyvenv.cfg`. Returns `None` for plain directories.
pub fn venv_root_for_scripts_dir(scripts_dir: &Path) -> Option<PathBuf> {
    let root = scripts_dir.parent()?;
    root.join(PYVENV_CFG).is_file().then(|| root.to_path_buf())
}

/// Interpreter inside an environment: `bin/python3` or `bin/python`, and
/// `Scripts/python.exe` on Windows.
pub fn resolve_python_exe(venv_path: &Path) -> Result<PathBuf, VenvPathError> {
    if !venv_path.is_dir() {
        return Err(VenvPathError::VenvNotFound(venv_path.to_path_buf()));
    }

    let bin_dir = venv_path.join(PYTHON_BIN_DIR);
    PYTHON_EXE_CANDIDATES
        .iter()
        .map(|exe| bin_dir.join(exe))
        .find(|candidate| candidate.is_file())
        .ok_or(VenvPathError::Missing {
            what: "Python executable",
            dir: bin_dir,
        })
}

/// First `python3` (or `python`) found on `PATH`
pub fn python_on_path() -> Option<PathBuf> {
    which::which("python3")
        .or_else(|_| which::which("python"))
        .ok()
}

/// Version of the installation at `prefix`, read from its `lib/pythonX.Y`
/// directory. Names are compared sorted, so the listing order does not matter.
pub fn find_python_version(prefix: &Path) -> Result<PythonVersion, VenvPathError> {
    let lib_dir = prefix.join(PYTHON_LIB_DIR);
    let entries = fs::read_dir(&lib_dir).map_err(|e| VenvPathError::Unreadable {
        dir: lib_dir.clone(),
        reason: e.to_string(),
    })?;

    let mut names: Vec<String> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_dir())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .collect();
    names.sort();

    names
        .iter()
        .filter_map(|name| name.strip_prefix("python"))
        .find_map(|version| version.parse::<PythonVersion>().ok())
        .ok_or(VenvPathError::Missing {
            what: "pythonX.Y directory",
            dir: lib_dir,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[cfg(not(windows))]
    fn mock_venv(python_version: &str) -> Option<TempDir> {
        let temp_dir = TempDir::new().ok()?;
        let venv_path = temp_dir.path();

        let site_packages = venv_path
            .join("lib")
            .join(python_version)
            .join("site-packages");
        fs::create_dir_all(&site_packages).ok()?;

        let bin_dir = venv_path.join("bin");
        fs::create_dir_all(&bin_dir).ok()?;
        fs::write(bin_dir.join("python3"), "").ok()?;
        fs::write(venv_path.join(PYVENV_CFG), "home = /usr/bin\n").ok()?;

        Some(temp_dir)
    }

    #[test]
    #[cfg(not(windows))]
    fn test_resolve_python_exe_unix() {
        let Some(temp_venv) = mock_venv("python3.12") else {
            return;
        };
        let result = resolve_python_exe(temp_venv.path());
        assert!(result.is_ok(), "Failed to resolve python exe");
        assert!(result.is_ok_and(|p| p.ends_with("bin/python3")));
    }

    #[test]
    #[cfg(not(windows))]
    fn test_find_python_version_unix() {
        let Some(temp_venv) = mock_venv("python3.12") else {
            return;
        };
        let result = find_python_version(temp_venv.path());
        assert!(result.is_ok_and(|v| v == PythonVersion::new(3, 12)));
    }

    #[test]
    #[cfg(not(windows))]
    fn test_venv_root_for_scripts_dir() {
        let Some(temp_venv) = mock_venv("python3.11") else {
            return;
        };
        let bin_dir = temp_venv.path().join("bin");
        assert_eq!(
            venv_root_for_scripts_dir(&bin_dir),
            Some(temp_venv.path().to_path_buf())
        );

        let plain = temp_venv.path().join("lib");
        assert_eq!(venv_root_for_scripts_dir(&plain.join("python3.11")), None);
    }

    #[test]
    fn test_missing_pieces() {
        let Ok(temp_dir) = TempDir::new() else {
            return;
        };
        let missing = temp_dir.path().join("nope");
        assert!(matches!(
            resolve_python_exe(&missing),
            Err(VenvPathError::VenvNotFound(_))
        ));
        assert!(matches!(
            resolve_python_exe(temp_dir.path()),
            Err(VenvPathError::Missing { .. })
        ));
        assert!(matches!(
            find_python_version(temp_dir.path()),
            Err(VenvPathError::Unreadable { .. })
        ));

        if fs::create_dir_all(temp_dir.path().join(PYTHON_LIB_DIR).join("site-python")).is_err() {
            return;
        }
        let err = find_python_version(temp_dir.path());
        assert!(err.is_err_and(|e| e.to_string().starts_with("No pythonX.Y directory in")));
    }
}
