//! `pyvenv.cfg` reader
//!
//! The file is a flat list of `key = value` lines written by `venv` and
//! `virtualenv`. Only the keys needed to locate the base installation are
//! interpreted; the rest are kept verbatim.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::site_paths::PythonVersion;
use crate::venv_paths::PYVENV_CFG;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PyvenvCfg {
    values: HashMap<String, String>,
}

impl PyvenvCfg {
    pub fn parse(content: &str) -> Self {
        let values = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(|line| line.split_once('='))
            .map(|(key, value)| (key.trim().to_ascii_lowercase(), value.trim().to_string()))
            .collect();
        Self { values }
    }

    /// Read `<venv_root>/pyvenv.cfg`
    pub fn read(venv_root: &Path) -> std::io::Result<Self> {
        let content = fs::read_to_string(venv_root.join(PYVENV_CFG))?;
        Ok(Self::parse(&content))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Directory holding the base interpreter, e.g. `/usr/bin`
    pub fn home(&self) -> Option<PathBuf> {
        self.get("home").map(PathBuf::from)
    }

    /// Base prefix of the interpreter the environment was created from.
    ///
    /// `home` names the interpreter's `bin` directory, so the prefix is its
    /// parent. On Windows `home` is the prefix itself.
    pub fn base_prefix(&self) -> Option<PathBuf> {
        let home = self.home()?;
        if cfg!(windows) {
            return Some(home);
        }
        home.parent().map(Path::to_path_buf)
    }

    /// `version_info` (virtualenv) or `version` (venv)
    pub fn version(&self) -> Option<PythonVersion> {
        self.get("version_info")
            .or_else(|| self.get("version"))
            .and_then(|v| v.parse().ok())
    }

    /// Whether the environment sees system site-packages. Absent means false.
    pub fn include_system_site_packages(&self) -> bool {
        self.get("include-system-site-packages")
            .is_some_and(|v| v.eq_ignore_ascii_case("true"))
    }
}
