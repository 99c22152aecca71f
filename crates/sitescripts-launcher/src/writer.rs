//! Writing launchers for a distribution's entry points

use crate::errors::LauncherError;
use crate::script::LauncherFile;
use crate::shebang::{build_shebang, LEGACY_SHEBANG_LIMIT};
use sitescripts_config::DEFAULT_GROUPS;
use sitescripts_metadata::Distribution;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Verb used in the per-script progress line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phrasing {
    /// `Generating script <name> into <dir>`
    #[default]
    Generating,
    /// `Installing script <name> into <dir>`
    Installing,
}

impl fmt::Display for Phrasing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phrasing::Generating => write!(f, "Generating"),
            Phrasing::Installing => write!(f, "Installing"),
        }
    }
}

/// Writes launchers into one scripts directory for one interpreter
#[derive(Debug, Clone)]
pub struct ScriptGenerator {
    target_dir: PathBuf,
    interpreter: String,
    shebang_limit: usize,
    groups: Vec<String>,
    phrasing: Phrasing,
}

impl ScriptGenerator {
    pub fn new(target_dir: impl Into<PathBuf>, interpreter: impl Into<String>) -> Self {
        Self {
            target_dir: target_dir.into(),
            interpreter: interpreter.into(),
            shebang_limit: LEGACY_SHEBANG_LIMIT,
            groups: DEFAULT_GROUPS.iter().map(|g| (*g).to_string()).collect(),
            phrasing: Phrasing::default(),
        }
    }

    pub fn with_shebang_limit(mut self, limit: usize) -> Self {
        self.shebang_limit = limit;
        self
    }

    pub fn with_groups(mut self, groups: Vec<String>) -> Self {
        self.groups = groups;
        self
    }

    pub fn with_phrasing(mut self, phrasing: Phrasing) -> Self {
        self.phrasing = phrasing;
        self
    }

    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }

    pub fn shebang(&self) -> String {
        build_shebang(&self.interpreter, self.shebang_limit)
    }

    /// Launchers `distribution` would get, in group then declaration order.
    ///
    /// Every entry point is validated here, so a malformed declaration stops
    /// the distribution before any of its files are written.
    pub fn plan(&self, distribution: &Distribution) -> Result<Vec<LauncherFile>, LauncherError> {
        let shebang = self.shebang();
        let mut launchers = Vec::new();

        for group in &self.groups {
            for entry_point in distribution.entry_points().select(group) {
                let launcher = LauncherFile::new(&shebang, &entry_point?)?;
                validate_script_name(launcher.name())?;
                launchers.push(launcher);
            }
        }

        Ok(launchers)
    }

    /// Write every launcher of `distribution`, returning the written paths.
    ///
    /// The target directory is created only when there is something to
    /// write. Existing files are overwritten.
    pub fn generate(&self, distribution: &Distribution) -> Result<Vec<PathBuf>, LauncherError> {
        let launchers = self.plan(distribution)?;
        if launchers.is_empty() {
            debug!("{} declares no scripts", distribution.name());
            return Ok(Vec::new());
        }

        let mut written = Vec::with_capacity(launchers.len());
        for launcher in &launchers {
            sitescripts_logger::progress(&format!(
                "{} script {} into {}",
                self.phrasing,
                launcher.name(),
                self.target_dir.display()
            ));
            fs::create_dir_all(&self.target_dir)
                .map_err(|e| LauncherError::io(&self.target_dir, e))?;

            let script_path = self.target_dir.join(launcher.name());
            fs::write(&script_path, launcher.render())
                .map_err(|e| LauncherError::io(&script_path, e))?;
            set_exec_permissions(&script_path)?;
            debug!(
                "Wrote {:?} for {} {}",
                script_path,
                distribution.name(),
                distribution.version()
            );
            written.push(script_path);
        }

        Ok(written)
    }
}

/// Write the launchers of `distribution` into `target_dir` with default
/// groups and the 127 byte shebang limit.
pub fn generate(
    distribution: &Distribution,
    target_dir: &Path,
    interpreter: &str,
) -> Result<Vec<PathBuf>, LauncherError> {
    ScriptGenerator::new(target_dir, interpreter).generate(distribution)
}

fn validate_script_name(name: &str) -> Result<(), LauncherError> {
    let reason = if name.is_empty() {
        Some("name is empty")
    } else if name == "." || name == ".." {
        Some("name refers to a directory")
    } else if name.contains(['/', '\\']) {
        Some("name contains a path separator")
    } else if name.contains('\0') {
        Some("name contains a NUL byte")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(LauncherError::InvalidScriptName {
            name: name.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

/// Add read and execute for everyone, keeping the other mode bits
fn set_exec_permissions(path: &Path) -> Result<(), LauncherError> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = fs::metadata(path)
            .map_err(|e| LauncherError::io(path, e))?
            .permissions()
            .mode();
        fs::set_permissions(path, fs::Permissions::from_mode(mode | 0o555))
            .map_err(|e| LauncherError::io(path, e))?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}
