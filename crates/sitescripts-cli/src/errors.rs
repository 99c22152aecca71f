//! Error type for the sitescripts command line

use sitescripts_config::site_paths::ParseVersionError;
use sitescripts_config::ConfigError;
use sitescripts_launcher::LauncherError;
use sitescripts_metadata::MetadataError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that end a sitescripts run
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error(transparent)]
    Launcher(#[from] LauncherError),

    #[error(transparent)]
    InvalidPythonVersion(#[from] ParseVersionError),

    #[error("No Python interpreter found; pass --python or put python3 on PATH")]
    InterpreterNotFound,

    #[error("Interpreter path is not valid UTF-8: {}", .0.display())]
    NonUtf8Interpreter(PathBuf),

    #[error("Cannot determine the base prefix of {}; pass --base-prefix", .0.display())]
    BasePrefixNotFound(PathBuf),

    #[error("Cannot determine the Python version under {}; pass --python-version", .0.display())]
    PythonVersionNotFound(PathBuf),

    #[error(
        "console scripts require system site-packages, but {} sets include-system-site-packages = false (use --allow-isolated to proceed)",
        .0.display()
    )]
    SystemSiteDisabled(PathBuf),
}
