use sitescripts_metadata::MetadataError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while writing launcher files
#[derive(Error, Debug)]
pub enum LauncherError {
    #[error("IO error writing {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error("Entry point '{name}' cannot be used as a script file name: {reason}")]
    InvalidScriptName { name: String, reason: &'static str },
}

impl LauncherError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        LauncherError::Io {
            path: path.into(),
            source,
        }
    }
}
