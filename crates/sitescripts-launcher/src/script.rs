//! Launcher file content

use sitescripts_metadata::{EntryPoint, MetadataError};
use std::fmt;

/// A rendered console-script launcher.
///
/// The import binds the first segment of the callable; the invocation uses
/// the full dotted path, so `cli.main` becomes `from pkg import cli` followed
/// by `sys.exit(cli.main())`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherFile {
    name: String,
    shebang: String,
    module: String,
    callable: String,
}

impl LauncherFile {
    pub fn new(shebang: &str, entry_point: &EntryPoint) -> Result<Self, MetadataError> {
        Ok(Self {
            name: entry_point.name().to_string(),
            shebang: shebang.to_string(),
            module: entry_point.module().to_string(),
            callable: entry_point.callable()?.to_string(),
        })
    }

    /// File name of the launcher inside the scripts directory
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shebang(&self) -> &str {
        &self.shebang
    }

    fn import_name(&self) -> &str {
        self.callable
            .split_once('.')
            .map_or(self.callable.as_str(), |(first, _)| first)
    }

    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for LauncherFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{shebang}\n\nimport sys\n\nfrom {module} import {attr}\n\n\nif __name__ == \"__main__\":\n    sys.exit({main}())\n",
            shebang = self.shebang,
            module = self.module,
            attr = self.import_name(),
            main = self.callable,
        )
    }
}
