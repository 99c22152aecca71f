//! Console-script launcher generation
//!
//! Turns a distribution's `console_scripts` / `gui_scripts` entry points into
//! small executable Python files that import and call the declared callable
//! with a chosen interpreter.

pub mod errors;
pub mod script;
pub mod shebang;
pub mod writer;

pub use errors::LauncherError;
pub use script::LauncherFile;
pub use shebang::{build_shebang, max_length, LEGACY_SHEBANG_LIMIT, MODERN_SHEBANG_LIMIT};
pub use writer::{generate, Phrasing, ScriptGenerator};
