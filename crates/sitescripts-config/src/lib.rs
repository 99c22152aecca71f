//! Configuration and filesystem layout helpers for sitescripts
//!
//! - [`config`]: the optional TOML configuration file
//! - [`site_paths`]: system and user site-packages discovery
//! - [`pyvenv`]: `pyvenv.cfg` parsing
//! - [`venv_paths`]: virtual-environment layout helpers

pub mod config;
pub mod pyvenv;
pub mod site_paths;
pub mod venv_paths;

pub use config::{Config, ConfigError, ShebangPolicy, DEFAULT_GROUPS};
pub use pyvenv::PyvenvCfg;
pub use site_paths::{PythonVersion, SitePaths};
