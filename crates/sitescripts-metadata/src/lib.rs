//! Installed Python distribution metadata
//!
//! Reads `.dist-info` and `.egg-info` records from site-packages directories,
//! exposes their entry points and requirements, and resolves dependency
//! closures over the resulting working sets.

pub mod closure;
pub mod core_metadata;
pub mod discovery;
pub mod distribution;
pub mod entry_point;
pub mod errors;
pub mod normalize;
pub mod requirement;
pub mod working_set;

pub use closure::{resolve, DependencyClosure};
pub use discovery::{list_distributions, Distributions};
pub use distribution::{Distribution, MetadataFormat};
pub use entry_point::{EntryPoint, EntryPoints, CONSOLE_SCRIPTS, GUI_SCRIPTS};
pub use errors::MetadataError;
pub use normalize::normalize_name;
pub use requirement::Requirement;
pub use working_set::{SitePartition, WorkingSet};
