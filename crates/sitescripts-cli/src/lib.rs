//! sitescripts library - expose modules for testing
//!
//! The binary is a thin clap wrapper around [`commands::install`].

pub mod commands;
pub mod common;
pub mod context;
pub mod errors;

pub use common::GlobalOpts;
pub use sitescripts_logger as logger;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Route library `tracing` events to stderr, filtered by `RUST_LOG`
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr),
        )
        .try_init();
}
