//! folio CLI Library
//!
//! This library provides the driver around `folio-core`: settings, the HTTP
//! transport and the commands exposed by the binary.
//!
//! # Modules
//!
//! - [`cmd`] - Command implementations (build, watch, check)
//! - [`client`] - GraphQL transport
//! - [`pipeline`] - One build run from profile to output file
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! # async fn example() -> color_eyre::eyre::Result<()> {
//! folio::cmd::build::run(Path::new("folio.toml"), None).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod cmd;
pub mod pipeline;

// Re-export core types for convenience
pub use folio_core::{Config, Data, Settings};
pub use folio_generator::{BuildStats, Builder};
pub use pipeline::Pipeline;

/// Initialize tracing with the specified verbosity level.
///
/// # Arguments
///
/// * `verbose` - Verbosity level (0 = WARN, 1 = INFO, 2 = DEBUG, 3+ = TRACE)
pub fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}
