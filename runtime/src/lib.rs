//! Iris runtime - standard library, worker interpreter and REPL
//!
//! This crate provides everything around the language core:
//! - Standard library natives and the standard scope
//! - Process argument injection
//! - Worker-thread interpreter
//! - Configuration and tracing setup for the `iris` binary

pub mod config;
pub mod error;
pub mod inter;
pub mod numeric;
pub mod runtime;
pub mod stdlib;

use std::sync::Once;

pub use config::Config;
pub use error::{RunError, Stage};
pub use inter::{Interpreter, Job};
pub use numeric::Number;
pub use runtime::{ARGV_NAME, Runtime, bind_argv};
pub use stdlib::{register_stdlib, standard_scope};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Enable with `RUST_LOG=iris=debug` or
/// `RUST_LOG=iris_runtime=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{EnvFilter, fmt, prelude::*};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
                .with(filter)
                .init();
        }
    });
}
