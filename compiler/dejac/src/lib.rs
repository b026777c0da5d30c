//! Deja Vu command-line driver.
//!
//! The `deja` binary dispatches on argv (see `main.rs`); the command
//! handlers live here so they can be exercised without spawning a process.

pub mod commands;
mod loader;

pub use loader::FileLoader;

use deja_ir::Span;
use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Enable with `RUST_LOG=deja_eval=debug`, or
/// `RUST_LOG=deja_eval=trace` to see every machine step.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}

/// `path:line:col` for a span, or just `path` when there is no span.
pub fn location(path: &str, source: &str, span: Option<Span>) -> String {
    match span {
        Some(span) => {
            let (line, col) = span.line_col(source);
            format!("{path}:{line}:{col}")
        }
        None => path.to_string(),
    }
}
