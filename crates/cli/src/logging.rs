//! Logging setup for CLI commands.

/// Console logging, level controlled by `RUST_LOG` (defaults to `info`).
pub fn init_cli_logging() {
  tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
    .init();
}
