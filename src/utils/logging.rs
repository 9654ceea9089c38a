use anyhow::Error;
use tracing::span::Span;

/// Logs errors which end the handling of an event inside the span of that event.
pub trait LogError {
    fn log_error(&self, error: Error);
}

impl LogError for Span {
    fn log_error(&self, error: Error) {
        self.in_scope(|| {
            tracing::error!("Error: {error:?}");
        });
    }
}

/// Installs a global `tracing` subscriber writing to stderr.
///
/// The verbosity is taken from the `RUST_LOG` environment variable and defaults to `info`.
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
