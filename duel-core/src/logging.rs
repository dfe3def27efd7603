//! Log subscriber setup for the binaries.

use tracing_subscriber::EnvFilter;

/// Filter applied when `RUST_LOG` is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Installs a `fmt` subscriber filtered by `RUST_LOG`.
///
/// Logs go to stderr so the console report on stdout stays clean. Calling
/// this more than once is harmless; later calls keep the first subscriber.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_twice_is_harmless() {
        init();
        init();
        tracing::info!("logging initialized");
    }
}
