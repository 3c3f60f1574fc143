//! Logging setup
//!
//! `tracing` events go to stderr through a `fmt` subscriber. `RUST_LOG`
//! overrides the default filter.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter directive when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "zephyr_core=info,zephyr_bench=info";

/// Install the global subscriber with [`DEFAULT_FILTER`]
pub fn init() {
    init_with(DEFAULT_FILTER);
}

/// Install the global subscriber with a custom default filter
///
/// A second call is a no-op, so tests may call it freely.
pub fn init_with(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice() {
        init_with("zephyr_core=debug");
        init();
        tracing::debug!("subscriber installed");
    }
}
