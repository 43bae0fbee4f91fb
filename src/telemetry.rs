//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Installs the global fmt subscriber.
///
/// `RUST_LOG` wins over `config.log_level` when both are present. Calling
/// this twice is harmless: the second install fails silently.
pub fn init(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let _ = if config.log_format == "json" {
        builder
            .json()
            .with_target(false)
            .with_ansi(false)
            .try_init()
    } else {
        builder.with_target(false).try_init()
    };
}
