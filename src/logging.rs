use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

const DEFAULT_FILTER: &str = "info,pickwise=debug";

/// Build the filter: `RUST_LOG` wins, then the configured level, then the default.
fn filter_for(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Console logging for interactive commands.
///
/// Safe to call more than once; later calls are ignored.
pub fn init(config: &LoggingConfig) {
    let filter = filter_for(config);

    let _ = if config.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .with_writer(std::io::stderr)
            .try_init()
    };
}

pub fn init_simple() {
    // Warnings only, for scripted use
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_writer(std::io::stderr)
        .try_init();
}
