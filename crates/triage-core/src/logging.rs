//! Tracing subscriber setup.

use std::sync::OnceLock;

use tracing_subscriber::EnvFilter;

use crate::config::EngineConfig;

/// Directives of the subscriber installed by this crate, if any.
static ACTIVE_FILTER: OnceLock<String> = OnceLock::new();

/// Install a global fmt subscriber. A valid `RUST_LOG` wins over
/// `default_filter`.
///
/// Returns `false` if a subscriber was already installed.
pub fn init_logging(default_filter: &str) -> bool {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV)
        .ok()
        .filter(|env| EnvFilter::try_new(env).is_ok())
        .unwrap_or_else(|| default_filter.to_string());

    let installed = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&directives))
        .try_init()
        .is_ok();
    if installed {
        let _ = ACTIVE_FILTER.set(directives);
    }
    installed
}

/// Install the subscriber using `config.log_filter` as the default.
pub fn init_logging_from_config(config: &EngineConfig) -> bool {
    init_logging(&config.log_filter)
}

/// Filter directives in effect, when this crate installed the subscriber.
pub fn active_filter() -> Option<&'static str> {
    ACTIVE_FILTER.get().map(String::as_str)
}
