use tracing_subscriber::{fmt, EnvFilter};

use crate::settings::LoggingConfig;

/// Install a global fmt subscriber. `RUST_LOG` overrides the configured
/// level. Returns false when a subscriber was already installed.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_str()));
    fmt().with_env_filter(filter).with_target(true).try_init().is_ok()
}
