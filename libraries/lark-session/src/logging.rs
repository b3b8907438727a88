//! Tracing subscriber setup

use crate::config::LoggingSettings;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber
///
/// `RUST_LOG` wins over the configured filter. Returns `false` if a global
/// subscriber was already installed, which leaves the existing one in place.
pub fn init_logging(settings: &LoggingSettings) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.filter));

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!("Logging initialized with filter {:?}", settings.filter);
    }
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_harmless() {
        let settings = LoggingSettings {
            filter: "lark=debug".to_string(),
        };
        init_logging(&settings);
        assert!(!init_logging(&settings));
    }
}
