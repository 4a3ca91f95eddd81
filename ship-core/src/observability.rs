//! Tracing setup

use tracing_subscriber::EnvFilter;

use crate::{config::Config, error::Result};

/// Build the filter from `service.log_level`, falling back to `info`
fn env_filter(config: &Config) -> EnvFilter {
    EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install a JSON formatting subscriber for the process
///
/// Fails if a global subscriber is already installed.
pub fn init_tracing(config: &Config) -> Result<()> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(env_filter(config))
        .try_init()
        .map_err(|e| {
            crate::error::Error::Internal(format!("Failed to install tracing subscriber: {}", e))
        })?;

    tracing::info!(
        environment = %config.service.environment,
        "Tracing initialized for service: {}",
        config.service.name
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_level_falls_back_to_info() {
        let mut config = Config::default();
        config.service.log_level = "ship_core=loud".to_string();
        assert_eq!(env_filter(&config).to_string(), "info");
    }

    #[test]
    fn test_init_tracing_twice_fails() {
        let config = Config::default();
        let _ = init_tracing(&config);
        assert!(init_tracing(&config).is_err());
    }
}
