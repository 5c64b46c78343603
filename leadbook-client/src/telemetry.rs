//! Tracing subscriber initialisation.

use crate::config::{LogFormat, LoggingConfig};
use crate::error::ClientResult;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("Invalid log filter '{filter}': {source}")]
    InvalidFilter {
        filter: String,
        #[source]
        source: ParseError,
    },
    #[error("Failed to init subscriber: {0}")]
    Init(#[from] TryInitError),
}

/// Install the global subscriber. `RUST_LOG` wins over the configured
/// filter. Logs go to stderr so command output stays clean.
pub fn init_tracing(config: &LoggingConfig) -> ClientResult<()> {
    let env_filter = build_filter(std::env::var("RUST_LOG").ok().as_deref(), &config.filter)?;

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = match config.format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init(),
    };
    result.map_err(TelemetryError::from)?;

    tracing::debug!(format = ?config.format, "tracing initialized");
    Ok(())
}

/// Filter from the environment directives when they parse, otherwise from
/// the configured ones.
pub fn build_filter(env: Option<&str>, configured: &str) -> Result<EnvFilter, TelemetryError> {
    if let Some(filter) = env.and_then(|directives| EnvFilter::try_new(directives).ok()) {
        return Ok(filter);
    }
    EnvFilter::try_new(configured).map_err(|source| TelemetryError::InvalidFilter {
        filter: configured.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_filter_applies_without_env() {
        let filter = build_filter(None, "leadbook=debug").unwrap();
        assert!(filter.to_string().contains("leadbook=debug"));
    }

    #[test]
    fn env_directives_win() {
        let filter = build_filter(Some("warn"), "leadbook=debug").unwrap();
        let directives = filter.to_string();
        assert!(directives.contains("warn"));
        assert!(!directives.contains("leadbook"));
    }

    #[test]
    fn invalid_configured_filter_is_typed() {
        let err = build_filter(None, "leadbook=loud").unwrap_err();
        assert!(matches!(err, TelemetryError::InvalidFilter { ref filter, .. } if filter == "leadbook=loud"));
    }

    #[test]
    fn unparsable_env_falls_back_to_config() {
        assert!(build_filter(Some("leadbook=loud"), "info").is_ok());
    }
}
