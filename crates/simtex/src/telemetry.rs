//! Process-wide `tracing` subscriber for the bridge.
//!
//! Events always go to stderr: the engine captures stdout into the build log.

use std::io::{self, IsTerminal};

use once_cell::sync::OnceCell;
use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::UtcTime;

use simtex_config::{Config, LogFormat};

static INSTALLED: OnceCell<TelemetryHandle> = OnceCell::new();

/// Proof that the global subscriber is in place.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TelemetryHandle;

/// Reasons the subscriber could not be installed.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// `log_filter` is not a valid `EnvFilter` directive list.
    #[error("invalid log filter '{filter}': {message}")]
    Filter {
        /// Expression taken from the configuration.
        filter: String,
        /// Parser message.
        message: String,
    },
    /// A subscriber was installed by someone else first.
    #[error("another tracing subscriber is already installed: {0}")]
    Subscriber(SetGlobalDefaultError),
}

/// Installs the subscriber described by `config` on the first call. Later
/// calls keep the first subscriber and ignore their configuration.
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] for an invalid filter expression and
/// [`TelemetryError::Subscriber`] when a foreign subscriber is installed.
pub fn initialise(config: &Config) -> Result<TelemetryHandle, TelemetryError> {
    INSTALLED.get_or_try_init(|| install(config)).copied()
}

fn parse_filter(expression: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(expression).map_err(|error| TelemetryError::Filter {
        filter: expression.to_owned(),
        message: error.to_string(),
    })
}

fn install(config: &Config) -> Result<TelemetryHandle, TelemetryError> {
    let filter = parse_filter(config.log_filter())?;
    let format = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(true)
        .with_timer(UtcTime::rfc_3339());

    let installed = match config.log_format() {
        LogFormat::Json => tracing::subscriber::set_global_default(
            format.json().flatten_event(true).finish(),
        ),
        LogFormat::Compact => tracing::subscriber::set_global_default(format.compact().finish()),
    };
    installed
        .map(|()| TelemetryHandle)
        .map_err(TelemetryError::Subscriber)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("simtex=notalevel")]
    #[case("simtex::dispatch=loud")]
    fn invalid_filters_are_rejected(#[case] expression: &str) {
        let error = parse_filter(expression).expect_err("invalid filter");
        assert!(matches!(
            error,
            TelemetryError::Filter { ref filter, .. } if filter == expression
        ));
    }

    #[test]
    fn initialisation_is_idempotent() {
        let first = initialise(&Config::default()).expect("first initialisation");
        let compact = Config {
            log_format: LogFormat::Compact,
            ..Config::default()
        };
        assert_eq!(initialise(&compact).expect("second initialisation"), first);
    }
}
