//! Shared configuration for the SiMTeX bridge.
//!
//! Configuration is layered by [`ortho_config`]: built-in defaults, an
//! optional configuration file (`--config-path` or `SIMTEX_CONFIG_PATH`),
//! `SIMTEX_*` environment variables, and finally command-line flags. The
//! handshake that names the transport endpoint is not part of the layered
//! configuration: it arrives on standard input once the bridge starts, and
//! [`Config::transport`] only decides how its two lines are interpreted.

mod defaults;
mod logging;
mod transport;

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use defaults::{
    DEFAULT_LOG_FILTER, DEFAULT_MAX_MESSAGE_BYTES, DEFAULT_POLL_INTERVAL_MS,
    DEFAULT_READ_TIMEOUT_SECS, default_log_filter, default_log_filter_string, default_log_format,
    default_transport,
};
pub use logging::{LogFormat, LogFormatParseError};
pub use transport::{Endpoint, HandshakeError, Role, TransportKind, TransportKindParseError};

/// Resolved bridge configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, OrthoConfig)]
#[ortho_config(prefix = "SIMTEX")]
pub struct Config {
    /// `tracing` filter expression applied to bridge telemetry.
    #[ortho_config(default = defaults::default_log_filter_string())]
    pub log_filter: String,
    /// Output format for telemetry written to stderr.
    #[ortho_config(default = defaults::default_log_format())]
    pub log_format: LogFormat,
    /// How the two handshake lines read from stdin are interpreted.
    #[ortho_config(default = defaults::default_transport())]
    pub transport: TransportKind,
    /// Longest read stall tolerated before the channel gives up, in seconds.
    /// Zero disables the timeout.
    #[ortho_config(default = defaults::DEFAULT_READ_TIMEOUT_SECS)]
    pub read_timeout_secs: u64,
    /// Pause between polls of an idle file transport, in milliseconds.
    #[ortho_config(default = defaults::DEFAULT_POLL_INTERVAL_MS)]
    pub poll_interval_ms: u64,
    /// Largest payload accepted from the engine, in bytes.
    #[ortho_config(default = defaults::DEFAULT_MAX_MESSAGE_BYTES)]
    pub max_message_bytes: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: defaults::default_log_filter_string(),
            log_format: defaults::default_log_format(),
            transport: defaults::default_transport(),
            read_timeout_secs: defaults::DEFAULT_READ_TIMEOUT_SECS,
            poll_interval_ms: defaults::DEFAULT_POLL_INTERVAL_MS,
            max_message_bytes: defaults::DEFAULT_MAX_MESSAGE_BYTES,
        }
    }
}

impl Config {
    /// Filter expression for the telemetry subscriber.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Telemetry output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Transport named by the handshake.
    #[must_use]
    pub const fn transport(&self) -> TransportKind {
        self.transport
    }

    /// Maximum read stall, or `None` when reads may block forever.
    #[must_use]
    pub const fn read_timeout(&self) -> Option<Duration> {
        if self.read_timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.read_timeout_secs))
        }
    }

    /// Pause between polls of an idle file transport.
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Largest payload accepted from the engine.
    #[must_use]
    pub const fn max_message_bytes(&self) -> u32 {
        self.max_message_bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_documented_defaults() {
        let config = Config::default();
        assert_eq!(config.log_filter(), "info");
        assert_eq!(config.log_format(), LogFormat::Json);
        assert_eq!(config.transport(), TransportKind::FilePair);
        assert_eq!(config.read_timeout(), Some(Duration::from_secs(10)));
        assert_eq!(config.poll_interval(), Duration::from_millis(10));
        assert_eq!(config.max_message_bytes(), 64 * 1024 * 1024);
    }

    #[test]
    fn zero_timeout_disables_read_timeout() {
        let config = Config {
            read_timeout_secs: 0,
            ..Config::default()
        };
        assert_eq!(config.read_timeout(), None);
    }
}
