use crate::logging::LogFormat;
use crate::transport::TransportKind;

/// Default log filter expression used by the bridge.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default maximum read stall, matching the engine's own patience.
pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 10;

/// Default pause between polls of an idle file transport.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 10;

/// Default ceiling for incoming payloads (64 MiB).
pub const DEFAULT_MAX_MESSAGE_BYTES: u32 = 64 * 1024 * 1024;

/// Default log filter expression used by the bridge.
#[must_use]
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the bridge.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Json
}

/// Default handshake interpretation: the engine hands over two file paths.
#[must_use]
pub const fn default_transport() -> TransportKind {
    TransportKind::FilePair
}
