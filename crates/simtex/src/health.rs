//! Lifecycle events of a bridge run, from bootstrap to the end of the
//! session.

use simtex_config::{Config, Endpoint};

use crate::bootstrap::BootstrapError;
use crate::registry::ExitRequest;

const HEALTH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::health");

/// Receives the milestones of a bridge run.
pub trait HealthReporter: Send + Sync {
    /// The bridge is about to load its configuration.
    fn starting(&self);

    /// The handshake was read and the transport opened.
    fn connected(&self, config: &Config, endpoint: &Endpoint);

    /// Bootstrap or the session stopped with `error`.
    fn failed(&self, error: &BootstrapError);

    /// The engine sent `exit` after `served` answered requests.
    fn session_ended(&self, request: ExitRequest, served: u64);
}

/// Reporter emitting each milestone as a `tracing` event under the
/// `simtex::health` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredHealthReporter;

impl StructuredHealthReporter {
    /// Creates the reporter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl HealthReporter for StructuredHealthReporter {
    fn starting(&self) {
        tracing::info!(target: HEALTH_TARGET, event = "starting", "bridge starting");
    }

    fn connected(&self, config: &Config, endpoint: &Endpoint) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "connected",
            %endpoint,
            transport = %config.transport(),
            read_timeout = ?config.read_timeout(),
            max_message_bytes = config.max_message_bytes(),
            "bridge connected to engine"
        );
    }

    fn failed(&self, error: &BootstrapError) {
        tracing::error!(
            target: HEALTH_TARGET,
            event = "failed",
            error = %error,
            "bridge stopped"
        );
    }

    fn session_ended(&self, request: ExitRequest, served: u64) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "session_ended",
            status = request.status(),
            served,
            "engine closed the session"
        );
    }
}
