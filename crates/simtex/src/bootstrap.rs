//! Bridge bootstrap orchestration: configuration, telemetry, handshake,
//! transport, then the dispatch loop.

use std::io::{self, BufRead};
use std::process::ExitCode;
use std::sync::Arc;

use ortho_config::{OrthoConfig, OrthoError};
use simtex_config::{Config, Endpoint};
use thiserror::Error;

use crate::channel::{ChannelError, ChannelOptions};
use crate::dispatch::{DispatchLoop, Dispatcher};
use crate::health::{HealthReporter, StructuredHealthReporter};
use crate::registry::{ExitRequest, Registry};
use crate::telemetry::{self, TelemetryError, TelemetryHandle};
use crate::transport::{self, TransportChannel, TransportError};

/// Source of the bridge [`Config`].
pub trait ConfigLoader: Send + Sync {
    /// Loads the bridge configuration.
    ///
    /// # Errors
    ///
    /// Returns the loader's error when a configuration layer is invalid.
    fn load(&self) -> Result<Config, Arc<OrthoError>>;
}

/// Loader that delegates to [`Config::load`]: defaults, configuration file,
/// `SIMTEX_*` environment variables and command-line flags.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemConfigLoader;

impl ConfigLoader for SystemConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Config::load()
    }
}

/// Loader returning a fixed configuration.
#[derive(Debug, Clone)]
pub struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    /// Wraps `config`.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Ok(self.config.clone())
    }
}

/// Errors that stop the bridge.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// A configuration layer was invalid.
    #[error("invalid bridge configuration: {source}")]
    Configuration {
        /// Error reported by the loader.
        #[source]
        source: Arc<OrthoError>,
    },
    /// The `tracing` subscriber could not be installed.
    #[error("cannot set up logging: {source}")]
    Telemetry {
        /// Error reported by the subscriber setup.
        #[source]
        source: TelemetryError,
    },
    /// The handshake could not be read or the transport could not be opened
    /// or closed.
    #[error("transport failure: {source}")]
    Transport {
        /// Underlying transport error.
        #[source]
        source: TransportError,
    },
    /// The channel failed while serving requests.
    #[error("dispatch session failed: {source}")]
    Session {
        /// Underlying channel error.
        #[source]
        source: ChannelError,
    },
}

/// A connected bridge, ready to serve.
pub struct Bridge {
    config: Config,
    endpoint: Endpoint,
    channel: TransportChannel,
    telemetry: TelemetryHandle,
    reporter: Arc<dyn HealthReporter>,
}

impl Bridge {
    /// Configuration the bridge runs with.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Endpoint named by the handshake.
    #[must_use]
    pub const fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Handle proving that logging is installed.
    #[must_use]
    pub const fn telemetry(&self) -> TelemetryHandle {
        self.telemetry
    }

    /// Serves requests until the engine sends `exit`, then closes the
    /// transport. The transport is closed on failure too.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::Session`] when the channel fails and
    /// [`BootstrapError::Transport`] when closing the transport fails.
    pub fn serve(self, registry: Registry) -> Result<ExitRequest, BootstrapError> {
        let Self {
            channel, reporter, ..
        } = self;
        let mut dispatch_loop = DispatchLoop::new(channel, Dispatcher::new(registry));
        let outcome = dispatch_loop.run();
        let served = dispatch_loop.served();
        let closed = transport::close(dispatch_loop.into_channel());

        let result = outcome
            .map_err(|source| BootstrapError::Session { source })
            .and_then(|request| {
                closed
                    .map(|()| request)
                    .map_err(|source| BootstrapError::Transport { source })
            });
        match result {
            Ok(request) => {
                reporter.session_ended(request, served);
                Ok(request)
            }
            Err(error) => {
                reporter.failed(&error);
                Err(error)
            }
        }
    }
}

/// Bootstraps the bridge: loads configuration, installs telemetry, reads the
/// handshake from `handshake` and opens the transport it names.
///
/// # Errors
///
/// Returns a [`BootstrapError`] for the first step that fails. The failure
/// is also passed to `reporter`.
pub fn bootstrap_with<R: BufRead>(
    loader: &dyn ConfigLoader,
    reporter: Arc<dyn HealthReporter>,
    handshake: R,
) -> Result<Bridge, BootstrapError> {
    reporter.starting();
    match connect(loader, handshake) {
        Ok((config, telemetry, endpoint, channel)) => {
            reporter.connected(&config, &endpoint);
            Ok(Bridge {
                config,
                endpoint,
                channel,
                telemetry,
                reporter,
            })
        }
        Err(error) => {
            reporter.failed(&error);
            Err(error)
        }
    }
}

fn connect<R: BufRead>(
    loader: &dyn ConfigLoader,
    handshake: R,
) -> Result<(Config, TelemetryHandle, Endpoint, TransportChannel), BootstrapError> {
    let config = loader
        .load()
        .map_err(|source| BootstrapError::Configuration { source })?;
    let telemetry =
        telemetry::initialise(&config).map_err(|source| BootstrapError::Telemetry { source })?;
    let endpoint = transport::read_handshake(handshake, config.transport())
        .map_err(|source| BootstrapError::Transport { source })?;
    let channel = transport::connect(&endpoint, ChannelOptions::from(&config))
        .map_err(|source| BootstrapError::Transport { source })?;
    Ok((config, telemetry, endpoint, channel))
}

/// Runs the bridge with `registry` and system collaborators: configuration
/// from the environment and command line, the handshake from standard
/// input, lifecycle events through `tracing`.
///
/// Returns the status requested by `exit`, or failure when the bridge could
/// not start or the connection broke.
#[must_use]
pub fn run(registry: Registry) -> ExitCode {
    let reporter: Arc<dyn HealthReporter> = Arc::new(StructuredHealthReporter::new());
    run_with(&SystemConfigLoader, reporter, io::stdin().lock(), registry)
}

/// [`run`] with explicit collaborators.
#[must_use]
pub fn run_with<R: BufRead>(
    loader: &dyn ConfigLoader,
    reporter: Arc<dyn HealthReporter>,
    handshake: R,
    registry: Registry,
) -> ExitCode {
    let served = bootstrap_with(loader, reporter, handshake).and_then(|bridge| bridge.serve(registry));
    match served {
        Ok(request) => exit_code(request),
        Err(_) => ExitCode::FAILURE,
    }
}

/// Process exit code for `request`. Statuses outside `0..=255` map to
/// failure.
#[must_use]
pub fn exit_code(request: ExitRequest) -> ExitCode {
    u8::try_from(request.status()).map_or(ExitCode::FAILURE, ExitCode::from)
}
