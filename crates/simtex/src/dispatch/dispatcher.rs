//! Resolution, parsing and invocation of a single request.

use tracing::{debug, warn};

use super::DISPATCH_TARGET;
use super::diagnostic::Diagnostic;
use super::errors::DispatchError;
use super::panics;
use crate::parsers::{Arguments, InputParser};
use crate::registry::{ExitRequest, Handler, Registry, Target};

/// Status payload preceding a successful result.
pub const STATUS_SUCCESS: &str = "success";
/// Status payload preceding a diagnostic.
pub const STATUS_ERROR: &str = "error";

/// Response to one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The handler returned; carries its displayed result.
    Success(String),
    /// The request failed; carries the report.
    Error(Diagnostic),
}

impl Outcome {
    /// Status message sent first.
    #[must_use]
    pub const fn status(&self) -> &'static str {
        match self {
            Self::Success(_) => STATUS_SUCCESS,
            Self::Error(_) => STATUS_ERROR,
        }
    }

    /// Payload sent after the status.
    #[must_use]
    pub fn payload(&self) -> String {
        match self {
            Self::Success(result) => result.clone(),
            Self::Error(diagnostic) => diagnostic.render(),
        }
    }

    /// Returns `true` for a successful outcome.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// What the loop does after a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Send the outcome and wait for the next request.
    Respond(Outcome),
    /// Stop without responding.
    Exit(ExitRequest),
}

/// Serves requests against a registry.
#[derive(Debug, Default)]
pub struct Dispatcher {
    registry: Registry,
}

impl Dispatcher {
    /// Creates a dispatcher owning `registry`.
    #[must_use]
    pub const fn new(registry: Registry) -> Self {
        Self { registry }
    }

    /// Commands available to the engine.
    #[must_use]
    pub const fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Serves one request. Failures never escape: they become an
    /// [`Outcome::Error`].
    #[must_use]
    pub fn dispatch(&self, command: &str, arguments: &str) -> Step {
        match self.execute(command, arguments) {
            Ok(step) => step,
            Err(error) => {
                warn!(
                    target: DISPATCH_TARGET,
                    command,
                    kind = %error.kind(),
                    error = %error,
                    "request failed"
                );
                Step::Respond(Outcome::Error(Diagnostic::from_error(
                    &error, command, arguments,
                )))
            }
        }
    }

    fn execute(&self, command: &str, arguments: &str) -> Result<Step, DispatchError> {
        let entry = self.registry.resolve(command)?;
        match entry.target() {
            Target::Exit(policy) => policy
                .request(arguments)
                .map(Step::Exit)
                .map_err(|source| DispatchError::invalid_arguments(command, source)),
            Target::Function { handler, parser } => {
                let parsed = parse(parser, command, arguments)?;
                debug!(
                    target: DISPATCH_TARGET,
                    command,
                    count = parsed.len(),
                    "invoking handler"
                );
                invoke(handler, command, parsed).map(|result| Step::Respond(Outcome::Success(result)))
            }
        }
    }
}

fn parse(
    parser: &dyn InputParser,
    command: &str,
    arguments: &str,
) -> Result<Arguments, DispatchError> {
    parser
        .parse(arguments)
        .map_err(|source| DispatchError::invalid_arguments(command, source))
}

fn invoke(handler: &dyn Handler, command: &str, arguments: Arguments) -> Result<String, DispatchError> {
    match panics::catch(|| handler.call(arguments)) {
        Ok(Ok(result)) => Ok(result),
        Ok(Err(source)) => Err(DispatchError::handler_failure(command, source)),
        Err(report) => Err(DispatchError::handler_panic(
            command,
            report.message,
            report.location,
            report.backtrace,
        )),
    }
}
