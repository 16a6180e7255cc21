//! Per-request dispatch failures.
//!
//! Every variant is recoverable: the loop reports it to the engine as an
//! `error` response and waits for the next command.

use std::backtrace::{Backtrace, BacktraceStatus};
use std::fmt;

use thiserror::Error;

use crate::parsers::ParseError;

/// Classification reported at the top of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No command with the requested name is registered.
    UnknownCommand,
    /// The argument string had the wrong number of tokens.
    ArityMismatch,
    /// A token could not be converted to its parameter type.
    ConversionError,
    /// The handler returned an error or panicked.
    HandlerFailure,
}

impl ErrorKind {
    /// Name used in diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UnknownCommand => "UnknownCommand",
            Self::ArityMismatch => "ArityMismatch",
            Self::ConversionError => "ConversionError",
            Self::HandlerFailure => "HandlerFailure",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Errors surfaced while resolving, parsing or invoking a command.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Command name is not registered.
    #[error("unknown command '{name}'")]
    UnknownCommand {
        /// Requested name.
        name: String,
    },

    /// The parser rejected the argument string.
    #[error("invalid arguments for '{command}'")]
    InvalidArguments {
        /// Command being invoked.
        command: String,
        /// Parser failure.
        #[source]
        source: ParseError,
    },

    /// The handler returned an error.
    #[error("command '{command}' failed")]
    HandlerFailure {
        /// Command being invoked.
        command: String,
        /// Error returned by the handler, with its context chain.
        #[source]
        source: anyhow::Error,
        /// Call stack captured with the error, or where the handler returned
        /// it when the error carries none.
        call_stack: String,
    },

    /// The handler panicked.
    #[error("command '{command}' panicked: {message}")]
    HandlerPanic {
        /// Command being invoked.
        command: String,
        /// Panic payload, when it was a string.
        message: String,
        /// Source position of the panic.
        location: Option<String>,
        /// Call stack at the panic site.
        call_stack: String,
    },
}

impl DispatchError {
    /// Creates an unknown-command error.
    #[must_use]
    pub fn unknown_command(name: impl Into<String>) -> Self {
        Self::UnknownCommand { name: name.into() }
    }

    /// Wraps a parser failure.
    #[must_use]
    pub fn invalid_arguments(command: impl Into<String>, source: ParseError) -> Self {
        Self::InvalidArguments {
            command: command.into(),
            source,
        }
    }

    /// Wraps a handler error. The backtrace `source` captured is kept;
    /// otherwise one is taken here.
    #[must_use]
    pub fn handler_failure(command: impl Into<String>, source: anyhow::Error) -> Self {
        let captured = source.backtrace();
        let call_stack = if captured.status() == BacktraceStatus::Captured {
            captured.to_string()
        } else {
            Backtrace::force_capture().to_string()
        };
        Self::HandlerFailure {
            command: command.into(),
            source,
            call_stack,
        }
    }

    /// Records a handler panic raised at `location` with `call_stack`.
    #[must_use]
    pub fn handler_panic(
        command: impl Into<String>,
        message: impl Into<String>,
        location: Option<String>,
        call_stack: impl Into<String>,
    ) -> Self {
        Self::HandlerPanic {
            command: command.into(),
            message: message.into(),
            location,
            call_stack: call_stack.into(),
        }
    }

    /// Call stack recorded for handler errors and panics.
    #[must_use]
    pub fn call_stack(&self) -> Option<&str> {
        match self {
            Self::HandlerFailure { call_stack, .. } | Self::HandlerPanic { call_stack, .. } => {
                Some(call_stack.as_str())
            }
            Self::UnknownCommand { .. } | Self::InvalidArguments { .. } => None,
        }
    }

    /// Source position of a handler panic.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        match self {
            Self::HandlerPanic { location, .. } => location.as_deref(),
            _ => None,
        }
    }

    /// Classification for the diagnostic header.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownCommand { .. } => ErrorKind::UnknownCommand,
            Self::InvalidArguments {
                source: ParseError::ArityMismatch { .. },
                ..
            } => ErrorKind::ArityMismatch,
            Self::InvalidArguments {
                source: ParseError::Conversion { .. },
                ..
            } => ErrorKind::ConversionError,
            Self::HandlerFailure { .. } | Self::HandlerPanic { .. } => ErrorKind::HandlerFailure,
        }
    }
}
