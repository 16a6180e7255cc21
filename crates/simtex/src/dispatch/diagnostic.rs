//! Error reports returned to the engine.
//!
//! The engine typesets the payload of an `error` response verbatim, so the
//! report is wrapped in a `lstlisting` environment with line breaking
//! enabled, surrounded by blank lines.

use std::error::Error as _;
use std::fmt;

use super::errors::{DispatchError, ErrorKind};

const LISTING_BEGIN: &str = "\\begin{lstlisting}[breaklines=true]";
const LISTING_END: &str = "\\end{lstlisting}";
const LISTING_END_DEFANGED: &str = "\\end {lstlisting}";

/// Structured description of a failed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    kind: ErrorKind,
    message: String,
    command: String,
    arguments: String,
    causes: Vec<String>,
    location: Option<String>,
    backtrace: Option<String>,
}

impl Diagnostic {
    /// Describes `error` raised while serving `command` with `arguments`.
    #[must_use]
    pub fn from_error(error: &DispatchError, command: &str, arguments: &str) -> Self {
        let mut causes = Vec::new();
        let mut source = error.source();
        while let Some(cause) = source {
            causes.push(cause.to_string());
            source = cause.source();
        }
        Self {
            kind: error.kind(),
            message: error.to_string(),
            command: command.to_owned(),
            arguments: arguments.to_owned(),
            causes,
            location: error.location().map(str::to_owned),
            backtrace: error.call_stack().map(str::to_owned),
        }
    }

    /// Failure classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Top-level error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Command being served.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Argument string received.
    #[must_use]
    pub fn arguments(&self) -> &str {
        &self.arguments
    }

    /// Underlying causes, outermost first.
    #[must_use]
    pub fn causes(&self) -> &[String] {
        &self.causes
    }

    /// Where a panicking handler stopped.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Call stack of a handler failure.
    #[must_use]
    pub fn backtrace(&self) -> Option<&str> {
        self.backtrace.as_deref()
    }

    /// Plain-text report without the listing wrapper.
    #[must_use]
    pub fn body(&self) -> String {
        let mut lines = vec![
            format!("{}: {}", self.kind, self.message),
            format!("command: {}", self.command),
            format!("arguments: {}", self.arguments),
        ];
        lines.extend(self.causes.iter().map(|cause| format!("caused by: {cause}")));
        if let Some(location) = &self.location {
            lines.push(format!("panicked at: {location}"));
        }
        if let Some(trace) = &self.backtrace {
            lines.push(format!("backtrace:\n{}", trace.trim_end()));
        }
        lines.join("\n")
    }

    /// Report wrapped for typesetting, ready to send as an `error` payload.
    #[must_use]
    pub fn render(&self) -> String {
        let body = self.body().replace(LISTING_END, LISTING_END_DEFANGED);
        format!("\n\n{LISTING_BEGIN}\n{body}\n{LISTING_END}\n\n")
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.render())
    }
}
