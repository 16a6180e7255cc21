//! The built-in `exit` command.

use crate::parsers::{ParseError, ValueType};

/// Name under which the built-in exit command is registered.
pub const EXIT_COMMAND: &str = "exit";

/// How the built-in `exit` command treats its argument string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExitPolicy {
    /// Ignore the argument and exit with status 0.
    #[default]
    IgnoreArguments,
    /// Read the argument as an optional integer exit status. An empty
    /// argument means 0.
    StatusCode,
}

impl ExitPolicy {
    /// Interprets the argument string of an `exit` request.
    ///
    /// # Errors
    ///
    /// Under [`ExitPolicy::StatusCode`], returns [`ParseError::Conversion`]
    /// when the argument is not an `i32`.
    pub fn request(self, arguments: &str) -> Result<ExitRequest, ParseError> {
        match self {
            Self::IgnoreArguments => Ok(ExitRequest::success()),
            Self::StatusCode => {
                let trimmed = arguments.trim();
                if trimmed.is_empty() {
                    return Ok(ExitRequest::success());
                }
                trimmed
                    .parse::<i32>()
                    .map(ExitRequest::new)
                    .map_err(|error| {
                        ParseError::conversion(arguments, ValueType::Int, error.to_string())
                    })
            }
        }
    }
}

/// Termination requested by the engine through `exit`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExitRequest {
    status: i32,
}

impl ExitRequest {
    /// Exit with `status`.
    #[must_use]
    pub const fn new(status: i32) -> Self {
        Self { status }
    }

    /// Exit with status 0.
    #[must_use]
    pub const fn success() -> Self {
        Self::new(0)
    }

    /// Requested process exit status.
    #[must_use]
    pub const fn status(self) -> i32 {
        self.status
    }
}
