//! Errors raised while turning an argument string into typed values.

use std::fmt;

use thiserror::Error;

use super::value::ValueType;

/// Number of tokens a parser accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly this many tokens.
    Exactly(usize),
    /// This many tokens or more.
    AtLeast(usize),
}

impl Arity {
    /// Returns `true` when `count` tokens satisfy this arity.
    #[must_use]
    pub const fn accepts(self, count: usize) -> bool {
        match self {
            Self::Exactly(expected) => count == expected,
            Self::AtLeast(minimum) => count >= minimum,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exactly(expected) => write!(formatter, "exactly {expected}"),
            Self::AtLeast(minimum) => write!(formatter, "at least {minimum}"),
        }
    }
}

/// Errors surfaced by input parsers.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The token count did not match the parser's expectation.
    #[error("expected {expected} value(s), got {actual}")]
    ArityMismatch {
        /// Accepted token count.
        expected: Arity,
        /// Token count received.
        actual: usize,
    },
    /// A token could not be converted to its target type.
    #[error("cannot convert '{token}' to {target}: {reason}")]
    Conversion {
        /// Offending token.
        token: String,
        /// Type the token was converted to.
        target: ValueType,
        /// Why the conversion failed.
        reason: String,
    },
}

impl ParseError {
    /// Creates an arity mismatch error.
    #[must_use]
    pub const fn arity(expected: Arity, actual: usize) -> Self {
        Self::ArityMismatch { expected, actual }
    }

    /// Creates a conversion error.
    #[must_use]
    pub fn conversion(
        token: impl Into<String>,
        target: ValueType,
        reason: impl Into<String>,
    ) -> Self {
        Self::Conversion {
            token: token.into(),
            target,
            reason: reason.into(),
        }
    }
}
