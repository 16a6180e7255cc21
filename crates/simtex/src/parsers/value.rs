//! Typed argument values handed to command handlers.

use std::fmt;

use thiserror::Error;

use super::errors::ParseError;

/// Target type of a string conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// The token unchanged.
    Text,
    /// A signed 64-bit integer.
    Int,
    /// A 64-bit float.
    Float,
    /// A boolean (`true/false`, `1/0`, `yes/no`, `on/off`).
    Bool,
}

impl ValueType {
    /// Returns the name used in diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
        }
    }

    /// Converts `token` into a value of this type.
    ///
    /// Text is passed through untouched. Numeric and boolean conversions
    /// ignore surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Conversion`] when the token is not a valid
    /// literal of this type.
    pub fn convert(self, token: &str) -> Result<Value, ParseError> {
        let trimmed = token.trim();
        match self {
            Self::Text => Ok(Value::Text(token.to_owned())),
            Self::Int => trimmed
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|error| ParseError::conversion(token, self, error.to_string())),
            Self::Float => trimmed
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|error| ParseError::conversion(token, self, error.to_string())),
            Self::Bool => parse_bool(trimmed)
                .map(Value::Bool)
                .ok_or_else(|| ParseError::conversion(token, self, "expected true or false")),
        }
    }
}

fn parse_bool(token: &str) -> Option<bool> {
    match token.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// A converted argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Text argument.
    Text(String),
    /// Integer argument.
    Int(i64),
    /// Float argument.
    Float(f64),
    /// Boolean argument.
    Bool(bool),
}

impl Value {
    /// Type of the carried value.
    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        match self {
            Self::Text(_) => ValueType::Text,
            Self::Int(_) => ValueType::Int,
            Self::Float(_) => ValueType::Float,
            Self::Bool(_) => ValueType::Bool,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => formatter.write_str(text),
            Self::Int(value) => write!(formatter, "{value}"),
            Self::Float(value) => write!(formatter, "{value}"),
            Self::Bool(value) => write!(formatter, "{value}"),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Errors raised when a handler reads its arguments.
///
/// These surface at call time, after parsing succeeded, and are reported as
/// handler failures.
#[derive(Debug, Error, PartialEq)]
pub enum ArgumentError {
    /// The handler asked for a position the parser did not produce.
    #[error("missing argument {index}: only {len} argument(s) were supplied")]
    Missing {
        /// Requested position.
        index: usize,
        /// Number of arguments available.
        len: usize,
    },
    /// The value at a position had a different type.
    #[error("argument {index} is {actual}, expected {expected}")]
    WrongType {
        /// Requested position.
        index: usize,
        /// Type the handler asked for.
        expected: ValueType,
        /// Type the parser produced.
        actual: ValueType,
    },
    /// The handler expected a different number of arguments.
    #[error("expected {expected} argument(s), got {actual}")]
    Count {
        /// Number of arguments the handler accepts.
        expected: usize,
        /// Number of arguments supplied.
        actual: usize,
    },
}

/// Ordered arguments produced by a parser.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    values: Vec<Value>,
}

impl Arguments {
    /// Wraps converted values.
    #[must_use]
    pub const fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Number of arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` when no arguments were produced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Iterates over the values in order.
    #[must_use]
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.values.iter()
    }

    /// Borrows the values as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Value] {
        &self.values
    }

    /// Consumes the arguments, returning the values.
    #[must_use]
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    /// Fails unless exactly `expected` arguments are present.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::Count`] on a mismatch.
    pub fn expect_len(&self, expected: usize) -> Result<(), ArgumentError> {
        if self.values.len() == expected {
            Ok(())
        } else {
            Err(ArgumentError::Count {
                expected,
                actual: self.values.len(),
            })
        }
    }

    fn value(&self, index: usize) -> Result<&Value, ArgumentError> {
        self.values.get(index).ok_or(ArgumentError::Missing {
            index,
            len: self.values.len(),
        })
    }

    fn mismatch(&self, index: usize, expected: ValueType) -> ArgumentError {
        ArgumentError::WrongType {
            index,
            expected,
            actual: self
                .values
                .get(index)
                .map_or(ValueType::Text, Value::value_type),
        }
    }

    /// Text at `index`.
    ///
    /// # Errors
    ///
    /// Returns an [`ArgumentError`] when the position is missing or holds a
    /// different type.
    pub fn text(&self, index: usize) -> Result<&str, ArgumentError> {
        match self.value(index)? {
            Value::Text(text) => Ok(text),
            _ => Err(self.mismatch(index, ValueType::Text)),
        }
    }

    /// Integer at `index`.
    ///
    /// # Errors
    ///
    /// Returns an [`ArgumentError`] when the position is missing or holds a
    /// different type.
    pub fn int(&self, index: usize) -> Result<i64, ArgumentError> {
        match self.value(index)? {
            Value::Int(value) => Ok(*value),
            _ => Err(self.mismatch(index, ValueType::Int)),
        }
    }

    /// Float at `index`. Integers are widened.
    ///
    /// # Errors
    ///
    /// Returns an [`ArgumentError`] when the position is missing or holds a
    /// non-numeric type.
    #[expect(
        clippy::cast_precision_loss,
        reason = "integers are widened the way numeric handlers expect"
    )]
    pub fn float(&self, index: usize) -> Result<f64, ArgumentError> {
        match self.value(index)? {
            Value::Float(value) => Ok(*value),
            Value::Int(value) => Ok(*value as f64),
            _ => Err(self.mismatch(index, ValueType::Float)),
        }
    }

    /// Boolean at `index`.
    ///
    /// # Errors
    ///
    /// Returns an [`ArgumentError`] when the position is missing or holds a
    /// different type.
    pub fn boolean(&self, index: usize) -> Result<bool, ArgumentError> {
        match self.value(index)? {
            Value::Bool(value) => Ok(*value),
            _ => Err(self.mismatch(index, ValueType::Bool)),
        }
    }

    /// Every argument as a float, for variadic numeric handlers.
    ///
    /// # Errors
    ///
    /// Returns the first [`ArgumentError`] encountered.
    pub fn floats(&self) -> Result<Vec<f64>, ArgumentError> {
        (0..self.values.len()).map(|index| self.float(index)).collect()
    }

    /// Every argument as an integer.
    ///
    /// # Errors
    ///
    /// Returns the first [`ArgumentError`] encountered.
    pub fn ints(&self) -> Result<Vec<i64>, ArgumentError> {
        (0..self.values.len()).map(|index| self.int(index)).collect()
    }
}

impl From<Vec<Value>> for Arguments {
    fn from(values: Vec<Value>) -> Self {
        Self::new(values)
    }
}

impl FromIterator<Value> for Arguments {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for Arguments {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl<'a> IntoIterator for &'a Arguments {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}
