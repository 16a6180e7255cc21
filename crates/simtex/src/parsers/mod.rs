//! Input parsers converting the engine's argument string into typed values.
//!
//! The engine always sends a command's arguments as one string. A parser
//! decides how that string maps onto the handler's parameters:
//!
//! - [`raw`] hands the whole string over unchanged;
//! - [`single_value`] converts the whole string to one type;
//! - [`mult_values`] splits on a separator and converts every token, either
//!   with one shared type (any token count) or with one type per position
//!   (exact token count).
//!
//! Any closure `Fn(&str) -> Result<Arguments, ParseError>` is also a parser.

mod errors;
mod value;

pub use self::errors::{Arity, ParseError};
pub use self::value::{ArgumentError, Arguments, Value, ValueType};

/// Converts a raw argument string into ordered arguments.
pub trait InputParser: Send + Sync {
    /// Parses `input`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::ArityMismatch`] when the token count is wrong and
    /// [`ParseError::Conversion`] when a token has the wrong shape.
    fn parse(&self, input: &str) -> Result<Arguments, ParseError>;
}

impl<F> InputParser for F
where
    F: Fn(&str) -> Result<Arguments, ParseError> + Send + Sync,
{
    fn parse(&self, input: &str) -> Result<Arguments, ParseError> {
        self(input)
    }
}

/// How an argument string is split into tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Separator {
    /// Split on runs of whitespace.
    Whitespace,
    /// Split on every occurrence of the literal; adjacent separators yield
    /// empty tokens.
    Literal(String),
}

impl Separator {
    /// Splits `input` into tokens. An empty input has no tokens.
    #[must_use]
    pub fn split<'a>(&'a self, input: &'a str) -> Vec<&'a str> {
        if input.is_empty() {
            return Vec::new();
        }
        match self {
            Self::Whitespace => input.split_whitespace().collect(),
            Self::Literal(separator) => input.split(separator.as_str()).collect(),
        }
    }
}

impl Default for Separator {
    fn default() -> Self {
        Self::Literal(String::from(" "))
    }
}

impl From<&str> for Separator {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            Self::Whitespace
        } else {
            Self::Literal(value.to_owned())
        }
    }
}

impl From<char> for Separator {
    fn from(value: char) -> Self {
        Self::Literal(value.to_string())
    }
}

/// Passes the whole argument string through as one text argument.
#[derive(Debug, Clone, Copy, Default)]
pub struct Raw;

impl InputParser for Raw {
    fn parse(&self, input: &str) -> Result<Arguments, ParseError> {
        Ok(Arguments::new(vec![Value::Text(input.to_owned())]))
    }
}

/// Converts the whole argument string to a single value.
#[derive(Debug, Clone, Copy)]
pub struct SingleValue {
    target: ValueType,
}

impl InputParser for SingleValue {
    fn parse(&self, input: &str) -> Result<Arguments, ParseError> {
        let value = self.target.convert(input)?;
        Ok(Arguments::new(vec![value]))
    }
}

/// Type layout accepted by [`MultValues`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Types {
    /// Every token uses the same type; any number of tokens.
    Each(ValueType),
    /// Token `i` uses type `i`; the token count must match.
    List(Vec<ValueType>),
}

impl From<ValueType> for Types {
    fn from(value: ValueType) -> Self {
        Self::Each(value)
    }
}

impl From<Vec<ValueType>> for Types {
    fn from(value: Vec<ValueType>) -> Self {
        Self::List(value)
    }
}

impl<const N: usize> From<[ValueType; N]> for Types {
    fn from(value: [ValueType; N]) -> Self {
        Self::List(value.to_vec())
    }
}

impl From<&[ValueType]> for Types {
    fn from(value: &[ValueType]) -> Self {
        Self::List(value.to_vec())
    }
}

/// Splits the argument string and converts each token.
#[derive(Debug, Clone)]
pub struct MultValues {
    types: Types,
    separator: Separator,
}

impl MultValues {
    /// Replaces the separator (a single space by default).
    #[must_use]
    pub fn separator(mut self, separator: impl Into<Separator>) -> Self {
        self.separator = separator.into();
        self
    }
}

impl InputParser for MultValues {
    fn parse(&self, input: &str) -> Result<Arguments, ParseError> {
        let tokens = self.separator.split(input);
        match &self.types {
            Types::Each(target) => tokens
                .into_iter()
                .map(|token| target.convert(token))
                .collect(),
            Types::List(targets) => {
                if tokens.len() != targets.len() {
                    return Err(ParseError::arity(
                        Arity::Exactly(targets.len()),
                        tokens.len(),
                    ));
                }
                targets
                    .iter()
                    .zip(tokens)
                    .map(|(target, token)| target.convert(token))
                    .collect()
            }
        }
    }
}

/// Parser that returns the whole input as a single text argument.
#[must_use]
pub const fn raw() -> Raw {
    Raw
}

/// Parser that converts the whole input to `target`.
#[must_use]
pub const fn single_value(target: ValueType) -> SingleValue {
    SingleValue { target }
}

/// Parser that splits the input on a single space and converts each token.
///
/// Pass one [`ValueType`] to convert any number of tokens with it, or a list
/// of types to require one token per entry.
///
/// ```
/// use simtex::parsers::{InputParser, Value, ValueType, mult_values};
///
/// let parser = mult_values(ValueType::Float).separator(",");
/// let arguments = parser.parse("1,2,3").expect("floats");
/// assert_eq!(arguments.as_slice(), &[Value::Float(1.0), Value::Float(2.0), Value::Float(3.0)]);
/// ```
#[must_use]
pub fn mult_values(types: impl Into<Types>) -> MultValues {
    MultValues {
        types: types.into(),
        separator: Separator::default(),
    }
}

#[cfg(test)]
mod tests;
