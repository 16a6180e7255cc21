//! Declarative handler signatures and the parsers derived from them.

use crate::parsers::{Arguments, Arity, InputParser, ParseError, Separator, Value, ValueType};

/// One parameter of a [`Signature`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Param {
    /// Converted to the given type.
    Typed(ValueType),
    /// Passed through as text.
    Untyped,
}

impl Param {
    fn convert(self, token: &str) -> Result<Value, ParseError> {
        match self {
            Self::Typed(target) => target.convert(token),
            Self::Untyped => Ok(Value::Text(token.to_owned())),
        }
    }
}

/// Shape of a handler's parameter list.
///
/// Fixed parameters are matched to tokens in order. An optional trailing
/// variadic parameter absorbs any further tokens.
///
/// ```
/// use simtex::parsers::{InputParser, Value, ValueType};
/// use simtex::registry::{Signature, derive_parser};
///
/// let parser = derive_parser(
///     Signature::new()
///         .param(ValueType::Text)
///         .variadic(ValueType::Int),
/// );
/// let arguments = parser.parse("total 1 2").expect("parse");
/// assert_eq!(arguments.len(), 3);
/// assert_eq!(arguments.get(2), Some(&Value::Int(2)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
    fixed: Vec<Param>,
    variadic: Option<Param>,
    separator: Separator,
}

impl Signature {
    /// Signature without parameters, split on a single space.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a typed fixed parameter.
    #[must_use]
    pub fn param(mut self, target: ValueType) -> Self {
        self.fixed.push(Param::Typed(target));
        self
    }

    /// Appends an untyped fixed parameter.
    #[must_use]
    pub fn untyped(mut self) -> Self {
        self.fixed.push(Param::Untyped);
        self
    }

    /// Sets a typed variadic tail.
    #[must_use]
    pub const fn variadic(mut self, target: ValueType) -> Self {
        self.variadic = Some(Param::Typed(target));
        self
    }

    /// Sets an untyped variadic tail.
    #[must_use]
    pub const fn untyped_variadic(mut self) -> Self {
        self.variadic = Some(Param::Untyped);
        self
    }

    /// Replaces the token separator.
    #[must_use]
    pub fn separator(mut self, separator: impl Into<Separator>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Fixed parameters in order.
    #[must_use]
    pub fn fixed(&self) -> &[Param] {
        &self.fixed
    }

    /// Variadic tail, if any.
    #[must_use]
    pub const fn variadic_param(&self) -> Option<Param> {
        self.variadic
    }

    /// Token counts the signature accepts.
    #[must_use]
    pub fn arity(&self) -> Arity {
        if self.variadic.is_some() {
            Arity::AtLeast(self.fixed.len())
        } else {
            Arity::Exactly(self.fixed.len())
        }
    }
}

/// Parser built from a [`Signature`] by [`derive_parser`].
#[derive(Debug, Clone)]
pub struct SignatureParser {
    signature: Signature,
}

impl SignatureParser {
    /// Signature the parser enforces.
    #[must_use]
    pub const fn signature(&self) -> &Signature {
        &self.signature
    }
}

impl InputParser for SignatureParser {
    fn parse(&self, input: &str) -> Result<Arguments, ParseError> {
        let tokens = self.signature.separator.split(input);
        let arity = self.signature.arity();
        if !arity.accepts(tokens.len()) {
            return Err(ParseError::arity(arity, tokens.len()));
        }
        let tail = self.signature.variadic.unwrap_or(Param::Untyped);
        tokens
            .into_iter()
            .enumerate()
            .map(|(index, token)| {
                self.signature
                    .fixed
                    .get(index)
                    .copied()
                    .unwrap_or(tail)
                    .convert(token)
            })
            .collect()
    }
}

/// Builds the parser matching `signature`.
///
/// Without a variadic tail the token count must equal the number of fixed
/// parameters. With one, at least that many tokens are required and the rest
/// are converted with the tail's type.
#[must_use]
pub const fn derive_parser(signature: Signature) -> SignatureParser {
    SignatureParser { signature }
}
