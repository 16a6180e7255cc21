//! Command registry mapping names to handlers and their input parsers.
//!
//! A [`Registry`] is filled before the dispatch loop starts and is read-only
//! afterwards. Registering a name that already exists replaces the earlier
//! entry, including the built-in [`EXIT_COMMAND`].

mod exit;
mod signature;

use std::collections::HashMap;
use std::fmt;

use crate::dispatch::DispatchError;
use crate::parsers::{Arguments, InputParser, raw};

pub use self::exit::{EXIT_COMMAND, ExitPolicy, ExitRequest};
pub use self::signature::{Param, Signature, SignatureParser, derive_parser};

/// A registered command implementation.
///
/// Any `Fn(Arguments) -> anyhow::Result<T>` whose output implements
/// [`fmt::Display`] is a handler; the displayed value becomes the response
/// payload.
pub trait Handler: Send + Sync {
    /// Executes the command with parsed arguments.
    ///
    /// # Errors
    ///
    /// Any error the command reports. It is returned to the engine as a
    /// diagnostic.
    fn call(&self, arguments: Arguments) -> anyhow::Result<String>;
}

impl<F, T> Handler for F
where
    F: Fn(Arguments) -> anyhow::Result<T> + Send + Sync,
    T: fmt::Display,
{
    fn call(&self, arguments: Arguments) -> anyhow::Result<String> {
        self(arguments).map(|value| value.to_string())
    }
}

/// What resolving a command yields.
pub enum Target<'a> {
    /// A registered handler with its parser.
    Function {
        /// Handler to invoke.
        handler: &'a dyn Handler,
        /// Parser for the argument string.
        parser: &'a dyn InputParser,
    },
    /// The built-in exit command.
    Exit(ExitPolicy),
}

enum Action {
    Function {
        handler: Box<dyn Handler>,
        parser: Box<dyn InputParser>,
    },
    Exit(ExitPolicy),
}

/// One registered command.
pub struct CommandEntry {
    name: String,
    action: Action,
}

impl CommandEntry {
    /// Command name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` for the built-in exit command.
    #[must_use]
    pub const fn is_exit(&self) -> bool {
        matches!(self.action, Action::Exit(_))
    }

    /// Handler and parser, or the exit policy.
    #[must_use]
    pub fn target(&self) -> Target<'_> {
        match &self.action {
            Action::Function { handler, parser } => Target::Function {
                handler: handler.as_ref(),
                parser: parser.as_ref(),
            },
            Action::Exit(policy) => Target::Exit(*policy),
        }
    }
}

impl fmt::Debug for CommandEntry {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("CommandEntry")
            .field("name", &self.name)
            .field("exit", &self.is_exit())
            .finish_non_exhaustive()
    }
}

/// Table of commands available to the engine.
///
/// # Example
///
/// ```
/// use simtex::parsers::{ValueType, mult_values};
/// use simtex::registry::Registry;
///
/// let mut registry = Registry::new();
/// registry.register_with_parser(
///     "add",
///     |arguments: simtex::parsers::Arguments| -> anyhow::Result<i64> {
///         Ok(arguments.int(0)? + arguments.int(1)?)
///     },
///     mult_values([ValueType::Int, ValueType::Int]),
/// );
/// assert!(registry.contains("add"));
/// assert!(registry.contains("exit"));
/// ```
pub struct Registry {
    entries: HashMap<String, CommandEntry>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Creates a registry holding only the built-in `exit` command, which
    /// ignores its argument.
    #[must_use]
    pub fn new() -> Self {
        Self::with_exit_policy(ExitPolicy::default())
    }

    /// Creates a registry whose built-in `exit` command follows `policy`.
    #[must_use]
    pub fn with_exit_policy(policy: ExitPolicy) -> Self {
        let mut registry = Self {
            entries: HashMap::new(),
        };
        registry.insert(EXIT_COMMAND.to_owned(), Action::Exit(policy));
        registry
    }

    /// Registers `handler` under `name` with the raw parser: the handler
    /// receives the whole argument string as one text argument.
    pub fn register<H>(&mut self, name: impl Into<String>, handler: H) -> &mut Self
    where
        H: Handler + 'static,
    {
        self.register_with_parser(name, handler, raw())
    }

    /// Registers `handler` under `name` with an explicit parser.
    pub fn register_with_parser<H, P>(
        &mut self,
        name: impl Into<String>,
        handler: H,
        parser: P,
    ) -> &mut Self
    where
        H: Handler + 'static,
        P: InputParser + 'static,
    {
        self.insert(
            name.into(),
            Action::Function {
                handler: Box::new(handler),
                parser: Box::new(parser),
            },
        );
        self
    }

    /// Registers `handler` under `name` with the parser derived from
    /// `signature`.
    pub fn register_with_signature<H>(
        &mut self,
        name: impl Into<String>,
        handler: H,
        signature: Signature,
    ) -> &mut Self
    where
        H: Handler + 'static,
    {
        self.register_with_parser(name, handler, derive_parser(signature))
    }

    fn insert(&mut self, name: String, action: Action) {
        let entry = CommandEntry {
            name: name.clone(),
            action,
        };
        self.entries.insert(name, entry);
    }

    /// Looks up a command.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::UnknownCommand`] when `name` is not
    /// registered.
    pub fn resolve(&self, name: &str) -> Result<&CommandEntry, DispatchError> {
        self.entries
            .get(name)
            .ok_or_else(|| DispatchError::unknown_command(name))
    }

    /// Returns `true` when `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names in sorted order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered commands, including `exit`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when nothing is registered. The built-in `exit` keeps
    /// every registry created here non-empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Registry")
            .field("commands", &self.names())
            .finish()
    }
}
