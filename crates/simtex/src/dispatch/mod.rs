//! Request dispatch: receive a command and its arguments, run the command,
//! answer with a status and a payload.
//!
//! Each request is two frames from the engine, the command name and the
//! argument string, and, unless the command was `exit`, two frames back: the
//! status (`success` or `error`) followed by the result or a [`Diagnostic`].
//! Unknown commands, parser rejections, handler errors and handler panics are
//! all answered with `error` and the loop carries on. Only `exit` and channel
//! failures end it.

mod diagnostic;
mod dispatcher;
mod errors;
mod panics;
mod runner;

pub use self::diagnostic::Diagnostic;
pub use self::dispatcher::{Dispatcher, Outcome, STATUS_ERROR, STATUS_SUCCESS, Step};
pub use self::errors::{DispatchError, ErrorKind};
pub use self::runner::{DispatchLoop, LoopState};

/// Tracing target for dispatch operations.
pub(crate) const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");
