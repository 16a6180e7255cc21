//! Host side of the SiMTeX bridge.
//!
//! A LaTeX build running the SiMTeX package invokes functions registered
//! here by name, passing a single argument string, and typesets whatever
//! comes back. The bridge reads a two-line handshake from standard input
//! naming the transport, connects, and then serves requests one at a time
//! until the engine sends `exit`.
//!
//! The pieces, leaves first:
//!
//! - [`channel`]: length-prefixed UTF-8 frames over any reader/writer pair;
//! - [`parsers`]: conversion of the argument string into typed
//!   [`Arguments`](parsers::Arguments);
//! - [`registry`]: command names mapped to handlers and parsers;
//! - [`dispatch`]: the request/response loop and error diagnostics;
//! - [`transport`]: the handshake and the TCP or file-pair connection;
//! - bootstrap ([`run`]): configuration, telemetry and the process exit code.
//!
//! ```no_run
//! use std::process::ExitCode;
//!
//! use simtex::parsers::{Arguments, ValueType, mult_values};
//! use simtex::registry::Registry;
//!
//! fn main() -> ExitCode {
//!     let mut registry = Registry::new();
//!     registry.register_with_parser(
//!         "add",
//!         |arguments: Arguments| -> anyhow::Result<i64> {
//!             Ok(arguments.int(0)? + arguments.int(1)?)
//!         },
//!         mult_values([ValueType::Int, ValueType::Int]),
//!     );
//!     simtex::run(registry)
//! }
//! ```

mod bootstrap;
pub mod channel;
pub mod dispatch;
mod health;
pub mod parsers;
pub mod registry;
mod telemetry;
pub mod transport;

pub use bootstrap::{
    BootstrapError, Bridge, ConfigLoader, StaticConfigLoader, SystemConfigLoader, bootstrap_with,
    exit_code, run, run_with,
};
pub use health::{HealthReporter, StructuredHealthReporter};
pub use simtex_config::Config;
pub use telemetry::{TelemetryError, TelemetryHandle};

#[cfg(test)]
mod tests;
