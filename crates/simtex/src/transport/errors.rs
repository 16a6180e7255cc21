//! Error types for handshake and transport setup.

use std::io;

use camino::Utf8PathBuf;
use simtex_config::{HandshakeError, Role};
use thiserror::Error;

use crate::channel::ChannelError;

/// Errors surfaced while reading the handshake or opening the transport.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Reading a handshake line failed.
    #[error("failed to read handshake: {source}")]
    HandshakeRead {
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// Standard input ended before the handshake was complete.
    #[error("handshake ended before the {role} line")]
    HandshakeIncomplete {
        /// Line that never arrived.
        role: Role,
    },
    /// A handshake line was blank or malformed.
    #[error(transparent)]
    Handshake(#[from] HandshakeError),
    /// The TCP host did not resolve.
    #[error("failed to resolve {endpoint}: {source}")]
    Resolve {
        /// Endpoint being resolved.
        endpoint: String,
        /// Underlying resolver failure.
        #[source]
        source: io::Error,
    },
    /// The TCP connection attempt failed.
    #[error("failed to connect to {endpoint}: {source}")]
    Connect {
        /// Endpoint being connected to.
        endpoint: String,
        /// Underlying connection failure.
        #[source]
        source: io::Error,
    },
    /// The connected socket could not be configured.
    #[error("failed to configure socket for {endpoint}: {source}")]
    Configure {
        /// Connected endpoint.
        endpoint: String,
        /// Underlying socket failure.
        #[source]
        source: io::Error,
    },
    /// The request file could not be opened.
    #[error("failed to open input file {path}: {source}")]
    OpenInput {
        /// Path named by the handshake.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The response file could not be created.
    #[error("failed to open output file {path}: {source}")]
    OpenOutput {
        /// Path named by the handshake.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// Flushing or shutting down the transport failed.
    #[error("failed to close transport: {source}")]
    Close {
        /// Underlying failure.
        #[source]
        source: ChannelError,
    },
}
