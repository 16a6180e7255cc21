//! The two-line handshake naming the transport endpoint.

use std::io::BufRead;

use simtex_config::{Endpoint, Role, TransportKind};
use tracing::debug;

use super::TRANSPORT_TARGET;
use super::errors::TransportError;

/// Reads the handshake from `input` and interprets it according to `kind`.
///
/// For [`TransportKind::Tcp`] the lines are the host and the port; for
/// [`TransportKind::FilePair`] they are the input path and the output path.
///
/// # Errors
///
/// Returns [`TransportError::HandshakeIncomplete`] when `input` ends early,
/// [`TransportError::HandshakeRead`] when reading fails, and
/// [`TransportError::Handshake`] for blank or malformed lines.
pub fn read_handshake<R: BufRead>(
    mut input: R,
    kind: TransportKind,
) -> Result<Endpoint, TransportError> {
    let (first_role, second_role) = roles(kind);
    let first = read_line(&mut input, first_role)?;
    let second = read_line(&mut input, second_role)?;
    let endpoint = Endpoint::from_handshake(kind, &first, &second)?;
    debug!(target: TRANSPORT_TARGET, %endpoint, "handshake received");
    Ok(endpoint)
}

const fn roles(kind: TransportKind) -> (Role, Role) {
    match kind {
        TransportKind::Tcp => (Role::Host, Role::Port),
        TransportKind::FilePair => (Role::InputPath, Role::OutputPath),
    }
}

fn read_line<R: BufRead>(input: &mut R, role: Role) -> Result<String, TransportError> {
    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .map_err(|source| TransportError::HandshakeRead { source })?;
    if read == 0 {
        return Err(TransportError::HandshakeIncomplete { role });
    }
    Ok(line)
}
