use std::fmt;
use std::num::ParseIntError;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;

/// Transport the engine offers in its handshake.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TransportKind {
    /// The handshake names a TCP `host` and `port`.
    Tcp,
    /// The handshake names an input path and an output path.
    #[default]
    #[strum(to_string = "file_pair", serialize = "file-pair", serialize = "files")]
    FilePair,
}

/// Errors encountered while parsing a [`TransportKind`] from text.
pub type TransportKindParseError = strum::ParseError;

/// Which handshake line a value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    /// TCP host name or address.
    Host,
    /// TCP port.
    Port,
    /// Path the bridge reads requests from.
    InputPath,
    /// Path the bridge writes responses to.
    OutputPath,
}

/// Concrete endpoint resolved from the handshake.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(tag = "transport", rename_all = "snake_case")]
pub enum Endpoint {
    /// TCP connection to the engine.
    Tcp {
        /// Host name or address of the engine's listener.
        host: String,
        /// Port of the engine's listener.
        port: u16,
    },
    /// A pair of files: requests are read from `input`, responses written to
    /// `output`.
    FilePair {
        /// Path the engine writes requests to.
        input: Utf8PathBuf,
        /// Path the engine reads responses from.
        output: Utf8PathBuf,
    },
}

impl Endpoint {
    /// Builds a TCP endpoint.
    #[must_use]
    pub fn tcp(host: impl Into<String>, port: u16) -> Self {
        Self::Tcp {
            host: host.into(),
            port,
        }
    }

    /// Builds a file-pair endpoint.
    #[must_use]
    pub fn file_pair(input: impl Into<Utf8PathBuf>, output: impl Into<Utf8PathBuf>) -> Self {
        Self::FilePair {
            input: input.into(),
            output: output.into(),
        }
    }

    /// Interprets the two handshake lines according to `kind`.
    ///
    /// Surrounding whitespace, including the line terminator, is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`HandshakeError::Blank`] when a line is empty and
    /// [`HandshakeError::InvalidPort`] when a TCP port is not a valid `u16`.
    pub fn from_handshake(
        kind: TransportKind,
        first: &str,
        second: &str,
    ) -> Result<Self, HandshakeError> {
        match kind {
            TransportKind::Tcp => {
                let host = non_blank(first, Role::Host)?;
                let port_text = non_blank(second, Role::Port)?;
                let port = port_text
                    .parse::<u16>()
                    .map_err(|source| HandshakeError::InvalidPort {
                        value: port_text.to_owned(),
                        source,
                    })?;
                Ok(Self::tcp(host, port))
            }
            TransportKind::FilePair => {
                let input = non_blank(first, Role::InputPath)?;
                let output = non_blank(second, Role::OutputPath)?;
                Ok(Self::file_pair(input, output))
            }
        }
    }

    /// Transport kind of this endpoint.
    #[must_use]
    pub const fn kind(&self) -> TransportKind {
        match self {
            Self::Tcp { .. } => TransportKind::Tcp,
            Self::FilePair { .. } => TransportKind::FilePair,
        }
    }
}

fn non_blank(line: &str, role: Role) -> Result<&str, HandshakeError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(HandshakeError::Blank { role });
    }
    Ok(trimmed)
}

impl fmt::Display for Endpoint {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tcp { host, port } => write!(formatter, "tcp://{host}:{port}"),
            Self::FilePair { input, output } => {
                write!(formatter, "files://{input} -> {output}")
            }
        }
    }
}

/// Errors raised while interpreting handshake lines.
#[derive(Debug, Error)]
pub enum HandshakeError {
    /// A handshake line was empty.
    #[error("handshake line for {role} is blank")]
    Blank {
        /// Line that was blank.
        role: Role,
    },
    /// The TCP port line was not a valid port number.
    #[error("invalid TCP port '{value}' in handshake: {source}")]
    InvalidPort {
        /// Text received for the port.
        value: String,
        /// Underlying integer parse failure.
        #[source]
        source: ParseIntError,
    },
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn tcp_handshake_trims_lines() {
        let endpoint = Endpoint::from_handshake(TransportKind::Tcp, " localhost\n", "9000\r\n")
            .expect("tcp handshake");
        assert_eq!(endpoint, Endpoint::tcp("localhost", 9000));
        assert_eq!(endpoint.to_string(), "tcp://localhost:9000");
    }

    #[test]
    fn file_pair_handshake_keeps_paths() {
        let endpoint =
            Endpoint::from_handshake(TransportKind::FilePair, "/tmp/in.pipe\n", "/tmp/out.pipe")
                .expect("file handshake");
        assert_eq!(endpoint.kind(), TransportKind::FilePair);
        assert_eq!(endpoint.to_string(), "files:///tmp/in.pipe -> /tmp/out.pipe");
    }

    #[rstest]
    #[case::host(TransportKind::Tcp, "", "9000", Role::Host)]
    #[case::port(TransportKind::Tcp, "localhost", "  ", Role::Port)]
    #[case::input(TransportKind::FilePair, "\n", "/tmp/out", Role::InputPath)]
    #[case::output(TransportKind::FilePair, "/tmp/in", "", Role::OutputPath)]
    fn rejects_blank_lines(
        #[case] kind: TransportKind,
        #[case] first: &str,
        #[case] second: &str,
        #[case] expected: Role,
    ) {
        let error = Endpoint::from_handshake(kind, first, second).expect_err("blank line");
        assert!(matches!(error, HandshakeError::Blank { role } if role == expected));
    }

    #[test]
    fn rejects_out_of_range_port() {
        let error = Endpoint::from_handshake(TransportKind::Tcp, "localhost", "70000")
            .expect_err("port out of range");
        assert!(error.to_string().contains("70000"));
    }

    #[rstest]
    #[case("tcp", TransportKind::Tcp)]
    #[case("file_pair", TransportKind::FilePair)]
    #[case("file-pair", TransportKind::FilePair)]
    #[case("FILES", TransportKind::FilePair)]
    fn parses_transport_kinds(#[case] input: &str, #[case] expected: TransportKind) {
        assert_eq!(input.parse::<TransportKind>().expect("kind"), expected);
    }
}
