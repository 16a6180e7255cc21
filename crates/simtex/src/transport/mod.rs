//! Transports carrying the framed channel: a TCP connection to the engine or
//! a pair of files the engine writes requests to and reads responses from.
//!
//! The functions here open the endpoint named by the handshake and wrap the
//! resulting streams in uniform reader and writer types so the channel and
//! the dispatch loop stay transport agnostic.

mod errors;
mod handshake;

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use camino::Utf8Path;
use simtex_config::Endpoint;
use tracing::{debug, info};

use crate::channel::{ChannelOptions, EndOfStream, FramedChannel};

pub use self::errors::TransportError;
pub use self::handshake::read_handshake;

/// Tracing target for transport operations.
pub(crate) const TRANSPORT_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::transport");

/// Longest wait for a TCP connection to be established.
pub const CONNECTION_TIMEOUT: Duration = Duration::from_secs(5);

/// Channel over an opened transport.
pub type TransportChannel = FramedChannel<TransportReader, TransportWriter>;

/// Read half of a transport.
#[derive(Debug)]
pub enum TransportReader {
    /// Socket read half.
    Tcp(TcpStream),
    /// Request file.
    File(File),
}

impl Read for TransportReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Tcp(stream) => stream.read(buf),
            Self::File(file) => file.read(buf),
        }
    }
}

/// Write half of a transport.
#[derive(Debug)]
pub enum TransportWriter {
    /// Socket write half.
    Tcp(TcpStream),
    /// Response file.
    File(File),
}

impl Write for TransportWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Tcp(stream) => stream.write(buf),
            Self::File(file) => file.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Tcp(stream) => stream.flush(),
            Self::File(file) => file.flush(),
        }
    }
}

/// Opens the transport for `endpoint` and wraps it in a channel.
///
/// TCP connections treat end-of-stream as the engine hanging up and rely on
/// the socket read timeout for stall detection. The request file of a file
/// pair is polled at `options.poll_interval()`, since end-of-file only means
/// the engine has not written the next frame yet. The response file is
/// created or truncated.
///
/// # Errors
///
/// Returns a [`TransportError`] when the endpoint cannot be resolved,
/// reached, opened or configured.
pub fn connect(
    endpoint: &Endpoint,
    options: ChannelOptions,
) -> Result<TransportChannel, TransportError> {
    let channel = match endpoint {
        Endpoint::Tcp { host, port } => {
            let (reader, writer) = connect_tcp(endpoint, host, *port, options.read_timeout())?;
            FramedChannel::new(
                reader,
                writer,
                options.with_end_of_stream(EndOfStream::Closed),
            )
        }
        Endpoint::FilePair { input, output } => {
            let (reader, writer) = open_files(input, output)?;
            FramedChannel::new(
                reader,
                writer,
                options.with_end_of_stream(EndOfStream::Poll),
            )
        }
    };
    info!(target: TRANSPORT_TARGET, %endpoint, "transport connected");
    Ok(channel)
}

fn connect_tcp(
    endpoint: &Endpoint,
    host: &str,
    port: u16,
    read_timeout: Option<Duration>,
) -> Result<(TransportReader, TransportWriter), TransportError> {
    let address = resolve_tcp_address(host, port).map_err(|source| TransportError::Resolve {
        endpoint: endpoint.to_string(),
        source,
    })?;
    let stream = TcpStream::connect_timeout(&address, CONNECTION_TIMEOUT).map_err(|source| {
        TransportError::Connect {
            endpoint: endpoint.to_string(),
            source,
        }
    })?;
    let configure = |source| TransportError::Configure {
        endpoint: endpoint.to_string(),
        source,
    };
    stream.set_read_timeout(read_timeout).map_err(configure)?;
    stream.set_nodelay(true).map_err(configure)?;
    let reader = stream.try_clone().map_err(configure)?;
    debug!(target: TRANSPORT_TARGET, %address, "tcp stream ready");
    Ok((TransportReader::Tcp(reader), TransportWriter::Tcp(stream)))
}

fn resolve_tcp_address(host: &str, port: u16) -> io::Result<SocketAddr> {
    let mut addrs = (host, port).to_socket_addrs()?;
    addrs
        .find(|addr| matches!(addr, SocketAddr::V4(_) | SocketAddr::V6(_)))
        .ok_or_else(|| io::Error::new(io::ErrorKind::AddrNotAvailable, "no resolved addresses"))
}

fn open_files(
    input: &Utf8Path,
    output: &Utf8Path,
) -> Result<(TransportReader, TransportWriter), TransportError> {
    let reader = File::open(input).map_err(|source| TransportError::OpenInput {
        path: input.to_path_buf(),
        source,
    })?;
    let writer = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(output)
        .map_err(|source| TransportError::OpenOutput {
            path: output.to_path_buf(),
            source,
        })?;
    Ok((TransportReader::File(reader), TransportWriter::File(writer)))
}

/// Flushes pending responses and releases the transport. Sockets are shut
/// down in both directions.
///
/// # Errors
///
/// Returns [`TransportError::Close`] when the final flush fails. A socket the
/// engine already closed is not an error.
pub fn close(channel: TransportChannel) -> Result<(), TransportError> {
    let (reader, writer) = channel
        .into_parts()
        .map_err(|source| TransportError::Close { source })?;
    if let TransportWriter::Tcp(stream) = writer {
        match stream.shutdown(Shutdown::Both) {
            Err(error) if error.kind() != io::ErrorKind::NotConnected => {
                debug!(target: TRANSPORT_TARGET, %error, "socket shutdown failed");
            }
            _ => {}
        }
    }
    drop(reader);
    debug!(target: TRANSPORT_TARGET, "transport closed");
    Ok(())
}
