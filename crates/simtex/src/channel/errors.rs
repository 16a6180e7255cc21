//! Error types for the framed channel.

use std::io;
use std::string::FromUtf8Error;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

/// Failures that end a channel session. None of them are recoverable: once a
/// frame is lost the stream is out of step with the engine.
#[derive(Debug, Clone, Error)]
pub enum ChannelError {
    /// The peer closed the stream before a frame was complete.
    #[error("connection closed after {received} of {expected} byte(s)")]
    ConnectionClosed {
        /// Bytes the current read step needed.
        expected: usize,
        /// Bytes received before the stream ended.
        received: usize,
    },
    /// No bytes arrived for longer than the configured stall limit.
    #[error("read stalled for {waited:?} after {received} of {expected} byte(s)")]
    ReadTimeout {
        /// Time spent without progress.
        waited: Duration,
        /// Bytes the current read step needed.
        expected: usize,
        /// Bytes received before the stall.
        received: usize,
    },
    /// A frame exceeded the size the channel accepts.
    #[error("message of {length} byte(s) exceeds the limit of {limit}")]
    MessageTooLarge {
        /// Payload length.
        length: u64,
        /// Largest accepted payload.
        limit: u64,
    },
    /// A received payload was not UTF-8.
    #[error("received payload is not valid UTF-8: {source}")]
    InvalidUtf8 {
        /// Decoding failure.
        #[source]
        source: FromUtf8Error,
    },
    /// Reading from the underlying stream failed.
    #[error("failed to read from channel: {source}")]
    Read {
        /// Underlying I/O failure.
        #[source]
        source: Arc<io::Error>,
    },
    /// Writing to the underlying stream failed.
    #[error("failed to write to channel: {source}")]
    Write {
        /// Underlying I/O failure.
        #[source]
        source: Arc<io::Error>,
    },
}

impl ChannelError {
    pub(crate) fn too_large(length: usize, limit: u64) -> Self {
        Self::MessageTooLarge {
            length: u64::try_from(length).unwrap_or(u64::MAX),
            limit,
        }
    }

    pub(crate) fn read(source: io::Error) -> Self {
        Self::Read {
            source: Arc::new(source),
        }
    }

    pub(crate) fn write(source: io::Error) -> Self {
        Self::Write {
            source: Arc::new(source),
        }
    }

    /// Returns `true` when the peer closed the stream.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        matches!(self, Self::ConnectionClosed { .. })
    }
}
