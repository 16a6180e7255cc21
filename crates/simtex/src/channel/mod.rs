//! Length-prefixed message channel over a duplex byte stream.
//!
//! Every message is framed as a 4-byte big-endian length followed by that
//! many bytes of UTF-8. Sends write the whole frame and flush; receives loop
//! until the header and the payload are complete, so a peer may deliver a
//! frame in arbitrarily small pieces.
//!
//! A read step fails with [`ChannelError::ReadTimeout`] only when no byte
//! arrives for the configured stall limit. Any progress resets the clock.

mod errors;
mod frame;

use std::io::{self, BufWriter, Read, Write};
use std::thread;
use std::time::{Duration, Instant};

use simtex_config::{Config, DEFAULT_MAX_MESSAGE_BYTES, DEFAULT_POLL_INTERVAL_MS};
use tracing::trace;

pub use self::errors::ChannelError;
pub use self::frame::{HEADER_LEN, decode, decode_all, encode};
use self::frame::{header_for, length_from_header};

const CHANNEL_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::channel");

/// What a zero-byte read means on the underlying stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EndOfStream {
    /// The peer hung up. Sockets behave this way.
    #[default]
    Closed,
    /// No data yet. The channel sleeps for the poll interval and reads
    /// again; the wait counts as a stall. Files appended to by the engine
    /// behave this way.
    Poll,
}

/// Tuning for a [`FramedChannel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelOptions {
    read_timeout: Option<Duration>,
    poll_interval: Duration,
    max_message_bytes: u32,
    end_of_stream: EndOfStream,
}

impl Default for ChannelOptions {
    fn default() -> Self {
        Self {
            read_timeout: None,
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            max_message_bytes: DEFAULT_MAX_MESSAGE_BYTES,
            end_of_stream: EndOfStream::Closed,
        }
    }
}

impl ChannelOptions {
    /// Options accepting any frame size, without a stall limit.
    #[must_use]
    pub fn unbounded() -> Self {
        Self {
            max_message_bytes: u32::MAX,
            ..Self::default()
        }
    }

    /// Sets the longest read stall tolerated; `None` waits forever.
    #[must_use]
    pub const fn with_read_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Sets the pause between polls when [`EndOfStream::Poll`] is in effect.
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Sets the largest payload accepted by [`FramedChannel::receive`].
    #[must_use]
    pub const fn with_max_message_bytes(mut self, limit: u32) -> Self {
        self.max_message_bytes = limit;
        self
    }

    /// Sets the end-of-stream policy.
    #[must_use]
    pub const fn with_end_of_stream(mut self, policy: EndOfStream) -> Self {
        self.end_of_stream = policy;
        self
    }

    /// Longest read stall tolerated.
    #[must_use]
    pub const fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout
    }

    /// Pause between polls of an idle stream.
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Largest accepted payload.
    #[must_use]
    pub const fn max_message_bytes(&self) -> u32 {
        self.max_message_bytes
    }

    /// End-of-stream policy.
    #[must_use]
    pub const fn end_of_stream(&self) -> EndOfStream {
        self.end_of_stream
    }
}

impl From<&Config> for ChannelOptions {
    fn from(config: &Config) -> Self {
        Self::default()
            .with_read_timeout(config.read_timeout())
            .with_poll_interval(config.poll_interval())
            .with_max_message_bytes(config.max_message_bytes())
    }
}

/// Framed message channel over a reader and a writer.
#[derive(Debug)]
pub struct FramedChannel<R, W: Write> {
    reader: R,
    writer: BufWriter<W>,
    options: ChannelOptions,
}

impl<R: Read, W: Write> FramedChannel<R, W> {
    /// Wraps a reader and a writer.
    #[must_use]
    pub fn new(reader: R, writer: W, options: ChannelOptions) -> Self {
        Self {
            reader,
            writer: BufWriter::new(writer),
            options,
        }
    }

    /// Options in effect.
    #[must_use]
    pub const fn options(&self) -> &ChannelOptions {
        &self.options
    }

    /// Borrows the reader.
    #[must_use]
    pub const fn get_ref(&self) -> &R {
        &self.reader
    }

    /// Sends `text` as one frame and flushes it.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::MessageTooLarge`] when `text` does not fit a
    /// 32-bit length and [`ChannelError::Write`] when the stream fails.
    pub fn send(&mut self, text: &str) -> Result<(), ChannelError> {
        let header = header_for(text.len())?;
        self.writer
            .write_all(&header)
            .and_then(|()| self.writer.write_all(text.as_bytes()))
            .and_then(|()| self.writer.flush())
            .map_err(ChannelError::write)?;
        trace!(target: CHANNEL_TARGET, bytes = text.len(), "sent frame");
        Ok(())
    }

    /// Receives the next frame as text.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::ConnectionClosed`] when the peer hangs up
    /// mid-frame, [`ChannelError::ReadTimeout`] when the stream stalls,
    /// [`ChannelError::MessageTooLarge`] when the announced length exceeds
    /// the limit, and [`ChannelError::InvalidUtf8`] for undecodable payloads.
    pub fn receive(&mut self) -> Result<String, ChannelError> {
        let mut header = [0_u8; HEADER_LEN];
        self.fill(&mut header)?;
        let length = length_from_header(header);
        if length > self.options.max_message_bytes {
            return Err(ChannelError::MessageTooLarge {
                length: u64::from(length),
                limit: u64::from(self.options.max_message_bytes),
            });
        }
        let size = usize::try_from(length).map_err(|_| ChannelError::MessageTooLarge {
            length: u64::from(length),
            limit: u64::try_from(usize::MAX).unwrap_or(u64::MAX),
        })?;
        let mut payload = vec![0_u8; size];
        self.fill(&mut payload)?;
        trace!(target: CHANNEL_TARGET, bytes = size, "received frame");
        String::from_utf8(payload).map_err(|source| ChannelError::InvalidUtf8 { source })
    }

    /// Flushes pending output and returns the reader and the writer.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::Write`] when the final flush fails.
    pub fn into_parts(self) -> Result<(R, W), ChannelError> {
        let writer = self
            .writer
            .into_inner()
            .map_err(|error| ChannelError::write(error.into_error()))?;
        Ok((self.reader, writer))
    }

    fn fill(&mut self, buffer: &mut [u8]) -> Result<(), ChannelError> {
        let expected = buffer.len();
        let mut received = 0;
        let mut last_progress = Instant::now();
        while let Some(remaining) = buffer.get_mut(received..).filter(|rest| !rest.is_empty()) {
            match self.reader.read(remaining) {
                Ok(0) => match self.options.end_of_stream {
                    EndOfStream::Closed => {
                        return Err(ChannelError::ConnectionClosed { expected, received });
                    }
                    EndOfStream::Poll => {
                        self.check_stall(last_progress, expected, received)?;
                        thread::sleep(self.options.poll_interval);
                    }
                },
                Ok(read) => {
                    received += read;
                    last_progress = Instant::now();
                }
                Err(error) if error.kind() == io::ErrorKind::Interrupted => {}
                Err(error) if is_stall(&error) => {
                    self.check_stall(last_progress, expected, received)?;
                }
                Err(error) => return Err(ChannelError::read(error)),
            }
        }
        Ok(())
    }

    fn check_stall(
        &self,
        last_progress: Instant,
        expected: usize,
        received: usize,
    ) -> Result<(), ChannelError> {
        let Some(timeout) = self.options.read_timeout else {
            return Ok(());
        };
        let waited = last_progress.elapsed();
        if waited >= timeout {
            return Err(ChannelError::ReadTimeout {
                waited,
                expected,
                received,
            });
        }
        Ok(())
    }
}

fn is_stall(error: &io::Error) -> bool {
    matches!(
        error.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
    )
}

#[cfg(test)]
mod property_tests;
#[cfg(test)]
mod tests;
