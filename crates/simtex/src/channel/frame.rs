//! Frame layout: a 4-byte big-endian payload length followed by the payload.

use std::io;

use super::{ChannelError, ChannelOptions, FramedChannel};

/// Size of the length header preceding every payload.
pub const HEADER_LEN: usize = 4;

/// Builds the length header for a payload of `len` bytes.
#[expect(
    clippy::big_endian_bytes,
    reason = "the engine reads frame lengths in network byte order"
)]
pub(crate) fn header_for(len: usize) -> Result<[u8; HEADER_LEN], ChannelError> {
    let length =
        u32::try_from(len).map_err(|_| ChannelError::too_large(len, u64::from(u32::MAX)))?;
    Ok(length.to_be_bytes())
}

#[expect(
    clippy::big_endian_bytes,
    reason = "the engine writes frame lengths in network byte order"
)]
pub(crate) const fn length_from_header(header: [u8; HEADER_LEN]) -> u32 {
    u32::from_be_bytes(header)
}

/// Encodes `text` as one frame.
///
/// # Errors
///
/// Returns [`ChannelError::MessageTooLarge`] when the payload does not fit a
/// 32-bit length.
pub fn encode(text: &str) -> Result<Vec<u8>, ChannelError> {
    let header = header_for(text.len())?;
    let mut frame = Vec::with_capacity(HEADER_LEN + text.len());
    frame.extend_from_slice(&header);
    frame.extend_from_slice(text.as_bytes());
    Ok(frame)
}

/// Decodes the first frame in `bytes`. Trailing bytes are ignored.
///
/// # Errors
///
/// Returns [`ChannelError::ConnectionClosed`] when `bytes` ends inside the
/// frame and [`ChannelError::InvalidUtf8`] when the payload is not UTF-8.
pub fn decode(bytes: &[u8]) -> Result<String, ChannelError> {
    let mut channel = FramedChannel::new(bytes, io::sink(), ChannelOptions::unbounded());
    channel.receive()
}

/// Decodes every frame in `bytes`.
///
/// # Errors
///
/// Fails like [`decode`] when any frame is truncated or malformed.
pub fn decode_all(bytes: &[u8]) -> Result<Vec<String>, ChannelError> {
    let mut channel = FramedChannel::new(bytes, io::sink(), ChannelOptions::unbounded());
    let mut messages = Vec::new();
    while !channel.get_ref().is_empty() {
        messages.push(channel.receive()?);
    }
    Ok(messages)
}
