//! Unit tests for the framed channel.

use std::collections::VecDeque;
use std::io::{self, Read};
use std::time::Duration;

use rstest::rstest;

use super::*;

/// One scripted response to a `read` call.
enum Step {
    Data(Vec<u8>),
    Empty,
    Fail(io::ErrorKind),
}

/// Reader that replays a script, delivering at most one step per call.
/// Once the script runs out, every read returns zero bytes.
struct ScriptedReader {
    steps: VecDeque<Step>,
}

impl ScriptedReader {
    fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
        }
    }

    /// Delivers `bytes` one byte per read.
    fn trickle(bytes: &[u8]) -> Self {
        Self::new(bytes.iter().map(|byte| Step::Data(vec![*byte])))
    }
}

impl Read for ScriptedReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.steps.pop_front() {
            None | Some(Step::Empty) => Ok(0),
            Some(Step::Fail(kind)) => Err(io::Error::from(kind)),
            Some(Step::Data(mut data)) => {
                let count = data.len().min(buf.len());
                let rest = data.split_off(count);
                buf.get_mut(..count)
                    .expect("count fits buffer")
                    .copy_from_slice(&data);
                if !rest.is_empty() {
                    self.steps.push_front(Step::Data(rest));
                }
                Ok(count)
            }
        }
    }
}

fn frame(text: &str) -> Vec<u8> {
    encode(text).expect("encode")
}

fn polling(timeout: Duration, poll: Duration) -> ChannelOptions {
    ChannelOptions::default()
        .with_end_of_stream(EndOfStream::Poll)
        .with_read_timeout(Some(timeout))
        .with_poll_interval(poll)
}

#[test]
fn encode_prefixes_big_endian_length() {
    assert_eq!(frame("hi"), vec![0, 0, 0, 2, b'h', b'i']);
    assert_eq!(frame(""), vec![0, 0, 0, 0]);
}

#[test]
fn encode_counts_utf8_bytes() {
    let encoded = frame("é");
    assert_eq!(encoded.get(..HEADER_LEN), Some(&[0_u8, 0, 0, 2][..]));
}

#[test]
fn send_writes_complete_frame() {
    let mut channel = FramedChannel::new(io::empty(), Vec::new(), ChannelOptions::default());
    channel.send("success").expect("send");
    channel.send("7").expect("send");
    let (_, written) = channel.into_parts().expect("flush");
    assert_eq!(
        decode_all(&written).expect("decode"),
        vec![String::from("success"), String::from("7")]
    );
}

#[test]
fn receive_reassembles_single_byte_reads() {
    let mut bytes = frame("add");
    bytes.extend(frame("3 4"));
    let reader = ScriptedReader::trickle(&bytes);
    let mut channel = FramedChannel::new(reader, io::sink(), ChannelOptions::default());
    assert_eq!(channel.receive().expect("name"), "add");
    assert_eq!(channel.receive().expect("arguments"), "3 4");
}

#[test]
fn receive_returns_empty_payload() {
    let bytes = frame("");
    let mut channel = FramedChannel::new(&bytes[..], io::sink(), ChannelOptions::default());
    assert_eq!(channel.receive().expect("empty frame"), "");
}

#[rstest]
#[case::inside_header(vec![0, 0])]
#[case::inside_payload(vec![0, 0, 0, 5, b'a', b'b'])]
#[case::before_frame(Vec::new())]
fn closed_stream_is_reported(#[case] bytes: Vec<u8>) {
    let mut channel = FramedChannel::new(&bytes[..], io::sink(), ChannelOptions::default());
    let error = channel.receive().expect_err("stream ends early");
    assert!(error.is_closed(), "unexpected error: {error}");
}

#[test]
fn interrupted_reads_are_retried() {
    let reader = ScriptedReader::new([
        Step::Fail(io::ErrorKind::Interrupted),
        Step::Data(frame("ok")),
    ]);
    let mut channel = FramedChannel::new(reader, io::sink(), ChannelOptions::default());
    assert_eq!(channel.receive().expect("retry"), "ok");
}

#[test]
fn other_read_errors_are_fatal() {
    let reader = ScriptedReader::new([Step::Fail(io::ErrorKind::PermissionDenied)]);
    let mut channel = FramedChannel::new(reader, io::sink(), ChannelOptions::default());
    let error = channel.receive().expect_err("read fails");
    assert!(matches!(error, ChannelError::Read { .. }));
}

#[test]
fn oversized_length_is_rejected_before_reading_payload() {
    let options = ChannelOptions::default().with_max_message_bytes(4);
    let bytes = frame("too long");
    let mut channel = FramedChannel::new(&bytes[..], io::sink(), options);
    let error = channel.receive().expect_err("over limit");
    assert!(matches!(
        error,
        ChannelError::MessageTooLarge {
            length: 8,
            limit: 4
        }
    ));
}

#[test]
fn invalid_utf8_is_rejected() {
    let bytes = [0_u8, 0, 0, 2, 0xff, 0xfe];
    let mut channel = FramedChannel::new(&bytes[..], io::sink(), ChannelOptions::default());
    let error = channel.receive().expect_err("not utf-8");
    assert!(matches!(error, ChannelError::InvalidUtf8 { .. }));
}

#[test]
fn polling_waits_through_short_stalls() {
    let reader = ScriptedReader::new([
        Step::Empty,
        Step::Empty,
        Step::Empty,
        Step::Data(frame("late")),
    ]);
    let options = polling(Duration::from_secs(2), Duration::from_millis(5));
    let mut channel = FramedChannel::new(reader, io::sink(), options);
    assert_eq!(channel.receive().expect("data after stall"), "late");
}

#[test]
fn polling_times_out_on_long_stall() {
    let reader = ScriptedReader::new([Step::Data(vec![0, 0])]);
    let options = polling(Duration::from_millis(50), Duration::from_millis(5));
    let mut channel = FramedChannel::new(reader, io::sink(), options);
    let error = channel.receive().expect_err("stall");
    assert!(matches!(
        error,
        ChannelError::ReadTimeout {
            expected: 4,
            received: 2,
            ..
        }
    ));
}

#[test]
fn progress_resets_the_stall_clock() {
    // Each byte arrives after roughly 60ms of silence while the whole frame
    // takes far longer than the 400ms stall limit.
    let steps = frame("slow").into_iter().flat_map(|byte| {
        [Step::Empty, Step::Empty, Step::Empty, Step::Data(vec![byte])]
    });
    let reader = ScriptedReader::new(steps);
    let options = polling(Duration::from_millis(400), Duration::from_millis(20));
    let mut channel = FramedChannel::new(reader, io::sink(), options);
    assert_eq!(channel.receive().expect("steady progress"), "slow");
}

#[test]
fn socket_timeouts_count_as_stalls() {
    let reader = ScriptedReader::new([
        Step::Fail(io::ErrorKind::WouldBlock),
        Step::Fail(io::ErrorKind::TimedOut),
        Step::Data(frame("ok")),
    ]);
    let options = ChannelOptions::default().with_read_timeout(Some(Duration::from_secs(5)));
    let mut channel = FramedChannel::new(reader, io::sink(), options);
    assert_eq!(channel.receive().expect("stall then data"), "ok");
}

#[test]
fn expired_socket_timeout_is_fatal() {
    let reader = ScriptedReader::new([Step::Fail(io::ErrorKind::WouldBlock)]);
    let options = ChannelOptions::default().with_read_timeout(Some(Duration::ZERO));
    let mut channel = FramedChannel::new(reader, io::sink(), options);
    let error = channel.receive().expect_err("timeout");
    assert!(matches!(error, ChannelError::ReadTimeout { .. }));
}

#[test]
fn decode_reports_truncated_frames() {
    let error = decode(&[0, 0, 0, 3, b'a']).expect_err("truncated");
    assert!(error.is_closed());
}

#[test]
fn options_follow_configuration() {
    let config = simtex_config::Config {
        read_timeout_secs: 0,
        poll_interval_ms: 25,
        max_message_bytes: 1024,
        ..simtex_config::Config::default()
    };
    let options = ChannelOptions::from(&config);
    assert_eq!(options.read_timeout(), None);
    assert_eq!(options.poll_interval(), Duration::from_millis(25));
    assert_eq!(options.max_message_bytes(), 1024);
    assert_eq!(options.end_of_stream(), EndOfStream::Closed);
}
