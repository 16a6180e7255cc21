//! Property tests for frame encoding and chunked delivery.

use std::io::{self, Read};

use proptest::prelude::*;

use super::*;

/// Reader handing out its bytes in the given chunk sizes, cycling through
/// them until the data runs out.
struct ChunkedReader {
    data: Vec<u8>,
    position: usize,
    chunks: Vec<usize>,
    next_chunk: usize,
}

impl Read for ChunkedReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let size = self
            .chunks
            .get(self.next_chunk % self.chunks.len())
            .copied()
            .unwrap_or(1);
        self.next_chunk += 1;
        let remaining = self.data.get(self.position..).unwrap_or_default();
        let count = size.min(buf.len()).min(remaining.len());
        buf.get_mut(..count)
            .expect("count fits buffer")
            .copy_from_slice(remaining.get(..count).expect("count fits data"));
        self.position += count;
        Ok(count)
    }
}

proptest! {
    #[test]
    fn decode_inverts_encode(text in any::<String>()) {
        let encoded = encode(&text).expect("encode");
        prop_assert_eq!(encoded.len(), HEADER_LEN + text.len());
        prop_assert_eq!(decode(&encoded).expect("decode"), text);
    }

    #[test]
    fn chunked_delivery_reconstructs_messages(
        messages in prop::collection::vec(any::<String>(), 1..6),
        chunks in prop::collection::vec(1_usize..7, 1..8),
    ) {
        let data = messages
            .iter()
            .flat_map(|message| encode(message).expect("encode"))
            .collect();
        let reader = ChunkedReader { data, position: 0, chunks, next_chunk: 0 };
        let mut channel = FramedChannel::new(reader, io::sink(), ChannelOptions::default());
        for message in &messages {
            prop_assert_eq!(&channel.receive().expect("receive"), message);
        }
    }

    #[test]
    fn sends_decode_in_order(messages in prop::collection::vec(any::<String>(), 0..6)) {
        let mut channel = FramedChannel::new(io::empty(), Vec::new(), ChannelOptions::default());
        for message in &messages {
            channel.send(message).expect("send");
        }
        let (_, written) = channel.into_parts().expect("flush");
        prop_assert_eq!(decode_all(&written).expect("decode"), messages);
    }
}
