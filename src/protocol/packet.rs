use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncWrite};

use crate::error::{Error, Result};
use crate::io::BufStream;

use super::capabilities::Capabilities;
use super::encode::Encode;

/// Packets with this length are continuations: more data follows (§4.1).
const MAX_PACKET_SIZE: usize = 0xFF_FFFF;

/// Frames payloads onto a byte stream per §4.1: `3-byte LE length | 1-byte
/// sequence id | payload`, splitting payloads ≥ 16 MiB across multiple
/// packets and reassembling them on read.
///
/// Grounded in the teacher's `MySqlStream` (`mysql/stream.rs`), generalized
/// to support payloads larger than one packet and an enforced
/// `max_allowed_packet`.
pub(crate) struct PacketCodec<S> {
    stream: BufStream<S>,
    seq_no: u8,
    max_allowed_packet: u32,
}

impl<S> PacketCodec<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub(crate) fn new(stream: S, max_allowed_packet: u32) -> Self {
        Self {
            stream: BufStream::new(stream),
            seq_no: 0,
            max_allowed_packet,
        }
    }

    pub(crate) fn get_ref(&self) -> &S {
        self.stream.get_ref()
    }

    pub(crate) fn into_inner(self) -> S {
        self.stream.into_inner()
    }

    /// The next sequence id this codec would use. Saved across the in-place
    /// TLS upgrade (§4.2): the last plaintext packet sent is `SSLRequest`,
    /// and the sequence id must keep counting from there once the
    /// transport is replaced.
    pub(crate) fn seq_no(&self) -> u8 {
        self.seq_no
    }

    pub(crate) fn set_seq_no(&mut self, seq_no: u8) {
        self.seq_no = seq_no;
    }

    /// Resets the sequence id to 0, as required at the start of every
    /// client-initiated command (§4.5).
    pub(crate) fn reset_sequence(&mut self) {
        self.seq_no = 0;
    }

    pub(crate) fn set_max_allowed_packet(&mut self, max: u32) {
        self.max_allowed_packet = max;
    }

    /// Encodes `packet` and buffers it as one or more framed wire packets.
    /// Call [`PacketCodec::flush`] to actually send.
    pub(crate) fn write<T: Encode>(&mut self, packet: &T, capabilities: Capabilities) -> Result<()> {
        let mut payload = Vec::new();
        packet.encode(&mut payload, capabilities);
        self.write_payload(&payload)
    }

    fn write_payload(&mut self, payload: &[u8]) -> Result<()> {
        if payload.len() > self.max_allowed_packet as usize {
            return Err(Error::PacketTooLarge {
                len: payload.len(),
                max: self.max_allowed_packet,
            });
        }

        let mut chunks = payload.chunks(MAX_PACKET_SIZE).peekable();

        if chunks.peek().is_none() {
            // zero-length payload still gets one header
            self.write_chunk(&[]);
            return Ok(());
        }

        while let Some(chunk) = chunks.next() {
            self.write_chunk(chunk);

            // a logical payload that is an exact multiple of 16 MiB still
            // gets a trailing zero-length terminator (§4.1, invariant 2)
            if chunk.len() == MAX_PACKET_SIZE && chunks.peek().is_none() {
                self.write_chunk(&[]);
            }
        }

        Ok(())
    }

    fn write_chunk(&mut self, chunk: &[u8]) {
        let wbuf = &mut self.stream.wbuf;
        wbuf.reserve(4 + chunk.len());
        wbuf.push((chunk.len() & 0xFF) as u8);
        wbuf.push(((chunk.len() >> 8) & 0xFF) as u8);
        wbuf.push(((chunk.len() >> 16) & 0xFF) as u8);
        wbuf.push(self.seq_no);
        wbuf.extend_from_slice(chunk);

        self.seq_no = self.seq_no.wrapping_add(1);
    }

    pub(crate) async fn flush(&mut self) -> Result<()> {
        self.stream.flush().await
    }

    /// Reads one logical packet, reassembling 16 MiB continuations, and
    /// returns the owned payload.
    pub(crate) async fn read(&mut self) -> Result<Bytes> {
        let mut payload = BytesMut::new();

        loop {
            let header = self.stream.read_exact(4).await?;
            let len = header[0] as usize | (header[1] as usize) << 8 | (header[2] as usize) << 16;
            let seq_no = header[3];
            self.seq_no = seq_no.wrapping_add(1);

            let chunk = self.stream.read_exact(len).await?;
            let is_continuation = len == MAX_PACKET_SIZE;
            payload.extend_from_slice(&chunk);

            if !is_continuation {
                break;
            }
        }

        Ok(payload.freeze())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::duplex;

    struct Raw<'a>(&'a [u8]);

    impl Encode for Raw<'_> {
        fn encode(&self, buf: &mut Vec<u8>, _: Capabilities) {
            buf.extend_from_slice(self.0);
        }
    }

    #[tokio::test]
    async fn framing_round_trip_for_a_small_payload() {
        let (client, mut server) = duplex(1 << 20);
        let mut codec = PacketCodec::new(client, 16_777_215);

        codec.write(&Raw(b"hello"), Capabilities::empty()).unwrap();
        codec.flush().await.unwrap();
        drop(codec);

        let mut buf = [0u8; 9];
        tokio::io::AsyncReadExt::read_exact(&mut server, &mut buf)
            .await
            .unwrap();
        assert_eq!(&buf, b"\x05\x00\x00\x00hello");
    }

    #[tokio::test]
    async fn sixteen_mib_boundary_gets_zero_length_terminator() {
        let (client, mut server) = duplex(1 << 25);
        let mut codec = PacketCodec::new(client, 16_777_215);

        let payload = vec![0x42u8; MAX_PACKET_SIZE];
        codec.write(&Raw(&payload), Capabilities::empty()).unwrap();
        codec.flush().await.unwrap();
        drop(codec);

        let mut header = [0u8; 4];
        tokio::io::AsyncReadExt::read_exact(&mut server, &mut header)
            .await
            .unwrap();
        assert_eq!(&header[..3], &[0xFF, 0xFF, 0xFF]);

        let mut body = vec![0u8; MAX_PACKET_SIZE];
        tokio::io::AsyncReadExt::read_exact(&mut server, &mut body)
            .await
            .unwrap();

        tokio::io::AsyncReadExt::read_exact(&mut server, &mut header)
            .await
            .unwrap();
        assert_eq!(&header[..3], &[0, 0, 0]);
    }

    #[tokio::test]
    async fn payload_over_max_allowed_packet_is_rejected() {
        let (client, _server) = duplex(1024);
        let mut codec = PacketCodec::new(client, 1024);

        let payload = vec![0u8; 2048];
        let err = codec.write(&Raw(&payload), Capabilities::empty()).unwrap_err();
        assert!(matches!(err, Error::PacketTooLarge { .. }));
    }
}
