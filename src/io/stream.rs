use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::Result;

/// A read/write buffer layered over an async socket.
///
/// Reads are serviced out of an internal [`BytesMut`], topping it up from the
/// socket only when the buffered bytes run short (C3); writes accumulate in
/// `wbuf` until [`BufStream::flush`] pushes them out in one write call, which
/// is how packet framing (C2) batches a header + payload into a single
/// syscall.
pub(crate) struct BufStream<S> {
    stream: S,
    pub(crate) wbuf: Vec<u8>,
    rbuf: BytesMut,
}

impl<S> BufStream<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub(crate) fn new(stream: S) -> Self {
        Self {
            stream,
            wbuf: Vec::with_capacity(1024),
            rbuf: BytesMut::with_capacity(4096),
        }
    }

    pub(crate) fn get_ref(&self) -> &S {
        &self.stream
    }

    pub(crate) fn get_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    pub(crate) async fn flush(&mut self) -> Result<()> {
        if !self.wbuf.is_empty() {
            self.stream.write_all(&self.wbuf).await?;
            self.wbuf.clear();
        }
        self.stream.flush().await?;
        Ok(())
    }

    /// Returns exactly `cnt` bytes, reading from the socket as needed, and
    /// consumes them from the buffer.
    pub(crate) async fn read_exact(&mut self, cnt: usize) -> Result<BytesMut> {
        while self.rbuf.len() < cnt {
            let mut chunk = [0u8; 4096];
            let n = self.stream.read(&mut chunk).await?;
            if n == 0 {
                return Err(std::io::Error::from(std::io::ErrorKind::UnexpectedEof).into());
            }
            self.rbuf.extend_from_slice(&chunk[..n]);
        }

        Ok(self.rbuf.split_to(cnt))
    }
}

impl<S> BufStream<S> {
    pub(crate) fn into_inner(self) -> S {
        self.stream
    }
}
