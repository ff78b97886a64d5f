use std::net::Shutdown;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::net::TcpStream;

use crate::error::Result;

/// TCP socket options recognized by `MySqlConnectOptions::socket_options`.
///
/// Defaults mirror common driver defaults: Nagle's algorithm disabled
/// (`tcp_nodelay = true`) since MySQL statements are typically small,
/// latency-sensitive round trips.
#[derive(Debug, Clone, Copy)]
pub struct SocketOptions {
    pub tcp_nodelay: bool,
    pub tcp_keepalive: Option<std::time::Duration>,
}

impl Default for SocketOptions {
    fn default() -> Self {
        Self {
            tcp_nodelay: true,
            tcp_keepalive: None,
        }
    }
}

impl SocketOptions {
    pub(crate) fn apply(&self, stream: &TcpStream) -> Result<()> {
        stream.set_nodelay(self.tcp_nodelay)?;
        Ok(())
    }
}

/// A TCP stream, optionally upgraded to TLS in place.
///
/// The upgrade happens after the handshake packet and before
/// `HandshakeResponse41` is sent (§4.2); until then every connection is
/// `Plain`.
pub(crate) enum MaybeTlsStream {
    Plain(TcpStream),
    #[cfg(feature = "rustls")]
    Tls(Box<tokio_rustls::client::TlsStream<TcpStream>>),
}

impl MaybeTlsStream {
    pub(crate) fn is_tls(&self) -> bool {
        match self {
            MaybeTlsStream::Plain(_) => false,
            #[cfg(feature = "rustls")]
            MaybeTlsStream::Tls(_) => true,
        }
    }

    pub(crate) fn shutdown(&self) -> Result<()> {
        match self {
            MaybeTlsStream::Plain(s) => Ok(s.shutdown(Shutdown::Both)?),
            #[cfg(feature = "rustls")]
            MaybeTlsStream::Tls(s) => Ok(s.get_ref().0.shutdown(Shutdown::Both)?),
        }
    }
}

impl AsyncRead for MaybeTlsStream {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<std::io::Result<()>> {
        match self.get_mut() {
            MaybeTlsStream::Plain(s) => Pin::new(s).poll_read(cx, buf),
            #[cfg(feature = "rustls")]
            MaybeTlsStream::Tls(s) => Pin::new(s.as_mut()).poll_read(cx, buf),
        }
    }
}

impl AsyncWrite for MaybeTlsStream {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<std::io::Result<usize>> {
        match self.get_mut() {
            MaybeTlsStream::Plain(s) => Pin::new(s).poll_write(cx, buf),
            #[cfg(feature = "rustls")]
            MaybeTlsStream::Tls(s) => Pin::new(s.as_mut()).poll_write(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        match self.get_mut() {
            MaybeTlsStream::Plain(s) => Pin::new(s).poll_flush(cx),
            #[cfg(feature = "rustls")]
            MaybeTlsStream::Tls(s) => Pin::new(s.as_mut()).poll_flush(cx),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        match self.get_mut() {
            MaybeTlsStream::Plain(s) => Pin::new(s).poll_shutdown(cx),
            #[cfg(feature = "rustls")]
            MaybeTlsStream::Tls(s) => Pin::new(s.as_mut()).poll_shutdown(cx),
        }
    }
}
