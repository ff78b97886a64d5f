//! Transport (C3): plain TCP, optionally upgraded to TLS mid-session.

mod socket;
#[cfg(feature = "rustls")]
mod tls;

pub(crate) use socket::{MaybeTlsStream, SocketOptions};
#[cfg(feature = "rustls")]
pub(crate) use tls::upgrade;
