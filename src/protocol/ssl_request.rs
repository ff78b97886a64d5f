use crate::io::BufMut;

use super::capabilities::Capabilities;
use super::encode::Encode;

/// `SSLRequest`: a truncated `HandshakeResponse41` sent before the TLS
/// handshake to ask the server to upgrade the socket in place (§4.2).
#[derive(Debug)]
pub(crate) struct SslRequest {
    pub(crate) max_packet_size: u32,
    pub(crate) client_collation: u8,
}

impl Encode for SslRequest {
    fn encode(&self, buf: &mut Vec<u8>, capabilities: Capabilities) {
        debug_assert!(capabilities.contains(Capabilities::SSL));

        buf.put_u32_le(capabilities.bits());
        buf.put_u32_le(self.max_packet_size);
        buf.put_u8(self.client_collation);
        buf.extend_from_slice(&[0u8; 23]); // reserved
    }
}
