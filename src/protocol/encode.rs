use super::capabilities::Capabilities;

/// A client-to-server packet payload (§4.5 command dispatch).
///
/// Implementors write only their payload; the packet header (length +
/// sequence id) is added by [`super::packet::PacketCodec`].
pub(crate) trait Encode {
    fn encode(&self, buf: &mut Vec<u8>, capabilities: Capabilities);
}

/// Lets ad hoc auth-continuation payloads (§4.4) be sent without a named
/// packet type.
impl Encode for &'_ [u8] {
    fn encode(&self, buf: &mut Vec<u8>, _: Capabilities) {
        buf.extend_from_slice(self);
    }
}
