use super::capabilities::Capabilities;
use super::encode::Encode;

/// `COM_PING` (0x0e): round-trips to confirm the connection is alive without
/// touching any session state.
#[derive(Debug, Default)]
pub(crate) struct ComPing;

impl Encode for ComPing {
    fn encode(&self, buf: &mut Vec<u8>, _: Capabilities) {
        buf.push(0x0e);
    }
}
