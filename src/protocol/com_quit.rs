use super::capabilities::Capabilities;
use super::encode::Encode;

/// `COM_QUIT` (0x01): tells the server this connection is closing. The
/// server closes the socket in response instead of sending a packet back.
#[derive(Debug, Default)]
pub(crate) struct ComQuit;

impl Encode for ComQuit {
    fn encode(&self, buf: &mut Vec<u8>, _: Capabilities) {
        buf.push(0x01);
    }
}
