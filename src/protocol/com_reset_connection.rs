use super::capabilities::Capabilities;
use super::encode::Encode;

/// `COM_RESET_CONNECTION` (0x1f): resets session state (transaction,
/// temporary tables, prepared statements, session variables) while keeping
/// the socket and authentication in place (§6's `resetServerState`) —
/// cheaper than a full reconnect or `COM_CHANGE_USER` when the user stays
/// the same.
#[derive(Debug, Default)]
pub(crate) struct ComResetConnection;

impl Encode for ComResetConnection {
    fn encode(&self, buf: &mut Vec<u8>, _: Capabilities) {
        buf.push(0x1f);
    }
}
