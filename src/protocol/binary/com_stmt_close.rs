use crate::io::BufMut;

use crate::protocol::capabilities::Capabilities;
use crate::protocol::encode::Encode;

/// `COM_STMT_CLOSE` (0x19): deallocates a prepared statement. The server
/// sends no response to this command, not even an OK packet.
#[derive(Debug)]
pub(crate) struct ComStmtClose {
    pub(crate) statement_id: u32,
}

impl Encode for ComStmtClose {
    fn encode(&self, buf: &mut Vec<u8>, _: Capabilities) {
        buf.put_u8(0x19);
        buf.put_u32_le(self.statement_id);
    }
}
