use crate::io::BufMut;

use crate::protocol::capabilities::Capabilities;
use crate::protocol::encode::Encode;

/// `COM_STMT_RESET` (0x1A): resets a prepared statement to its just-prepared
/// state, closing any cursor left open by an incomplete fetch loop and
/// clearing previously bound parameter data.
#[derive(Debug)]
pub(crate) struct ComStmtReset {
    pub(crate) statement_id: u32,
}

impl Encode for ComStmtReset {
    fn encode(&self, buf: &mut Vec<u8>, _: Capabilities) {
        buf.put_u8(0x1A);
        buf.put_u32_le(self.statement_id);
    }
}
