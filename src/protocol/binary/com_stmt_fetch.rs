use crate::io::BufMut;

use crate::protocol::capabilities::Capabilities;
use crate::protocol::encode::Encode;

/// `COM_STMT_FETCH` (0x1C): pulls the next `rows` rows of a cursor opened by
/// a `COM_STMT_EXECUTE` with `Cursor::READ_ONLY` (§4.8 one-row-at-a-time
/// streaming).
#[derive(Debug)]
pub(crate) struct ComStmtFetch {
    pub(crate) statement_id: u32,
    pub(crate) rows: u32,
}

impl Encode for ComStmtFetch {
    fn encode(&self, buf: &mut Vec<u8>, _: Capabilities) {
        buf.put_u8(0x1C);
        buf.put_u32_le(self.statement_id);
        buf.put_u32_le(self.rows);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_statement_id_and_row_count() {
        let mut buf = Vec::new();
        ComStmtFetch {
            statement_id: 1,
            rows: 10,
        }
        .encode(&mut buf, Capabilities::empty());
        assert_eq!(&buf[..], b"\x1C\x01\0\0\0\x0A\0\0\0");
    }
}
