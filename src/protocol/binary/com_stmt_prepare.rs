use crate::io::BufMut;

use crate::protocol::capabilities::Capabilities;
use crate::protocol::encode::Encode;

/// `COM_STMT_PREPARE` (0x16): ask the server to prepare `sql` and report
/// back a statement id plus its parameter and result column counts.
#[derive(Debug)]
pub(crate) struct ComStmtPrepare<'a> {
    pub(crate) sql: &'a str,
}

impl Encode for ComStmtPrepare<'_> {
    fn encode(&self, buf: &mut Vec<u8>, _: Capabilities) {
        buf.put_u8(0x16);
        buf.extend_from_slice(self.sql.as_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_header_and_sql_text() {
        let mut buf = Vec::new();
        ComStmtPrepare {
            sql: "SELECT * FROM t WHERE id = ?",
        }
        .encode(&mut buf, Capabilities::empty());
        assert_eq!(&buf[..], &b"\x16SELECT * FROM t WHERE id = ?"[..]);
    }
}
