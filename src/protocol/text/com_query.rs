use crate::io::BufMut;

use crate::protocol::capabilities::Capabilities;
use crate::protocol::encode::Encode;

/// `COM_QUERY` (0x03): the text protocol's single request packet, the SQL
/// text with any argument literals already substituted in (§4.6).
#[derive(Debug)]
pub(crate) struct ComQuery<'a> {
    pub(crate) sql: &'a str,
}

impl Encode for ComQuery<'_> {
    fn encode(&self, buf: &mut Vec<u8>, _: Capabilities) {
        buf.put_u8(0x03);
        buf.extend_from_slice(self.sql.as_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_header_and_sql_text() {
        let mut buf = Vec::new();
        ComQuery { sql: "SELECT 1" }.encode(&mut buf, Capabilities::empty());
        assert_eq!(&buf, b"\x03SELECT 1");
    }
}
