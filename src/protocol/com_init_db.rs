use crate::io::BufMut;

use super::capabilities::Capabilities;
use super::encode::Encode;

/// `COM_INIT_DB` (0x02): changes the connection's default schema without a
/// reconnect (§6's `setSchema`).
#[derive(Debug)]
pub(crate) struct ComInitDb<'a> {
    pub(crate) schema: &'a str,
}

impl Encode for ComInitDb<'_> {
    fn encode(&self, buf: &mut Vec<u8>, _: Capabilities) {
        buf.put_u8(0x02);
        buf.extend_from_slice(self.schema.as_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_schema_name_unterminated() {
        let mut buf = Vec::new();
        ComInitDb { schema: "mydb" }.encode(&mut buf, Capabilities::empty());
        assert_eq!(&buf[..], b"\x02mydb");
    }
}
