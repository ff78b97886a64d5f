use crate::error::{Error, Result};
use crate::io::Buf;

/// `ERR_Packet` (§4.5, §7): a server-side error, always carrying a SQLState.
#[derive(Debug, Clone)]
pub(crate) struct ErrPacket {
    pub(crate) error_code: u16,
    pub(crate) sql_state: String,
    pub(crate) error_message: String,
}

impl ErrPacket {
    pub(crate) fn read(mut buf: &[u8]) -> Result<Self> {
        let header = buf.get_u8()?;
        if header != 0xFF {
            return Err(Error::protocol(format!(
                "expected ERR (0xFF); received 0x{header:02X}"
            )));
        }

        let error_code = buf.get_u16_le()?;

        // SQLState marker '#' then 5-byte state, only present once
        // CLIENT_PROTOCOL_41 is negotiated, which this driver always does.
        let _marker = buf.get_u8()?;
        let sql_state = buf.get_str(5)?.to_owned();
        let error_message = buf.get_str(buf.len())?.to_owned();

        Ok(Self {
            error_code,
            sql_state,
            error_message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ERR_UNKNOWN_DB: &[u8] = b"\xff\x19\x04#42000Unknown database 'unknown'";

    #[test]
    fn decodes_unknown_database_error() {
        let p = ErrPacket::read(ERR_UNKNOWN_DB).unwrap();
        assert_eq!(p.error_code, 1049);
        assert_eq!(p.sql_state, "42000");
        assert_eq!(p.error_message, "Unknown database 'unknown'");
    }
}
