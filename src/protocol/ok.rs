use crate::error::{Error, Result};
use crate::io::Buf;

use super::status::Status;

/// `OK_Packet` (§4.5), also used for the "deprecated EOF" form (header
/// `0xFE`) when `CLIENT_DEPRECATE_EOF` is negotiated.
#[derive(Debug)]
pub(crate) struct OkPacket {
    pub(crate) affected_rows: u64,
    pub(crate) last_insert_id: u64,
    pub(crate) status: Status,
    pub(crate) warnings: u16,
    pub(crate) info: String,
}

impl OkPacket {
    pub(crate) fn read(mut buf: &[u8]) -> Result<Self> {
        let header = buf.get_u8()?;
        if header != 0x00 && header != 0xFE {
            return Err(Error::protocol(format!(
                "expected OK (0x00) or deprecated-EOF (0xFE); received 0x{header:02X}"
            )));
        }

        let affected_rows = buf.get_uint_lenenc()?.unwrap_or(0);
        let last_insert_id = buf.get_uint_lenenc()?.unwrap_or(0);
        let status = Status::from_bits_truncate(buf.get_u16_le()?);
        let warnings = buf.get_u16_le()?;
        let info = buf.get_str(buf.len())?.to_owned();

        Ok(Self {
            affected_rows,
            last_insert_id,
            status,
            warnings,
            info,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OK_HANDSHAKE: &[u8] = b"\x00\x00\x00\x02\x00\x00\x00";

    #[test]
    fn decodes_a_bare_ok_packet() {
        let p = OkPacket::read(OK_HANDSHAKE).unwrap();
        assert_eq!(p.affected_rows, 0);
        assert_eq!(p.last_insert_id, 0);
        assert!(p.status.contains(Status::SERVER_STATUS_AUTOCOMMIT));
        assert_eq!(p.warnings, 0);
        assert!(p.info.is_empty());
    }
}
