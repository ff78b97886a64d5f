use crate::error::{Error, Result};
use crate::io::Buf;

use super::status::Status;

/// `EOF_Packet`, the non-deprecated result-set terminator (§4.5).
#[derive(Debug)]
pub(crate) struct EofPacket {
    pub(crate) warnings: u16,
    pub(crate) status: Status,
}

impl EofPacket {
    pub(crate) fn read(mut buf: &[u8]) -> Result<Self> {
        let header = buf.get_u8()?;
        if header != 0xFE {
            return Err(Error::protocol(format!(
                "expected EOF (0xFE); received 0x{header:02X}"
            )));
        }

        let warnings = buf.get_u16_le()?;
        let status = Status::from_bits_truncate(buf.get_u16_le()?);

        Ok(Self { warnings, status })
    }
}
