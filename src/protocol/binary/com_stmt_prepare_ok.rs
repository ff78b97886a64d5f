use crate::error::{Error, Result};
use crate::io::Buf;

/// `COM_STMT_PREPARE_OK`: the header of a successful prepare response,
/// followed by `params` parameter definitions and `columns` column
/// definitions (both elided by this driver, which only needs the counts
/// and types, read directly off the wire as they arrive, §4.6).
#[derive(Debug)]
pub(crate) struct ComStmtPrepareOk {
    pub(crate) statement_id: u32,
    pub(crate) columns: u16,
    pub(crate) params: u16,
    pub(crate) warnings: u16,
}

impl ComStmtPrepareOk {
    pub(crate) fn read(mut buf: &[u8]) -> Result<Self> {
        let header = buf.get_u8()?;
        if header != 0x00 {
            return Err(Error::protocol(format!(
                "expected COM_STMT_PREPARE_OK (0x00); received 0x{header:02X}"
            )));
        }

        let statement_id = buf.get_u32_le()?;
        let columns = buf.get_u16_le()?;
        let params = buf.get_u16_le()?;

        buf.advance(1); // filler

        let warnings = buf.get_u16_le()?;

        Ok(Self {
            statement_id,
            columns,
            params,
            warnings,
        })
    }
}
