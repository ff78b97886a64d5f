use crate::error::{Error, Result};
use crate::io::Buf;

use super::column_flags::ColumnFlags;
use super::type_id::TypeId;

/// `Column Definition` (§4.5, §4.7): one entry of the column-count-sized
/// header block that precedes every result set's rows.
#[derive(Debug, Clone)]
pub(crate) struct ColumnDefinition {
    pub(crate) schema: Option<String>,
    pub(crate) table_alias: Option<String>,
    pub(crate) table: Option<String>,
    pub(crate) column_alias: Option<String>,
    pub(crate) column: Option<String>,
    pub(crate) char_set: u16,
    pub(crate) max_size: u32,
    pub(crate) type_id: TypeId,
    pub(crate) flags: ColumnFlags,
    pub(crate) decimals: u8,
}

fn owned_lenenc(buf: &mut &[u8]) -> Result<Option<String>> {
    Ok(buf.get_str_lenenc()?.map(|s| s.to_owned()).filter(|s| !s.is_empty()))
}

impl ColumnDefinition {
    pub(crate) fn read(mut buf: &[u8]) -> Result<Self> {
        let catalog = buf.get_str_lenenc()?.unwrap_or("");
        if catalog != "def" {
            return Err(Error::protocol(format!(
                "unexpected column definition catalog: {catalog:?}"
            )));
        }

        let schema = owned_lenenc(&mut buf)?;
        let table_alias = owned_lenenc(&mut buf)?;
        let table = owned_lenenc(&mut buf)?;
        let column_alias = owned_lenenc(&mut buf)?;
        let column = owned_lenenc(&mut buf)?;

        let len_fixed_fields = buf.get_uint_lenenc()?.unwrap_or(0);
        if len_fixed_fields != 0x0c {
            return Err(Error::protocol(format!(
                "expected 0x0c fixed-length fields in column definition; got {len_fixed_fields}"
            )));
        }

        let char_set = buf.get_u16_le()?;
        let max_size = buf.get_u32_le()?;
        let type_id = TypeId(buf.get_u8()?);
        let flags = ColumnFlags::from_bits_truncate(buf.get_u16_le()?);
        let decimals = buf.get_u8()?;

        // 2 reserved/filler bytes
        buf.advance(2);

        Ok(Self {
            schema,
            table_alias,
            table,
            column_alias,
            column,
            char_set,
            max_size,
            type_id,
            flags,
            decimals,
        })
    }

    pub(crate) fn name(&self) -> &str {
        self.column_alias
            .as_deref()
            .or(self.column.as_deref())
            .unwrap_or("")
    }
}
