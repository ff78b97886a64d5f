use crate::error::Result;
use crate::io::Buf;

/// The leading lenenc-int of a `COM_QUERY`/`COM_STMT_EXECUTE` response that
/// carries a result set: the number of columns that follow (§4.5).
#[derive(Debug)]
pub(crate) struct ColumnCount {
    pub(crate) columns: u64,
}

impl ColumnCount {
    pub(crate) fn read(mut buf: &[u8]) -> Result<Self> {
        let columns = buf.get_uint_lenenc()?.unwrap_or(0);
        Ok(Self { columns })
    }
}
