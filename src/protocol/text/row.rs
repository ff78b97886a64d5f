use std::ops::Range;

use bytes::Bytes;

use crate::error::Result;
use crate::io::Buf;

/// One row of a text-protocol result set (§4.6, §4.7): every non-`NULL`
/// column is a length-encoded string, regardless of its declared type.
///
/// Holds the packet's payload once and stores byte ranges into it rather
/// than allocating per-column, so a row with many columns costs one
/// allocation instead of one per column.
#[derive(Debug)]
pub(crate) struct TextRow {
    buffer: Bytes,
    values: Box<[Option<Range<usize>>]>,
}

impl TextRow {
    pub(crate) fn read(payload: Bytes, column_count: usize) -> Result<Self> {
        let mut buf: &[u8] = &payload;
        let mut values = Vec::with_capacity(column_count);

        for _ in 0..column_count {
            match buf.get_bytes_lenenc()? {
                None => values.push(None),
                Some(bytes) => {
                    let end = payload.len() - buf.len();
                    let start = end - bytes.len();
                    values.push(Some(start..end));
                }
            }
        }

        Ok(Self {
            buffer: payload,
            values: values.into_boxed_slice(),
        })
    }

    pub(crate) fn len(&self) -> usize {
        self.values.len()
    }

    pub(crate) fn get(&self, index: usize) -> Option<&[u8]> {
        let range = self.values[index].as_ref()?;
        Some(&self.buffer[range.start..range.end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_mixed_null_and_value_columns() {
        let mut payload = Vec::new();
        payload.push(0x01);
        payload.extend_from_slice(b"1");
        payload.push(0xFB); // NULL
        payload.push(0x03);
        payload.extend_from_slice(b"abc");

        let row = TextRow::read(Bytes::from(payload), 3).unwrap();
        assert_eq!(row.get(0), Some(&b"1"[..]));
        assert_eq!(row.get(1), None);
        assert_eq!(row.get(2), Some(&b"abc"[..]));
    }
}
