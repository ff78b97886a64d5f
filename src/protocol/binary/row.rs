use std::ops::Range;

use byteorder::{ByteOrder, LittleEndian};
use bytes::Bytes;

use crate::error::{Error, Result};
use crate::io::Buf;
use crate::protocol::type_id::TypeId;

/// One row of a binary-protocol result set (§4.6, §4.7).
///
/// Unlike [`super::super::text::TextRow`], a `NULL` column contributes no
/// bytes at all to the payload; its absence is recorded in the leading null
/// bitmap instead, so the byte ranges below are only ever read for columns
/// the bitmap marks present.
#[derive(Debug)]
pub(crate) struct BinaryRow {
    buffer: Bytes,
    values: Box<[Option<Range<usize>>]>,
}

fn fixed_width(type_id: TypeId) -> Option<usize> {
    match type_id {
        TypeId::TINY => Some(1),
        TypeId::SHORT | TypeId::YEAR => Some(2),
        TypeId::LONG | TypeId::INT24 | TypeId::FLOAT => Some(4),
        TypeId::LONGLONG | TypeId::DOUBLE => Some(8),
        _ => None,
    }
}

/// The wire size of a MySQL lenenc-int, given its leading byte.
fn lenenc_int_size(lead: u8) -> usize {
    match lead {
        0xFC => 3,
        0xFD => 4,
        0xFE => 9,
        _ => 1,
    }
}

impl BinaryRow {
    pub(crate) fn read(payload: Bytes, column_types: &[TypeId]) -> Result<Self> {
        let header = *payload
            .first()
            .ok_or_else(|| Error::protocol("empty binary row payload"))?;
        if header != 0x00 {
            return Err(Error::protocol(format!(
                "expected binary row header (0x00); received 0x{header:02X}"
            )));
        }

        // Null-Bitmap: byte<(num_fields + 7 + 2) / 8>, bit offset by 2.
        let null_bitmap_len = (column_types.len() + 7 + 2) / 8;
        let bitmap_start = 1;
        let bitmap_end = bitmap_start + null_bitmap_len;
        if payload.len() < bitmap_end {
            return Err(Error::protocol("binary row shorter than its null bitmap"));
        }
        let null_bitmap = &payload[bitmap_start..bitmap_end];
        let is_null = |i: usize| {
            let bit = i + 2;
            null_bitmap[bit / 8] & (1 << (bit % 8)) != 0
        };

        let mut values = Vec::with_capacity(column_types.len());
        let mut index = bitmap_end;

        for (i, &type_id) in column_types.iter().enumerate() {
            if is_null(i) {
                values.push(None);
                continue;
            }

            let size = if let Some(n) = fixed_width(type_id) {
                n
            } else if matches!(
                type_id,
                TypeId::DATE | TypeId::TIME | TypeId::TIMESTAMP | TypeId::DATETIME
            ) {
                let len_byte = *payload.get(index).ok_or_else(|| {
                    Error::protocol("unexpected end of row decoding temporal length")
                })?;
                1 + len_byte as usize
            } else {
                // DECIMAL/NEWDECIMAL, every string/blob family, JSON, BIT:
                // a lenenc byte string.
                let lead = *payload
                    .get(index)
                    .ok_or_else(|| Error::protocol("unexpected end of row decoding length"))?;
                let prefix_len = lenenc_int_size(lead);
                let value_len = match prefix_len {
                    1 => lead as usize,
                    3 => LittleEndian::read_u16(&payload[index + 1..]) as usize,
                    4 => LittleEndian::read_u24(&payload[index + 1..]) as usize,
                    _ => LittleEndian::read_u64(&payload[index + 1..]) as usize,
                };
                prefix_len + value_len
            };

            if payload.len() < index + size {
                return Err(Error::protocol("column value runs past end of row"));
            }

            let value_start = if fixed_width(type_id).is_some() {
                index
            } else {
                // skip past the lenenc/date length prefix; callers only
                // want the value bytes.
                index + header_len(type_id, &payload[index..index + size])
            };

            values.push(Some(value_start..(index + size)));
            index += size;
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

/// The number of leading bytes in a column's encoding that are a
/// length/lenenc prefix rather than value bytes.
fn header_len(type_id: TypeId, encoded: &[u8]) -> usize {
    if matches!(
        type_id,
        TypeId::DATE | TypeId::TIME | TypeId::TIMESTAMP | TypeId::DATETIME
    ) {
        return 1;
    }

    lenenc_int_size(encoded[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_fixed_and_lenenc_columns_with_a_null() {
        let mut payload = vec![0x00u8];
        // 3 columns -> bitmap len = (3+7+2)/8 = 1 byte
        // column 1 null (bit index 1+2=3) -> 0b0000_1000
        payload.push(0b0000_1000);
        payload.extend_from_slice(&42i32.to_le_bytes()); // column 0: LONG
        // column 1 is NULL, contributes nothing
        payload.push(3);
        payload.extend_from_slice(b"abc"); // column 2: VARCHAR

        let types = [TypeId::LONG, TypeId::VARCHAR, TypeId::VARCHAR];
        let row = BinaryRow::read(Bytes::from(payload), &types).unwrap();

        assert_eq!(row.get(0), Some(&42i32.to_le_bytes()[..]));
        assert_eq!(row.get(1), None);
        assert_eq!(row.get(2), Some(&b"abc"[..]));
    }

    #[test]
    fn decodes_a_four_byte_date_without_its_length_prefix() {
        let mut payload = vec![0x00u8];
        payload.push(0b0000_0000); // bitmap, 1 column, no nulls
        payload.push(4); // length prefix
        payload.extend_from_slice(&2020u16.to_le_bytes());
        payload.push(1); // month
        payload.push(2); // day

        let row = BinaryRow::read(Bytes::from(payload), &[TypeId::DATE]).unwrap();
        assert_eq!(row.get(0), Some(&[0xE4, 0x07, 1, 2][..]));
    }
}
