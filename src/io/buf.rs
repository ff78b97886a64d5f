use byteorder::{ByteOrder, LittleEndian};
use memchr::memchr;

use crate::error::{Error, Result};

/// Reads fixed-width little-endian integers, null-terminated strings, and
/// MySQL length-encoded integers/strings out of a byte slice, advancing it
/// as it goes.
///
/// All MySQL wire integers are little-endian; this trait does not carry a
/// byte-order type parameter the way a general-purpose codec crate would.
pub(crate) trait Buf<'a> {
    fn advance(&mut self, cnt: usize);

    fn get_u8(&mut self) -> Result<u8>;
    fn get_i8(&mut self) -> Result<i8>;
    fn get_u16_le(&mut self) -> Result<u16>;
    fn get_i16_le(&mut self) -> Result<i16>;
    fn get_u24_le(&mut self) -> Result<u32>;
    fn get_u32_le(&mut self) -> Result<u32>;
    fn get_i32_le(&mut self) -> Result<i32>;
    fn get_u64_le(&mut self) -> Result<u64>;
    fn get_i64_le(&mut self) -> Result<i64>;
    fn get_f32_le(&mut self) -> Result<f32>;
    fn get_f64_le(&mut self) -> Result<f64>;

    fn get_bytes(&mut self, len: usize) -> Result<&'a [u8]>;
    fn get_str(&mut self, len: usize) -> Result<&'a str>;
    fn get_str_nul(&mut self) -> Result<&'a str>;
    fn get_bytes_nul(&mut self) -> Result<&'a [u8]>;

    /// A MySQL *length-encoded integer*: a 1/3/4/9-byte tagged varint.
    ///
    /// | first byte | meaning |
    /// |---|---|
    /// | `< 0xFB` | the value itself |
    /// | `0xFB` | `NULL` (only valid where a lenenc-string is expected) |
    /// | `0xFC` | `u16` follows |
    /// | `0xFD` | `u24` follows |
    /// | `0xFE` | `u64` follows |
    fn get_uint_lenenc(&mut self) -> Result<Option<u64>>;

    /// A length-encoded byte string: a lenenc-int length prefix followed by
    /// that many raw bytes. Returns `None` for the `0xFB` NULL marker.
    fn get_bytes_lenenc(&mut self) -> Result<Option<&'a [u8]>>;

    /// As [`get_bytes_lenenc`](Buf::get_bytes_lenenc), decoded as UTF-8.
    fn get_str_lenenc(&mut self) -> Result<Option<&'a str>>;
}

impl<'a> Buf<'a> for &'a [u8] {
    fn advance(&mut self, cnt: usize) {
        *self = &self[cnt..];
    }

    fn get_u8(&mut self) -> Result<u8> {
        let v = *self
            .first()
            .ok_or_else(|| Error::protocol("unexpected end of packet reading u8"))?;
        self.advance(1);
        Ok(v)
    }

    fn get_i8(&mut self) -> Result<i8> {
        Ok(self.get_u8()? as i8)
    }

    fn get_u16_le(&mut self) -> Result<u16> {
        let bytes = self.get_bytes(2)?;
        Ok(LittleEndian::read_u16(bytes))
    }

    fn get_i16_le(&mut self) -> Result<i16> {
        let bytes = self.get_bytes(2)?;
        Ok(LittleEndian::read_i16(bytes))
    }

    fn get_u24_le(&mut self) -> Result<u32> {
        let bytes = self.get_bytes(3)?;
        Ok(LittleEndian::read_u24(bytes))
    }

    fn get_u32_le(&mut self) -> Result<u32> {
        let bytes = self.get_bytes(4)?;
        Ok(LittleEndian::read_u32(bytes))
    }

    fn get_i32_le(&mut self) -> Result<i32> {
        let bytes = self.get_bytes(4)?;
        Ok(LittleEndian::read_i32(bytes))
    }

    fn get_u64_le(&mut self) -> Result<u64> {
        let bytes = self.get_bytes(8)?;
        Ok(LittleEndian::read_u64(bytes))
    }

    fn get_i64_le(&mut self) -> Result<i64> {
        let bytes = self.get_bytes(8)?;
        Ok(LittleEndian::read_i64(bytes))
    }

    fn get_f32_le(&mut self) -> Result<f32> {
        let bytes = self.get_bytes(4)?;
        Ok(LittleEndian::read_f32(bytes))
    }

    fn get_f64_le(&mut self) -> Result<f64> {
        let bytes = self.get_bytes(8)?;
        Ok(LittleEndian::read_f64(bytes))
    }

    fn get_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        if self.len() < len {
            return Err(Error::protocol(format!(
                "unexpected end of packet: wanted {len} bytes, have {}",
                self.len()
            )));
        }
        let (head, tail) = self.split_at(len);
        *self = tail;
        Ok(head)
    }

    fn get_str(&mut self, len: usize) -> Result<&'a str> {
        std::str::from_utf8(self.get_bytes(len)?)
            .map_err(|e| Error::protocol(format!("invalid utf-8 in packet: {e}")))
    }

    fn get_str_nul(&mut self) -> Result<&'a str> {
        std::str::from_utf8(self.get_bytes_nul()?)
            .map_err(|e| Error::protocol(format!("invalid utf-8 in packet: {e}")))
    }

    fn get_bytes_nul(&mut self) -> Result<&'a [u8]> {
        let end = memchr(0, self).ok_or_else(|| {
            Error::protocol("unterminated null-terminated string in packet")
        })?;
        let s = self.get_bytes(end)?;
        self.advance(1);
        Ok(s)
    }

    fn get_uint_lenenc(&mut self) -> Result<Option<u64>> {
        match self.get_u8()? {
            0xFB => Ok(None),
            0xFC => Ok(Some(self.get_u16_le()? as u64)),
            0xFD => Ok(Some(self.get_u24_le()? as u64)),
            0xFE => Ok(Some(self.get_u64_le()?)),
            v => Ok(Some(v as u64)),
        }
    }

    fn get_bytes_lenenc(&mut self) -> Result<Option<&'a [u8]>> {
        match self.get_uint_lenenc()? {
            None => Ok(None),
            Some(len) => Ok(Some(self.get_bytes(len as usize)?)),
        }
    }

    fn get_str_lenenc(&mut self) -> Result<Option<&'a str>> {
        match self.get_bytes_lenenc()? {
            None => Ok(None),
            Some(b) => Ok(Some(
                std::str::from_utf8(b)
                    .map_err(|e| Error::protocol(format!("invalid utf-8 in packet: {e}")))?,
            )),
        }
    }
}

/// The wire length of the lenenc-int encoding of `value`, in bytes.
pub(crate) fn uint_lenenc_size(value: u64) -> usize {
    if value < 0xFB {
        1
    } else if value <= 0xFFFF {
        3
    } else if value <= 0xFF_FFFF {
        4
    } else {
        9
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lenenc_int_roundtrip() {
        for &(bytes, expected) in &[
            (&[0x01u8][..], 1u64),
            (&[0xFC, 0x00, 0x01][..], 256),
            (&[0xFD, 0x01, 0x00, 0x01][..], 65537),
            (&[0xFE, 1, 0, 0, 0, 0, 0, 0, 0][..], 1),
        ] {
            let mut b = bytes;
            assert_eq!(b.get_uint_lenenc().unwrap(), Some(expected));
            assert!(b.is_empty());
        }
    }

    #[test]
    fn lenenc_null_marker() {
        let mut b: &[u8] = &[0xFB];
        assert_eq!(b.get_uint_lenenc().unwrap(), None);
    }

    #[test]
    fn str_nul_stops_at_terminator() {
        let mut b: &[u8] = b"hello\0world";
        assert_eq!(b.get_str_nul().unwrap(), "hello");
        assert_eq!(b, b"world");
    }
}
