use byteorder::{ByteOrder, LittleEndian};

use super::buf::uint_lenenc_size;

/// Writes the MySQL wire encodings (C1) into a growable byte buffer.
pub(crate) trait BufMut {
    fn put_u8(&mut self, v: u8);
    fn put_i8(&mut self, v: i8);
    fn put_u16_le(&mut self, v: u16);
    fn put_u24_le(&mut self, v: u32);
    fn put_u32_le(&mut self, v: u32);
    fn put_i32_le(&mut self, v: i32);
    fn put_u64_le(&mut self, v: u64);
    fn put_i64_le(&mut self, v: i64);
    fn put_f32_le(&mut self, v: f32);
    fn put_f64_le(&mut self, v: f64);

    fn put_str_nul(&mut self, s: &str);
    fn put_bytes_nul(&mut self, b: &[u8]);

    /// Encodes `value` as a MySQL length-encoded integer.
    fn put_uint_lenenc(&mut self, value: u64);

    /// Encodes `bytes` as a lenenc-int length prefix followed by the bytes.
    fn put_bytes_lenenc(&mut self, bytes: &[u8]);

    fn put_str_lenenc(&mut self, s: &str) {
        self.put_bytes_lenenc(s.as_bytes());
    }
}

impl BufMut for Vec<u8> {
    fn put_u8(&mut self, v: u8) {
        self.push(v);
    }

    fn put_i8(&mut self, v: i8) {
        self.push(v as u8);
    }

    fn put_u16_le(&mut self, v: u16) {
        let mut b = [0u8; 2];
        LittleEndian::write_u16(&mut b, v);
        self.extend_from_slice(&b);
    }

    fn put_u24_le(&mut self, v: u32) {
        let mut b = [0u8; 4];
        LittleEndian::write_u32(&mut b, v);
        self.extend_from_slice(&b[..3]);
    }

    fn put_u32_le(&mut self, v: u32) {
        let mut b = [0u8; 4];
        LittleEndian::write_u32(&mut b, v);
        self.extend_from_slice(&b);
    }

    fn put_i32_le(&mut self, v: i32) {
        let mut b = [0u8; 4];
        LittleEndian::write_i32(&mut b, v);
        self.extend_from_slice(&b);
    }

    fn put_u64_le(&mut self, v: u64) {
        let mut b = [0u8; 8];
        LittleEndian::write_u64(&mut b, v);
        self.extend_from_slice(&b);
    }

    fn put_i64_le(&mut self, v: i64) {
        let mut b = [0u8; 8];
        LittleEndian::write_i64(&mut b, v);
        self.extend_from_slice(&b);
    }

    fn put_f32_le(&mut self, v: f32) {
        let mut b = [0u8; 4];
        LittleEndian::write_f32(&mut b, v);
        self.extend_from_slice(&b);
    }

    fn put_f64_le(&mut self, v: f64) {
        let mut b = [0u8; 8];
        LittleEndian::write_f64(&mut b, v);
        self.extend_from_slice(&b);
    }

    fn put_str_nul(&mut self, s: &str) {
        self.extend_from_slice(s.as_bytes());
        self.push(0);
    }

    fn put_bytes_nul(&mut self, b: &[u8]) {
        self.extend_from_slice(b);
        self.push(0);
    }

    fn put_uint_lenenc(&mut self, value: u64) {
        match uint_lenenc_size(value) {
            1 => self.put_u8(value as u8),
            3 => {
                self.put_u8(0xFC);
                self.put_u16_le(value as u16);
            }
            4 => {
                self.put_u8(0xFD);
                self.put_u24_le(value as u32);
            }
            _ => {
                self.put_u8(0xFE);
                self.put_u64_le(value);
            }
        }
    }

    fn put_bytes_lenenc(&mut self, bytes: &[u8]) {
        self.put_uint_lenenc(bytes.len() as u64);
        self.extend_from_slice(bytes);
    }
}
