use byteorder::{ByteOrder, LittleEndian};

use super::MySqlType;
use crate::error::{Error, Result};
use crate::protocol::TypeId;
use crate::type_info::MySqlTypeInfo;

macro_rules! impl_signed_int {
    ($ty:ty, $decode_binary:expr, $($type_id:path),+) => {
        impl MySqlType for $ty {
            fn compatible(ty: &MySqlTypeInfo) -> bool {
                !ty.is_unsigned() && matches!(ty.type_id(), $($type_id)|+)
            }

            fn decode_text(bytes: &[u8]) -> Result<Self> {
                super::parse_int_text(bytes)
            }

            fn decode_binary(bytes: &[u8]) -> Result<Self> {
                $decode_binary(bytes)
            }
        }
    };
}

impl_signed_int!(
    i8,
    |b: &[u8]| b
        .first()
        .map(|&v| v as i8)
        .ok_or_else(|| Error::protocol("expected 1 byte for TINYINT")),
    TypeId::TINY
);

impl_signed_int!(
    i16,
    |b: &[u8]| {
        if b.len() < 2 {
            return Err(Error::protocol("expected 2 bytes for SMALLINT"));
        }
        Ok(LittleEndian::read_i16(b))
    },
    TypeId::SHORT,
    TypeId::YEAR
);

impl_signed_int!(
    i32,
    |b: &[u8]| {
        if b.len() < 4 {
            return Err(Error::protocol("expected 4 bytes for INT"));
        }
        Ok(LittleEndian::read_i32(b))
    },
    TypeId::LONG,
    TypeId::INT24
);

impl_signed_int!(
    i64,
    |b: &[u8]| {
        if b.len() < 8 {
            return Err(Error::protocol("expected 8 bytes for BIGINT"));
        }
        Ok(LittleEndian::read_i64(b))
    },
    TypeId::LONGLONG
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_i32_text_and_binary() {
        assert_eq!(i32::decode_text(b"-42").unwrap(), -42);
        assert_eq!(i32::decode_binary(&42i32.to_le_bytes()).unwrap(), 42);
    }

    #[test]
    fn out_of_range_text_fails() {
        assert!(i8::decode_text(b"200").is_err());
    }
}
