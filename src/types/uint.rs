use byteorder::{ByteOrder, LittleEndian};

use super::MySqlType;
use crate::error::{Error, Result};
use crate::protocol::TypeId;
use crate::type_info::MySqlTypeInfo;

macro_rules! impl_unsigned_int {
    ($ty:ty, $decode_binary:expr, $($type_id:path),+) => {
        impl MySqlType for $ty {
            fn compatible(ty: &MySqlTypeInfo) -> bool {
                ty.is_unsigned() && matches!(ty.type_id(), $($type_id)|+)
            }

            fn decode_text(bytes: &[u8]) -> Result<Self> {
                super::parse_uint_text(bytes)
            }

            fn decode_binary(bytes: &[u8]) -> Result<Self> {
                $decode_binary(bytes)
            }
        }
    };
}

impl_unsigned_int!(
    u8,
    |b: &[u8]| b
        .first()
        .copied()
        .ok_or_else(|| Error::protocol("expected 1 byte for TINYINT UNSIGNED")),
    TypeId::TINY
);

impl_unsigned_int!(
    u16,
    |b: &[u8]| {
        if b.len() < 2 {
            return Err(Error::protocol("expected 2 bytes for SMALLINT UNSIGNED"));
        }
        Ok(LittleEndian::read_u16(b))
    },
    TypeId::SHORT,
    TypeId::YEAR
);

impl_unsigned_int!(
    u32,
    |b: &[u8]| {
        if b.len() < 4 {
            return Err(Error::protocol("expected 4 bytes for INT UNSIGNED"));
        }
        Ok(LittleEndian::read_u32(b))
    },
    TypeId::LONG,
    TypeId::INT24
);

impl_unsigned_int!(
    u64,
    |b: &[u8]| {
        if b.len() < 8 {
            return Err(Error::protocol("expected 8 bytes for BIGINT UNSIGNED"));
        }
        Ok(LittleEndian::read_u64(b))
    },
    TypeId::LONGLONG
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_bigint_unsigned_at_the_u64_boundary() {
        assert_eq!(
            u64::decode_text(b"18446744073709551615").unwrap(),
            u64::MAX
        );
        assert_eq!(u64::decode_binary(&u64::MAX.to_le_bytes()).unwrap(), u64::MAX);
    }
}
