use byteorder::{ByteOrder, LittleEndian};

use super::MySqlType;
use crate::error::{Error, Result};
use crate::protocol::TypeId;
use crate::type_info::MySqlTypeInfo;

impl MySqlType for f32 {
    fn compatible(ty: &MySqlTypeInfo) -> bool {
        ty.type_id() == TypeId::FLOAT
    }

    fn decode_text(bytes: &[u8]) -> Result<Self> {
        std::str::from_utf8(bytes)
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| Error::invalid_argument("invalid FLOAT text value"))
    }

    fn decode_binary(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < 4 {
            return Err(Error::protocol("expected 4 bytes for FLOAT"));
        }
        Ok(LittleEndian::read_f32(bytes))
    }
}

impl MySqlType for f64 {
    fn compatible(ty: &MySqlTypeInfo) -> bool {
        ty.type_id() == TypeId::DOUBLE
    }

    fn decode_text(bytes: &[u8]) -> Result<Self> {
        std::str::from_utf8(bytes)
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| Error::invalid_argument("invalid DOUBLE text value"))
    }

    fn decode_binary(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < 8 {
            return Err(Error::protocol("expected 8 bytes for DOUBLE"));
        }
        Ok(LittleEndian::read_f64(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_double_text_and_binary() {
        assert_eq!(f64::decode_text(b"3.5").unwrap(), 3.5);
        assert_eq!(f64::decode_binary(&3.5f64.to_le_bytes()).unwrap(), 3.5);
    }
}
