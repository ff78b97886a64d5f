use super::MySqlType;
use crate::error::Result;
use crate::protocol::TypeId;
use crate::type_info::MySqlTypeInfo;

/// `BOOLEAN` is a `TINYINT(1)` alias on the wire; MySQL sends no separate
/// boolean type id (§4.7).
impl MySqlType for bool {
    fn compatible(ty: &MySqlTypeInfo) -> bool {
        matches!(
            ty.type_id(),
            TypeId::TINY | TypeId::SHORT | TypeId::LONG | TypeId::LONGLONG | TypeId::INT24
        )
    }

    fn decode_text(bytes: &[u8]) -> Result<Self> {
        match bytes {
            b"0" => Ok(false),
            _ => {
                if let Ok(s) = std::str::from_utf8(bytes) {
                    match s.to_ascii_lowercase().as_str() {
                        "true" | "t" | "yes" | "y" | "1" => return Ok(true),
                        "false" | "f" | "no" | "n" | "0" => return Ok(false),
                        _ => {}
                    }
                }
                // Fall back to "any non-zero numeric text is true" (§4.7).
                Ok(super::parse_int_text::<i64>(bytes)? != 0)
            }
        }
    }

    fn decode_binary(bytes: &[u8]) -> Result<Self> {
        Ok(bytes.first().copied().unwrap_or(0) != 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_common_text_spellings() {
        assert!(bool::decode_text(b"true").unwrap());
        assert!(bool::decode_text(b"Y").unwrap());
        assert!(bool::decode_text(b"1").unwrap());
        assert!(!bool::decode_text(b"0").unwrap());
        assert!(!bool::decode_text(b"no").unwrap());
    }

    #[test]
    fn decodes_binary_byte() {
        assert!(bool::decode_binary(&[1]).unwrap());
        assert!(!bool::decode_binary(&[0]).unwrap());
    }
}
