use std::str::FromStr;

use bigdecimal::BigDecimal;

use super::MySqlType;
use crate::error::{Error, Result};
use crate::protocol::TypeId;
use crate::type_info::MySqlTypeInfo;

/// `DECIMAL`/`NEWDECIMAL` columns decode as arbitrary-precision
/// [`BigDecimal`] (§4.7); both protocols send the same ASCII decimal text.
impl MySqlType for BigDecimal {
    fn compatible(ty: &MySqlTypeInfo) -> bool {
        matches!(ty.type_id(), TypeId::DECIMAL | TypeId::NEWDECIMAL)
    }

    fn decode_text(bytes: &[u8]) -> Result<Self> {
        let s = std::str::from_utf8(bytes)
            .map_err(|e| Error::protocol(format!("invalid utf-8 in DECIMAL value: {e}")))?;
        BigDecimal::from_str(s)
            .map_err(|e| Error::invalid_argument(format!("invalid DECIMAL text {s:?}: {e}")))
    }

    fn decode_binary(bytes: &[u8]) -> Result<Self> {
        Self::decode_text(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_decimal_text() {
        let d = BigDecimal::decode_text(b"9999999.99").unwrap();
        assert_eq!(d.to_string(), "9999999.99");
    }
}
