use super::MySqlType;
use crate::error::{Error, Result};
use crate::protocol::type_id::is_blob_family;
use crate::type_info::MySqlTypeInfo;

/// `VARCHAR`/`CHAR`/`TEXT`/`ENUM` columns, and any non-binary blob-family
/// column (§4.7). Binary-flagged columns of the same type ids decode as
/// `Vec<u8>` instead; see [`super::bytes`].
impl MySqlType for String {
    fn compatible(ty: &MySqlTypeInfo) -> bool {
        !ty.is_binary() && (is_blob_family(ty.type_id()) || ty.type_id() == crate::protocol::TypeId::ENUM)
    }

    fn decode_text(bytes: &[u8]) -> Result<Self> {
        Ok(std::str::from_utf8(bytes)
            .map_err(|e| Error::protocol(format!("invalid utf-8 in text value: {e}")))?
            .to_owned())
    }

    fn decode_binary(bytes: &[u8]) -> Result<Self> {
        Self::decode_text(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_utf8_text() {
        assert_eq!(String::decode_text("héllo".as_bytes()).unwrap(), "héllo");
    }
}
