use super::MySqlType;
use crate::error::Result;
use crate::protocol::type_id::is_blob_family;
use crate::type_info::MySqlTypeInfo;

/// Any binary-flagged blob-family column (`VARBINARY`, `BINARY`, `BLOB`) and
/// `JSON`/`GEOMETRY` raw payloads (§4.7 "Bytes"). The text and binary
/// protocols agree on the wire form: a length-prefixed byte string.
impl MySqlType for Vec<u8> {
    fn compatible(ty: &MySqlTypeInfo) -> bool {
        ty.is_binary() && is_blob_family(ty.type_id())
            || matches!(
                ty.type_id(),
                crate::protocol::TypeId::JSON | crate::protocol::TypeId::GEOMETRY
            )
    }

    fn decode_text(bytes: &[u8]) -> Result<Self> {
        Ok(bytes.to_vec())
    }

    fn decode_binary(bytes: &[u8]) -> Result<Self> {
        Ok(bytes.to_vec())
    }
}
