use serde_json::Value;

use super::MySqlType;
use crate::error::{Error, Result};
use crate::protocol::TypeId;
use crate::type_info::MySqlTypeInfo;

/// `JSON` columns send their textual representation on both protocols; MySQL
/// does not use its own binary JSON wire format over the client protocol.
impl MySqlType for Value {
    fn compatible(ty: &MySqlTypeInfo) -> bool {
        ty.type_id() == TypeId::JSON
    }

    fn decode_text(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| Error::invalid_argument(format!("invalid JSON value: {e}")))
    }

    fn decode_binary(bytes: &[u8]) -> Result<Self> {
        Self::decode_text(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_a_json_object() {
        let v = Value::decode_text(br#"{"a":1}"#).unwrap();
        assert_eq!(v["a"], 1);
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(Value::decode_text(b"{not json").is_err());
    }
}
