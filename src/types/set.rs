use super::MySqlType;
use crate::error::{Error, Result};
use crate::protocol::TypeId;
use crate::type_info::MySqlTypeInfo;

/// `SET` columns decode as their comma-split member list (§4.7). MySQL never
/// quotes or escapes individual members, so a plain `split(',')` is exact.
impl MySqlType for Vec<String> {
    fn compatible(ty: &MySqlTypeInfo) -> bool {
        ty.type_id() == TypeId::SET
    }

    fn decode_text(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Ok(Vec::new());
        }
        let s = std::str::from_utf8(bytes)
            .map_err(|e| Error::protocol(format!("invalid utf-8 in SET value: {e}")))?;
        Ok(s.split(',').map(str::to_owned).collect())
    }

    fn decode_binary(bytes: &[u8]) -> Result<Self> {
        Self::decode_text(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_members_on_comma() {
        assert_eq!(
            Vec::<String>::decode_text(b"a,b").unwrap(),
            vec!["a".to_owned(), "b".to_owned()]
        );
    }

    #[test]
    fn empty_set_decodes_to_empty_vec() {
        assert_eq!(Vec::<String>::decode_text(b"").unwrap(), Vec::<String>::new());
    }
}
