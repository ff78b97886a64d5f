use bit_vec::BitVec;

use super::MySqlType;
use crate::error::Result;
use crate::protocol::TypeId;
use crate::type_info::MySqlTypeInfo;

/// `BIT(M)` columns are sent as a big-endian byte string, MSB of the first
/// byte first (§4.7); both protocols agree on this wire form.
impl MySqlType for BitVec {
    fn compatible(ty: &MySqlTypeInfo) -> bool {
        ty.type_id() == TypeId::BIT
    }

    fn decode_text(bytes: &[u8]) -> Result<Self> {
        Ok(BitVec::from_bytes(bytes))
    }

    fn decode_binary(bytes: &[u8]) -> Result<Self> {
        Self::decode_text(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_big_endian_bit_string() {
        let bits = BitVec::decode_text(&[0b1010_0000]).unwrap();
        assert!(bits.get(0).unwrap());
        assert!(!bits.get(1).unwrap());
        assert!(bits.get(2).unwrap());
    }
}
