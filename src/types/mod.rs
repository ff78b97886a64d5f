//! Conversions between Rust types and MySQL's wire types (C8/C9).
//!
//! [`MySqlType`] is the decode half of the codec registry described in
//! DESIGN.md: given a column's or bound-value's raw bytes plus which
//! protocol produced them (text or binary, §4.6/§4.7), decode to a concrete
//! Rust type. The encode half (binary parameter payloads, client-prepared
//! SQL literals) lives in [`crate::arguments`], keyed on the same
//! [`crate::type_info::MySqlTypeInfo`].
//!
//! | Rust type | MySQL type(s) |
//! |---|---|
//! | `bool` | `TINYINT(1)` |
//! | `i8`/`i16`/`i32`/`i64` | `TINYINT`/`SMALLINT`/`INT`/`BIGINT` |
//! | `u8`/`u16`/`u32`/`u64` | the `UNSIGNED` variants of the above |
//! | `f32`/`f64` | `FLOAT`/`DOUBLE` |
//! | `String` | `VARCHAR`, `CHAR`, `TEXT`, `ENUM` |
//! | `Vec<u8>` | `VARBINARY`, `BINARY`, `BLOB` |
//! | `Vec<String>` | `SET` (comma-split) |
//! | `bigdecimal::BigDecimal` | `DECIMAL`, `NEWDECIMAL` |
//! | `time::Date`/`Time`/`PrimitiveDateTime` | `DATE`/`TIME`/`DATETIME`, `TIMESTAMP` |
//! | `serde_json::Value` | `JSON` |
//! | `bit_vec::BitVec` | `BIT` |
//!
//! `Option<T>` decodes a SQL `NULL` to `None` for any `T: MySqlType`.

mod bit;
mod bool_;
mod bytes;
mod decimal;
mod float;
mod int;
mod json;
mod set;
mod str_;
mod temporal;
mod uint;

use crate::error::Result;
use crate::type_info::MySqlTypeInfo;

/// The decode half of a column-type codec (§4.7, §9 codec registry).
///
/// `compatible` lets [`crate::value::MySqlValueRef::try_decode`] reject a
/// type mismatch before attempting to parse bytes; `decode_text`/
/// `decode_binary` then parse the column's raw payload under the protocol
/// that produced it.
pub trait MySqlType: Sized {
    /// Whether a column/parameter of this wire type can decode as `Self`.
    fn compatible(ty: &MySqlTypeInfo) -> bool;

    /// Decodes a text-protocol value: always a UTF-8 SQL-text rendering,
    /// regardless of the column's declared type (§4.7).
    fn decode_text(bytes: &[u8]) -> Result<Self>;

    /// Decodes a binary-protocol value in the type's native wire encoding
    /// (§4.6).
    fn decode_binary(bytes: &[u8]) -> Result<Self>;
}

impl<T: MySqlType> MySqlType for Option<T> {
    fn compatible(ty: &MySqlTypeInfo) -> bool {
        T::compatible(ty)
    }

    fn decode_text(bytes: &[u8]) -> Result<Self> {
        T::decode_text(bytes).map(Some)
    }

    fn decode_binary(bytes: &[u8]) -> Result<Self> {
        T::decode_binary(bytes).map(Some)
    }
}

/// Parses a signed numeric text token with [`atoi`], mapping
/// overflow/garbage to `InvalidArgument` (§4.7).
pub(crate) fn parse_int_text<T: atoi::FromRadix10SignedChecked>(bytes: &[u8]) -> Result<T> {
    atoi::atoi(bytes).ok_or_else(|| {
        crate::error::Error::invalid_argument(format!(
            "could not parse {:?} as an integer column value",
            String::from_utf8_lossy(bytes)
        ))
    })
}

/// As [`parse_int_text`], for unsigned integer columns.
pub(crate) fn parse_uint_text<T: atoi::FromRadix10Checked>(bytes: &[u8]) -> Result<T> {
    atoi::atoi(bytes).ok_or_else(|| {
        crate::error::Error::invalid_argument(format!(
            "could not parse {:?} as an unsigned integer column value",
            String::from_utf8_lossy(bytes)
        ))
    })
}
