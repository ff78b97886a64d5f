/// The raw MySQL column-type byte carried in column definitions and binary
/// parameter type tags.
///
/// Kept as a thin newtype (not a Rust `enum`) over the wire byte, per the
/// REDESIGN FLAGS guidance to model flags/type tags as values rather than
/// enum-with-data stand-ins: unknown type codes from a newer server should
/// decode, not panic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct TypeId(pub(crate) u8);

impl TypeId {
    pub(crate) const DECIMAL: TypeId = TypeId(0);
    pub(crate) const TINY: TypeId = TypeId(1);
    pub(crate) const SHORT: TypeId = TypeId(2);
    pub(crate) const LONG: TypeId = TypeId(3);
    pub(crate) const FLOAT: TypeId = TypeId(4);
    pub(crate) const DOUBLE: TypeId = TypeId(5);
    pub(crate) const NULL: TypeId = TypeId(6);
    pub(crate) const TIMESTAMP: TypeId = TypeId(7);
    pub(crate) const LONGLONG: TypeId = TypeId(8);
    pub(crate) const INT24: TypeId = TypeId(9);
    pub(crate) const DATE: TypeId = TypeId(10);
    pub(crate) const TIME: TypeId = TypeId(11);
    pub(crate) const DATETIME: TypeId = TypeId(12);
    pub(crate) const YEAR: TypeId = TypeId(13);
    pub(crate) const VARCHAR: TypeId = TypeId(15);
    pub(crate) const BIT: TypeId = TypeId(16);
    pub(crate) const JSON: TypeId = TypeId(245);
    pub(crate) const NEWDECIMAL: TypeId = TypeId(246);
    pub(crate) const ENUM: TypeId = TypeId(247);
    pub(crate) const SET: TypeId = TypeId(248);
    pub(crate) const TINY_BLOB: TypeId = TypeId(249);
    pub(crate) const MEDIUM_BLOB: TypeId = TypeId(250);
    pub(crate) const LONG_BLOB: TypeId = TypeId(251);
    pub(crate) const BLOB: TypeId = TypeId(252);
    pub(crate) const VAR_STRING: TypeId = TypeId(253);
    pub(crate) const STRING: TypeId = TypeId(254);
    pub(crate) const GEOMETRY: TypeId = TypeId(255);

    /// Whether the binary protocol encodes this type with a fixed-width
    /// payload (vs. length-encoded). Used by the binary row decoder (C9) to
    /// size payloads without consulting a separate table.
    pub(crate) fn is_fixed_width_binary(self) -> bool {
        matches!(
            self,
            TypeId::TINY
                | TypeId::SHORT
                | TypeId::YEAR
                | TypeId::LONG
                | TypeId::INT24
                | TypeId::LONGLONG
                | TypeId::FLOAT
                | TypeId::DOUBLE
        )
    }
}

impl Default for TypeId {
    fn default() -> Self {
        TypeId::NULL
    }
}

/// The "blob" family shares a type id with text columns in the column
/// definition and differs only by the `BINARY` flag on the column (the wire
/// protocol does not have a separate byte-string column type).
pub(crate) fn is_blob_family(id: TypeId) -> bool {
    matches!(
        id,
        TypeId::TINY_BLOB
            | TypeId::MEDIUM_BLOB
            | TypeId::LONG_BLOB
            | TypeId::BLOB
            | TypeId::VAR_STRING
            | TypeId::STRING
            | TypeId::VARCHAR
    )
}
