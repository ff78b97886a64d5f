use std::fmt::{self, Display, Formatter};

use crate::protocol::{is_binary_collation, ColumnDefinition, ColumnFlags, TypeId};

/// The wire-level type of a column or bound parameter (§3 "Column
/// definition"): a type id plus the handful of flags that change how it
/// decodes (`UNSIGNED`) or what Rust type it's compatible with (`BINARY`).
#[derive(Debug, Clone, Copy)]
pub struct MySqlTypeInfo {
    pub(crate) type_id: TypeId,
    pub(crate) is_unsigned: bool,
    pub(crate) is_binary: bool,
    pub(crate) char_set: u16,
}

impl MySqlTypeInfo {
    pub(crate) const fn new(type_id: TypeId) -> Self {
        Self {
            type_id,
            is_unsigned: false,
            is_binary: false,
            char_set: 0,
        }
    }

    pub(crate) const fn unsigned(type_id: TypeId) -> Self {
        Self {
            type_id,
            is_unsigned: true,
            is_binary: false,
            char_set: 0,
        }
    }

    pub(crate) const fn binary(type_id: TypeId) -> Self {
        Self {
            type_id,
            is_unsigned: false,
            is_binary: true,
            char_set: crate::protocol::BINARY as u16,
        }
    }

    pub(crate) fn from_column(def: &ColumnDefinition) -> Self {
        Self {
            type_id: def.type_id,
            is_unsigned: def.flags.contains(ColumnFlags::UNSIGNED),
            is_binary: def.flags.contains(ColumnFlags::BINARY)
                || is_binary_collation(def.char_set as u8),
            char_set: def.char_set,
        }
    }

    pub(crate) fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub(crate) fn is_unsigned(&self) -> bool {
        self.is_unsigned
    }

    pub(crate) fn is_binary(&self) -> bool {
        self.is_binary
    }

    pub(crate) fn char_set(&self) -> u16 {
        self.char_set
    }

    /// The name reported by [`std::fmt::Display`] and `DatabaseMetaData`
    /// column-type queries (§4.10).
    pub fn name(&self) -> &'static str {
        match self.type_id {
            TypeId::DECIMAL | TypeId::NEWDECIMAL => "DECIMAL",
            TypeId::TINY if self.is_unsigned => "TINYINT UNSIGNED",
            TypeId::TINY => "TINYINT",
            TypeId::SHORT if self.is_unsigned => "SMALLINT UNSIGNED",
            TypeId::SHORT => "SMALLINT",
            TypeId::LONG if self.is_unsigned => "INT UNSIGNED",
            TypeId::LONG => "INT",
            TypeId::FLOAT => "FLOAT",
            TypeId::DOUBLE => "DOUBLE",
            TypeId::NULL => "NULL",
            TypeId::TIMESTAMP => "TIMESTAMP",
            TypeId::LONGLONG if self.is_unsigned => "BIGINT UNSIGNED",
            TypeId::LONGLONG => "BIGINT",
            TypeId::INT24 if self.is_unsigned => "MEDIUMINT UNSIGNED",
            TypeId::INT24 => "MEDIUMINT",
            TypeId::DATE => "DATE",
            TypeId::TIME => "TIME",
            TypeId::DATETIME => "DATETIME",
            TypeId::YEAR => "YEAR",
            TypeId::VARCHAR if self.is_binary => "VARBINARY",
            TypeId::VARCHAR => "VARCHAR",
            TypeId::BIT => "BIT",
            TypeId::JSON => "JSON",
            TypeId::ENUM => "ENUM",
            TypeId::SET => "SET",
            TypeId::TINY_BLOB if self.is_binary => "TINYBLOB",
            TypeId::TINY_BLOB => "TINYTEXT",
            TypeId::MEDIUM_BLOB if self.is_binary => "MEDIUMBLOB",
            TypeId::MEDIUM_BLOB => "MEDIUMTEXT",
            TypeId::LONG_BLOB if self.is_binary => "LONGBLOB",
            TypeId::LONG_BLOB => "LONGTEXT",
            TypeId::BLOB if self.is_binary => "BLOB",
            TypeId::BLOB => "TEXT",
            TypeId::VAR_STRING if self.is_binary => "VARBINARY",
            TypeId::VAR_STRING => "VARCHAR",
            TypeId::STRING if self.is_binary => "BINARY",
            TypeId::STRING => "CHAR",
            TypeId::GEOMETRY => "GEOMETRY",
            _ => "UNKNOWN",
        }
    }
}

impl Display for MySqlTypeInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl PartialEq for MySqlTypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id && self.is_unsigned == other.is_unsigned
    }
}

impl Eq for MySqlTypeInfo {}
