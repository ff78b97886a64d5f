//! `MySqlRow` (part of C9): one fetched row plus the shared column metadata
//! needed to decode it.

use std::sync::Arc;

use crate::column::MySqlColumn;
use crate::error::{Error, Result};
use crate::protocol::{BinaryRow, TextRow};
use crate::types::MySqlType;
use crate::value::{MySqlValueFormat, MySqlValueRef};

#[derive(Debug)]
enum Backing {
    Text(TextRow),
    Binary(BinaryRow),
}

/// A single row of a result set (§4.7 `ResultSet.next`/getters).
///
/// Decoding is lazy and per-column: constructing a row does no work beyond
/// slicing out value ranges, and a typed getter decodes only the column it
/// is asked for.
#[derive(Debug)]
pub struct MySqlRow {
    backing: Backing,
    columns: Arc<[MySqlColumn]>,
}

impl MySqlRow {
    pub(crate) fn from_text(row: TextRow, columns: Arc<[MySqlColumn]>) -> Self {
        Self {
            backing: Backing::Text(row),
            columns,
        }
    }

    pub(crate) fn from_binary(row: BinaryRow, columns: Arc<[MySqlColumn]>) -> Self {
        Self {
            backing: Backing::Binary(row),
            columns,
        }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn columns(&self) -> &[MySqlColumn] {
        &self.columns
    }

    fn format(&self) -> MySqlValueFormat {
        match self.backing {
            Backing::Text(_) => MySqlValueFormat::Text,
            Backing::Binary(_) => MySqlValueFormat::Binary,
        }
    }

    fn raw(&self, index: usize) -> Option<&[u8]> {
        match &self.backing {
            Backing::Text(row) => row.get(index),
            Backing::Binary(row) => row.get(index),
        }
    }

    fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| Error::invalid_argument(format!("no column found for name {name:?}")))
    }

    fn value_ref(&self, index: usize) -> Result<MySqlValueRef<'_>> {
        let column = self
            .columns
            .get(index)
            .ok_or_else(|| Error::invalid_argument(format!("column index {index} out of bounds")))?;

        Ok(MySqlValueRef::new(
            column.type_info().clone(),
            self.format(),
            self.raw(index),
        ))
    }

    /// `true` if the last value fetched by index (or by name) was `NULL`.
    ///
    /// Provided for parity with the JDBC `wasNull()` idiom; typed getters
    /// already return the absence of a value as part of their `Result`
    /// (`Option<T>` for nullable columns, an error for non-nullable ones),
    /// so most callers won't need this separately.
    pub fn was_null(&self, index: usize) -> Result<bool> {
        Ok(self.value_ref(index)?.is_null())
    }

    /// Decodes the column at `index` as `T`. `NULL` decodes to `None`; a
    /// zero-date value (`'0000-00-00'` and its `DATETIME` sibling) decodes
    /// to `None` too when the column is nullable, and otherwise propagates
    /// as `Error::ZeroDate` (§4.7's "null if nullable else error" default).
    /// Every other `T::decode_*` error propagates unconditionally.
    pub fn try_get<T: MySqlType>(&self, index: usize) -> Result<Option<T>> {
        let value = self.value_ref(index)?;
        if value.is_null() {
            return Ok(None);
        }

        match value.try_decode() {
            Ok(decoded) => Ok(Some(decoded)),
            Err(Error::ZeroDate(_)) if self.columns[index].is_nullable() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// As [`Self::try_get`], but looks the column up by name (case-
    /// insensitive, per §4.7).
    pub fn try_get_by_name<T: MySqlType>(&self, name: &str) -> Result<Option<T>> {
        self.try_get(self.column_index(name)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::ColumnDefinition;
    use bytes::Bytes;

    fn columns(names: &[&str]) -> Arc<[MySqlColumn]> {
        names
            .iter()
            .map(|name| {
                MySqlColumn::from_definition(ColumnDefinition {
                    schema: None,
                    table_alias: None,
                    table: None,
                    column_alias: None,
                    column: Some((*name).to_owned()),
                    char_set: crate::protocol::UTF8MB4_GENERAL_CI as u16,
                    max_size: 255,
                    type_id: crate::protocol::TypeId::VARCHAR,
                    flags: crate::protocol::ColumnFlags::empty(),
                    decimals: 0,
                })
            })
            .collect()
    }

    #[test]
    fn decodes_text_row_and_reports_null() {
        let mut payload = Vec::new();
        payload.push(3);
        payload.extend_from_slice(b"abc");
        payload.push(0xFB);

        let text_row = TextRow::read(Bytes::from(payload), 2).unwrap();
        let row = MySqlRow::from_text(text_row, columns(&["a", "b"]));

        assert_eq!(row.try_get::<String>(0).unwrap().as_deref(), Some("abc"));
        assert_eq!(row.try_get::<String>(1).unwrap(), None);
        assert!(row.was_null(1).unwrap());
        assert!(!row.was_null(0).unwrap());
    }

    #[test]
    fn looks_up_columns_by_name_case_insensitively() {
        let mut payload = Vec::new();
        payload.push(3);
        payload.extend_from_slice(b"abc");

        let text_row = TextRow::read(Bytes::from(payload), 1).unwrap();
        let row = MySqlRow::from_text(text_row, columns(&["Name"]));

        assert_eq!(
            row.try_get_by_name::<String>("name").unwrap().as_deref(),
            Some("abc")
        );
        assert!(row.try_get_by_name::<String>("missing").is_err());
    }
}
