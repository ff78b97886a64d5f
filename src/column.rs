//! Public column metadata (C9), wrapping the wire-level column definition.

use crate::protocol::ColumnDefinition;
use crate::type_info::MySqlTypeInfo;

/// One column of a result set's metadata, as surfaced by
/// `ResultSet::getMetaData` (§4.7).
#[derive(Debug, Clone)]
pub struct MySqlColumn {
    name: String,
    orig_name: Option<String>,
    table: Option<String>,
    schema: Option<String>,
    type_info: MySqlTypeInfo,
    max_size: u32,
    decimals: u8,
    not_null: bool,
    primary_key: bool,
    auto_increment: bool,
    unsigned: bool,
}

impl MySqlColumn {
    pub(crate) fn from_definition(def: ColumnDefinition) -> Self {
        let type_info = MySqlTypeInfo::from_column(&def);
        let not_null = def.flags.contains(crate::protocol::ColumnFlags::NOT_NULL);
        let primary_key = def.flags.contains(crate::protocol::ColumnFlags::PRI_KEY);
        let auto_increment = def.flags.contains(crate::protocol::ColumnFlags::AUTO_INCREMENT);
        let unsigned = def.flags.contains(crate::protocol::ColumnFlags::UNSIGNED);

        Self {
            name: def.name().to_owned(),
            orig_name: def.column.clone(),
            table: def.table.clone(),
            schema: def.schema.clone(),
            type_info,
            max_size: def.max_size,
            decimals: def.decimals,
            not_null,
            primary_key,
            auto_increment,
            unsigned,
        }
    }

    /// The column's label (§4.7 `getColumnName`/`getColumnLabel`): the `AS`
    /// alias if the query gave one, else the underlying column name. This is
    /// what `try_get_by_name` matches against, the same way a result set's
    /// displayed header follows the alias.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The alias a query assigned this column with `AS`, same value as
    /// [`Self::name`] (§4.7 `getColumnLabel`): kept as a distinct accessor
    /// since JDBC-shaped callers ask for the label explicitly rather than
    /// assuming `name()` already is one.
    pub fn column_label(&self) -> &str {
        &self.name
    }

    /// The underlying table column's own name, independent of any `AS`
    /// alias (§4.7 `getColumnName`). Falls back to the label when the
    /// server didn't report an original column name (e.g. a computed
    /// expression with no source column).
    pub fn orig_name(&self) -> &str {
        self.orig_name.as_deref().unwrap_or(&self.name)
    }

    pub fn table_name(&self) -> Option<&str> {
        self.table.as_deref()
    }

    pub fn schema_name(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    pub fn type_info(&self) -> &MySqlTypeInfo {
        &self.type_info
    }

    /// `DatabaseMetaData`'s legacy zero-return behavior for display size and
    /// precision is preserved here too (see DESIGN.md Open Questions): this
    /// driver exposes the server-reported `max_size` directly instead.
    pub fn display_size(&self) -> u32 {
        self.max_size
    }

    pub fn decimal_digits(&self) -> u8 {
        self.decimals
    }

    pub fn is_nullable(&self) -> bool {
        !self.not_null
    }

    pub fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    pub fn is_auto_increment(&self) -> bool {
        self.auto_increment
    }

    /// §4.7 `isSigned`: true unless the column carries `UNSIGNED_FLAG`.
    pub fn is_signed(&self) -> bool {
        !self.unsigned
    }

    /// §4.7 `isReadOnly`: true when the column has no original table, i.e.
    /// it's a computed expression rather than a column of a real table.
    pub fn is_read_only(&self) -> bool {
        self.table.is_none()
    }

    /// §4.7 `isWritable`: the negation of [`Self::is_read_only`].
    pub fn is_writable(&self) -> bool {
        !self.is_read_only()
    }

    /// §4.7 `isDefinitelyWritable`: the negation of [`Self::is_read_only`],
    /// same as [`Self::is_writable`] since this driver has no concept of a
    /// column that's writable only in some circumstances.
    pub fn is_definitely_writable(&self) -> bool {
        !self.is_read_only()
    }

    /// §4.7 `isCurrency`: always `false`; MySQL has no currency column type.
    pub fn is_currency(&self) -> bool {
        false
    }
}
