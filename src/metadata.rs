//! The database metadata provider (C12, §4.10): JDBC-style catalog
//! introspection backed by `information_schema` queries plus a handful of
//! driver-constant answers.
//!
//! Every `get*` method here returns an ordinary [`MySqlResultSet`], the same
//! type a regular query produces — `DatabaseMetaData` is just a fixed menu
//! of `information_schema` queries with a stable column shape, not a
//! separate wire mechanism. The `database_term` option decides which side of
//! `information_schema`'s schema/catalog distinction this driver calls
//! "catalog" and which it calls "schema" (MySQL has no catalogs of its own;
//! `information_schema.schemata.SCHEMA_NAME` plays both roles depending on
//! the caller's convention).

use crate::connection::MySqlConnection;
use crate::error::Result;
use crate::options::DatabaseTerm;
use crate::result_set::MySqlResultSet;

/// `` ` `` (§4.10): the identifier quote character.
pub const IDENTIFIER_QUOTE_STRING: &str = "`";
/// `\` (§4.10): the wildcard escape character for `LIKE`-style search
/// patterns passed to the `get*` methods below.
pub const SEARCH_STRING_ESCAPE: &str = "\\";
/// `#@` (§4.10): characters, beyond `a-zA-Z0-9_`, allowed in an unquoted
/// MySQL identifier.
pub const EXTRA_NAME_CHARACTERS: &str = "#@";

pub const DRIVER_NAME: &str = "mysql-native";
pub const DRIVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Reserved words this driver adds on top of the ANSI SQL-92 keyword list
/// (§4.10's "reserved-keyword list"), i.e. `DatabaseMetaData.getSQLKeywords`.
pub const RESERVED_WORDS: &[&str] = &[
    "ACCESSIBLE", "ANALYZE", "ASENSITIVE", "BEFORE", "BIGINT", "BINARY", "BLOB", "CALL",
    "CHANGE", "CONDITION", "DATABASE", "DATABASES", "DAY_HOUR", "DAY_MICROSECOND",
    "DAY_MINUTE", "DAY_SECOND", "DELAYED", "DETERMINISTIC", "DISTINCTROW", "DIV", "DUAL",
    "EACH", "ELSEIF", "ENCLOSED", "ESCAPED", "EXIT", "EXPLAIN", "FLOAT4", "FLOAT8", "FORCE",
    "FULLTEXT", "GENERATED", "HIGH_PRIORITY", "HOUR_MICROSECOND", "HOUR_MINUTE",
    "HOUR_SECOND", "IF", "IGNORE", "INFILE", "INOUT", "INT1", "INT2", "INT3", "INT4", "INT8",
    "ITERATE", "KEY", "KEYS", "KILL", "LEAVE", "LIMIT", "LINEAR", "LINES", "LOAD", "LOCALTIME",
    "LOCALTIMESTAMP", "LOCK", "LONG", "LONGBLOB", "LONGTEXT", "LOOP", "LOW_PRIORITY",
    "MASTER_SSL_VERIFY_SERVER_CERT", "MAXVALUE", "MEDIUMBLOB", "MEDIUMINT", "MEDIUMTEXT",
    "MIDDLEINT", "MINUTE_MICROSECOND", "MINUTE_SECOND", "MOD", "MODIFIES", "NO_WRITE_TO_BINLOG",
    "OPTIMIZE", "OPTIONALLY", "OUT", "OUTFILE", "PURGE", "RANGE", "READS", "READ_WRITE",
    "REGEXP", "RELEASE", "RENAME", "REPEAT", "REPLACE", "REQUIRE", "RESIGNAL", "RESTRICT",
    "RETURN", "RLIKE", "SCHEMAS", "SECOND_MICROSECOND", "SENSITIVE", "SEPARATOR", "SHOW",
    "SIGNAL", "SPATIAL", "SPECIFIC", "SQLEXCEPTION", "SQL_BIG_RESULT", "SQL_CALC_FOUND_ROWS",
    "SQL_SMALL_RESULT", "SSL", "STARTING", "STRAIGHT_JOIN", "TERMINATED", "TINYBLOB",
    "TINYINT", "TINYTEXT", "TRIGGER", "UNDO", "UNLOCK", "UNSIGNED", "USE", "UTC_DATE",
    "UTC_TIME", "UTC_TIMESTAMP", "VARBINARY", "VARCHARACTER", "WHILE", "X509", "XOR",
    "YEAR_MONTH", "ZEROFILL",
];

fn quote_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for ch in s.chars() {
        match ch {
            '\'' => out.push_str("''"),
            '\\' => out.push_str("\\\\"),
            _ => out.push(ch),
        }
    }
    out.push('\'');
    out
}

/// Renders an optional filter as `column = 'literal'`, or `TRUE` (match
/// everything) when `None`, the convention every `get*` query below uses
/// for its pattern arguments.
fn filter(column: &str, value: Option<&str>) -> String {
    match value {
        Some(v) => format!("{column} = {}", quote_literal(v)),
        None => "TRUE".to_owned(),
    }
}

/// `information_schema.schemata.SCHEMA_NAME`'s role: "catalog" under
/// [`DatabaseTerm::Catalog`], "schema" otherwise (§4.10).
fn schema_alias(term: DatabaseTerm) -> &'static str {
    match term {
        DatabaseTerm::Catalog => "TABLE_CAT",
        DatabaseTerm::Schema => "TABLE_SCHEM",
    }
}

/// A façade over `information_schema` answering JDBC-style catalog
/// questions (§4.10). Borrows the connection for the lifetime of each
/// query; holds no state of its own beyond that borrow.
pub struct MySqlDatabaseMetaData<'c> {
    conn: &'c mut MySqlConnection,
}

impl<'c> MySqlDatabaseMetaData<'c> {
    pub(crate) fn new(conn: &'c mut MySqlConnection) -> Self {
        Self { conn }
    }

    fn database_term(&self) -> DatabaseTerm {
        self.conn.options().database_term
    }

    pub fn driver_name(&self) -> &'static str {
        DRIVER_NAME
    }

    pub fn driver_version(&self) -> &'static str {
        DRIVER_VERSION
    }

    pub fn database_product_name(&self) -> &'static str {
        "MySQL"
    }

    pub fn database_product_version(&self) -> &str {
        self.conn.server_version()
    }

    pub fn identifier_quote_string(&self) -> &'static str {
        IDENTIFIER_QUOTE_STRING
    }

    pub fn search_string_escape(&self) -> &'static str {
        SEARCH_STRING_ESCAPE
    }

    pub fn extra_name_characters(&self) -> &'static str {
        EXTRA_NAME_CHARACTERS
    }

    pub fn sql_keywords(&self) -> &'static [&'static str] {
        RESERVED_WORDS
    }

    /// `getCatalogs()` (§4.10): every distinct catalog name. Under
    /// `DatabaseTerm::Schema` this driver reports MySQL's single implicit
    /// catalog (`"def"`), matching how `information_schema` itself names it.
    pub async fn get_catalogs(&mut self) -> Result<MySqlResultSet> {
        let sql = match self.database_term() {
            DatabaseTerm::Catalog => {
                "SELECT SCHEMA_NAME AS TABLE_CAT FROM information_schema.SCHEMATA ORDER BY SCHEMA_NAME".to_owned()
            }
            DatabaseTerm::Schema => "SELECT 'def' AS TABLE_CAT".to_owned(),
        };
        self.conn.query(&sql).await
    }

    /// `getSchemas()` (§4.10): every distinct schema name, paired with the
    /// catalog it belongs to under the current `database_term`.
    pub async fn get_schemas(&mut self) -> Result<MySqlResultSet> {
        let sql = match self.database_term() {
            DatabaseTerm::Catalog => "SELECT NULL AS TABLE_SCHEM, SCHEMA_NAME AS TABLE_CATALOG \
                 FROM information_schema.SCHEMATA WHERE FALSE"
                .to_owned(),
            DatabaseTerm::Schema => {
                "SELECT SCHEMA_NAME AS TABLE_SCHEM, 'def' AS TABLE_CATALOG \
                 FROM information_schema.SCHEMATA ORDER BY SCHEMA_NAME"
                    .to_owned()
            }
        };
        self.conn.query(&sql).await
    }

    /// `getTableTypes()` (§4.10): the fixed list MySQL's `information_schema`
    /// distinguishes (`TABLE_TYPE` values, plus `VIEW`/`SYSTEM VIEW`).
    pub async fn get_table_types(&mut self) -> Result<MySqlResultSet> {
        self.conn
            .query(
                "SELECT 'TABLE' AS TABLE_TYPE UNION ALL SELECT 'VIEW' \
                 UNION ALL SELECT 'SYSTEM VIEW' ORDER BY TABLE_TYPE",
            )
            .await
    }

    /// `getTables(catalog, schemaPattern, tableNamePattern, types)` (§4.10).
    pub async fn get_tables(&mut self, schema: Option<&str>, table_name: Option<&str>) -> Result<MySqlResultSet> {
        let cat = schema_alias(self.database_term());
        let sql = format!(
            "SELECT TABLE_SCHEMA AS {cat}, TABLE_NAME, \
             CASE TABLE_TYPE WHEN 'BASE TABLE' THEN 'TABLE' ELSE TABLE_TYPE END AS TABLE_TYPE, \
             TABLE_COMMENT AS REMARKS \
             FROM information_schema.TABLES \
             WHERE {} AND {} \
             ORDER BY TABLE_SCHEMA, TABLE_NAME",
            filter("TABLE_SCHEMA", schema),
            filter("TABLE_NAME", table_name),
        );
        self.conn.query(&sql).await
    }

    /// `getColumns(catalog, schemaPattern, tableNamePattern, columnNamePattern)`
    /// (§4.10).
    pub async fn get_columns(
        &mut self,
        schema: Option<&str>,
        table_name: Option<&str>,
        column_name: Option<&str>,
    ) -> Result<MySqlResultSet> {
        let cat = schema_alias(self.database_term());
        let sql = format!(
            "SELECT TABLE_SCHEMA AS {cat}, TABLE_NAME, COLUMN_NAME, DATA_TYPE AS TYPE_NAME, \
             CHARACTER_MAXIMUM_LENGTH AS COLUMN_SIZE, NUMERIC_SCALE AS DECIMAL_DIGITS, \
             IS_NULLABLE, COLUMN_DEFAULT, ORDINAL_POSITION, COLUMN_COMMENT AS REMARKS, \
             EXTRA \
             FROM information_schema.COLUMNS \
             WHERE {} AND {} AND {} \
             ORDER BY TABLE_SCHEMA, TABLE_NAME, ORDINAL_POSITION",
            filter("TABLE_SCHEMA", schema),
            filter("TABLE_NAME", table_name),
            filter("COLUMN_NAME", column_name),
        );
        self.conn.query(&sql).await
    }

    /// `getPrimaryKeys(catalog, schema, table)` (§4.10).
    pub async fn get_primary_keys(&mut self, schema: Option<&str>, table_name: &str) -> Result<MySqlResultSet> {
        let cat = schema_alias(self.database_term());
        let sql = format!(
            "SELECT TABLE_SCHEMA AS {cat}, TABLE_NAME, COLUMN_NAME, \
             ORDINAL_POSITION AS KEY_SEQ, CONSTRAINT_NAME AS PK_NAME \
             FROM information_schema.KEY_COLUMN_USAGE \
             WHERE CONSTRAINT_NAME = 'PRIMARY' AND {} AND TABLE_NAME = {} \
             ORDER BY ORDINAL_POSITION",
            filter("TABLE_SCHEMA", schema),
            quote_literal(table_name),
        );
        self.conn.query(&sql).await
    }

    /// `getImportedKeys(catalog, schema, table)` (§4.10): foreign keys
    /// `table` declares, pointing at other tables.
    pub async fn get_imported_keys(&mut self, schema: Option<&str>, table_name: &str) -> Result<MySqlResultSet> {
        self.get_reference_keys(schema, Some(table_name), None, None)
            .await
    }

    /// `getExportedKeys(catalog, schema, table)` (§4.10): foreign keys in
    /// other tables that point at `table`.
    pub async fn get_exported_keys(&mut self, schema: Option<&str>, table_name: &str) -> Result<MySqlResultSet> {
        self.get_reference_keys(None, None, schema, Some(table_name))
            .await
    }

    /// `getCrossReference(parentCatalog, parentSchema, parentTable,
    /// foreignCatalog, foreignSchema, foreignTable)` (§4.10): foreign keys
    /// in `foreign_table` that reference `parent_table` specifically.
    pub async fn get_cross_reference(
        &mut self,
        parent_schema: Option<&str>,
        parent_table: &str,
        foreign_schema: Option<&str>,
        foreign_table: &str,
    ) -> Result<MySqlResultSet> {
        self.get_reference_keys(
            foreign_schema,
            Some(foreign_table),
            parent_schema,
            Some(parent_table),
        )
        .await
    }

    async fn get_reference_keys(
        &mut self,
        fk_schema: Option<&str>,
        fk_table: Option<&str>,
        pk_schema: Option<&str>,
        pk_table: Option<&str>,
    ) -> Result<MySqlResultSet> {
        let cat = schema_alias(self.database_term());
        let sql = format!(
            "SELECT REFERENCED_TABLE_SCHEMA AS PK{cat}, REFERENCED_TABLE_NAME AS PKTABLE_NAME, \
             REFERENCED_COLUMN_NAME AS PKCOLUMN_NAME, \
             TABLE_SCHEMA AS FK{cat}, TABLE_NAME AS FKTABLE_NAME, COLUMN_NAME AS FKCOLUMN_NAME, \
             ORDINAL_POSITION AS KEY_SEQ, CONSTRAINT_NAME AS FK_NAME \
             FROM information_schema.KEY_COLUMN_USAGE \
             WHERE REFERENCED_TABLE_NAME IS NOT NULL AND {} AND {} AND {} AND {} \
             ORDER BY TABLE_NAME, ORDINAL_POSITION",
            filter("TABLE_SCHEMA", fk_schema),
            filter("TABLE_NAME", fk_table),
            filter("REFERENCED_TABLE_SCHEMA", pk_schema),
            filter("REFERENCED_TABLE_NAME", pk_table),
        );
        self.conn.query(&sql).await
    }

    /// `getProcedures(catalog, schemaPattern, procedureNamePattern)` (§4.10).
    pub async fn get_procedures(&mut self, schema: Option<&str>, name: Option<&str>) -> Result<MySqlResultSet> {
        let cat = schema_alias(self.database_term());
        let sql = format!(
            "SELECT ROUTINE_SCHEMA AS {cat}, ROUTINE_NAME AS PROCEDURE_NAME, \
             ROUTINE_COMMENT AS REMARKS, ROUTINE_TYPE AS PROCEDURE_TYPE \
             FROM information_schema.ROUTINES \
             WHERE {} AND {} \
             ORDER BY ROUTINE_SCHEMA, ROUTINE_NAME",
            filter("ROUTINE_SCHEMA", schema),
            filter("ROUTINE_NAME", name),
        );
        self.conn.query(&sql).await
    }

    /// `getProcedureColumns(catalog, schemaPattern, procedureNamePattern,
    /// columnNamePattern)` (§4.10): parameters and return column of a stored
    /// routine, same source `register_out_parameter` uses
    /// ([`crate::statement::MySqlCallableStatement`]).
    pub async fn get_procedure_columns(
        &mut self,
        schema: Option<&str>,
        procedure_name: Option<&str>,
        column_name: Option<&str>,
    ) -> Result<MySqlResultSet> {
        let cat = schema_alias(self.database_term());
        let sql = format!(
            "SELECT SPECIFIC_SCHEMA AS {cat}, SPECIFIC_NAME AS PROCEDURE_NAME, \
             PARAMETER_NAME AS COLUMN_NAME, PARAMETER_MODE AS COLUMN_TYPE, \
             DATA_TYPE AS TYPE_NAME, ORDINAL_POSITION \
             FROM information_schema.PARAMETERS \
             WHERE ROUTINE_TYPE = 'PROCEDURE' AND {} AND {} AND {} \
             ORDER BY SPECIFIC_SCHEMA, SPECIFIC_NAME, ORDINAL_POSITION",
            filter("SPECIFIC_SCHEMA", schema),
            filter("SPECIFIC_NAME", procedure_name),
            filter("PARAMETER_NAME", column_name),
        );
        self.conn.query(&sql).await
    }

    /// `getBestRowIdentifier(catalog, schema, table, scope, nullable)`
    /// (§4.10): this driver answers with the primary key, the same column
    /// set JDBC drivers fall back to when no better optimistic-locking row
    /// identifier is available.
    pub async fn get_best_row_identifier(&mut self, schema: Option<&str>, table_name: &str) -> Result<MySqlResultSet> {
        let sql = format!(
            "SELECT COLUMN_NAME, DATA_TYPE AS TYPE_NAME, 1 AS SCOPE \
             FROM information_schema.KEY_COLUMN_USAGE \
             WHERE CONSTRAINT_NAME = 'PRIMARY' AND {} AND TABLE_NAME = {} \
             ORDER BY ORDINAL_POSITION",
            filter("TABLE_SCHEMA", schema),
            quote_literal(table_name),
        );
        self.conn.query(&sql).await
    }

    /// `getVersionColumns(catalog, schema, table)` (§4.10): columns MySQL
    /// auto-updates on every row change. This driver reports `TIMESTAMP`
    /// columns with `ON UPDATE CURRENT_TIMESTAMP`, the closest MySQL
    /// equivalent to JDBC's notion of a version column.
    pub async fn get_version_columns(&mut self, schema: Option<&str>, table_name: &str) -> Result<MySqlResultSet> {
        let sql = format!(
            "SELECT COLUMN_NAME, DATA_TYPE AS TYPE_NAME \
             FROM information_schema.COLUMNS \
             WHERE EXTRA LIKE '%on update CURRENT_TIMESTAMP%' AND {} AND TABLE_NAME = {} \
             ORDER BY ORDINAL_POSITION",
            filter("TABLE_SCHEMA", schema),
            quote_literal(table_name),
        );
        self.conn.query(&sql).await
    }

    /// `getColumnPrivileges(catalog, schema, table, columnNamePattern)`
    /// (§4.10).
    pub async fn get_column_privileges(
        &mut self,
        schema: Option<&str>,
        table_name: &str,
        column_name: Option<&str>,
    ) -> Result<MySqlResultSet> {
        let sql = format!(
            "SELECT TABLE_SCHEMA, TABLE_NAME, COLUMN_NAME, GRANTEE, PRIVILEGE_TYPE, IS_GRANTABLE \
             FROM information_schema.COLUMN_PRIVILEGES \
             WHERE {} AND TABLE_NAME = {} AND {} \
             ORDER BY COLUMN_NAME, PRIVILEGE_TYPE",
            filter("TABLE_SCHEMA", schema),
            quote_literal(table_name),
            filter("COLUMN_NAME", column_name),
        );
        self.conn.query(&sql).await
    }

    /// `getTablePrivileges(catalog, schemaPattern, tableNamePattern)`
    /// (§4.10).
    pub async fn get_table_privileges(&mut self, schema: Option<&str>, table_name: Option<&str>) -> Result<MySqlResultSet> {
        let sql = format!(
            "SELECT TABLE_SCHEMA, TABLE_NAME, GRANTEE, PRIVILEGE_TYPE, IS_GRANTABLE \
             FROM information_schema.TABLE_PRIVILEGES \
             WHERE {} AND {} \
             ORDER BY TABLE_NAME, PRIVILEGE_TYPE",
            filter("TABLE_SCHEMA", schema),
            filter("TABLE_NAME", table_name),
        );
        self.conn.query(&sql).await
    }

    /// `getTypeInfo()` (§4.10): the server's own type catalog, as MySQL
    /// itself reports it.
    pub async fn get_type_info(&mut self) -> Result<MySqlResultSet> {
        self.conn
            .query(
                "SELECT DISTINCT DATA_TYPE AS TYPE_NAME \
                 FROM information_schema.COLUMNS \
                 ORDER BY DATA_TYPE",
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_renders_literal_or_wildcard() {
        assert_eq!(filter("TABLE_NAME", Some("t1")), "TABLE_NAME = 't1'");
        assert_eq!(filter("TABLE_NAME", None), "TRUE");
    }

    #[test]
    fn quote_literal_escapes_quotes_and_backslashes() {
        assert_eq!(quote_literal("O'Brien"), "'O''Brien'");
        assert_eq!(quote_literal(r"a\b"), r"'a\\b'");
    }

    #[test]
    fn schema_alias_follows_database_term() {
        assert_eq!(schema_alias(DatabaseTerm::Catalog), "TABLE_CAT");
        assert_eq!(schema_alias(DatabaseTerm::Schema), "TABLE_SCHEM");
    }
}
