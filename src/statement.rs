//! The statement façade (C10, §4.8): four JDBC-shaped statement kinds built
//! entirely on top of [`MySqlConnection`]'s `COM_QUERY`/`COM_STMT_*` methods.
//!
//! - [`MySqlStatement`] issues ad hoc SQL with no parameters.
//! - [`MySqlClientPreparedStatement`] substitutes bound parameters into SQL
//!   text client-side (§4.6.2) before sending it as an ordinary `COM_QUERY`.
//! - [`MySqlServerPreparedStatement`] prepares once with `COM_STMT_PREPARE`
//!   and executes repeatedly with the binary protocol (§4.6.1); the
//!   connection's statement cache owns the prepared handle's lifetime, so
//!   this type has no `close()` of its own.
//! - [`MySqlCallableStatement`] generalizes the prepared-statement idea to
//!   `CALL proc(...)`, including stored-procedure OUT parameters.

use std::sync::Arc;

use crate::arguments::{MySqlArgumentValue, MySqlArguments, MySqlBind};
use crate::column::MySqlColumn;
use crate::connection::{MySqlConnection, Prepared, PreparedOutcome, StatementResult};
use crate::done::MySqlQueryResult;
use crate::error::{Error, Result};
use crate::protocol::{Cursor, ParamType};
use crate::result_set::{MySqlCursorResultSet, MySqlResultSet};
use crate::types::MySqlType;

/// `executeBatch`'s sentinel for "statement succeeded, row count unknown"
/// (§4.8): what a prepared-statement batch reports per execution, since
/// this driver can't ask the server for real per-statement counts out of a
/// `COM_STMT_EXECUTE` batch the way plain `Statement.executeBatch` can for
/// sequential `COM_QUERY`s.
pub const SUCCESS_NO_INFO: i64 = -2;

/// The result of `Statement.execute()` (§6): `true` meant "call
/// `result_set()`", `false` meant "call `update_count()`" in JDBC terms;
/// here the two are just the variants of one value.
#[derive(Debug)]
pub enum Executed {
    ResultSet(MySqlResultSet),
    Update(MySqlQueryResult),
}

impl Executed {
    pub fn is_result_set(&self) -> bool {
        matches!(self, Executed::ResultSet(_))
    }
}

fn statement_result_to_executed(result: StatementResult) -> Executed {
    match result {
        StatementResult::ResultSet(rs) => Executed::ResultSet(rs),
        StatementResult::Done(done) => Executed::Update(done),
    }
}

async fn execute_either(conn: &mut MySqlConnection, sql: &str) -> Result<Executed> {
    let (result, _more) = conn.query_multi_first(sql).await?;
    Ok(statement_result_to_executed(result))
}

/// Quotes `name` as a backtick-delimited MySQL identifier, doubling any
/// internal backtick.
fn quote_identifier(name: &str) -> String {
    let mut quoted = String::with_capacity(name.len() + 2);
    quoted.push('`');
    for ch in name.chars() {
        if ch == '`' {
            quoted.push('`');
        }
        quoted.push(ch);
    }
    quoted.push('`');
    quoted
}

/// Escapes `s` for use inside a single-quoted SQL string literal.
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

/// Plain `COM_QUERY` statement: no parameters, no server-side preparation
/// (§4.8).
pub struct MySqlStatement<'c> {
    conn: &'c mut MySqlConnection,
    batch: Vec<String>,
}

impl<'c> MySqlStatement<'c> {
    pub(crate) fn new(conn: &'c mut MySqlConnection) -> Self {
        Self {
            conn,
            batch: Vec::new(),
        }
    }

    pub async fn execute_query(&mut self, sql: &str) -> Result<MySqlResultSet> {
        self.conn.query(sql).await
    }

    pub async fn execute_update(&mut self, sql: &str) -> Result<MySqlQueryResult> {
        self.conn.execute(sql).await
    }

    pub async fn execute(&mut self, sql: &str) -> Result<Executed> {
        execute_either(self.conn, sql).await
    }

    pub fn add_batch(&mut self, sql: impl Into<String>) {
        self.batch.push(sql.into());
    }

    pub fn clear_batch(&mut self) {
        self.batch.clear();
    }

    /// Issues every batched statement as its own `COM_QUERY`, in order
    /// (this driver never negotiates `CLIENT_MULTI_STATEMENTS`, so they
    /// can't be concatenated into one round trip; see DESIGN.md). Returns
    /// the real per-statement affected-row count for each, unlike a
    /// prepared-statement batch. A mid-batch failure surfaces as
    /// `Error::BatchUpdate`, carrying the counts observed before it.
    pub async fn execute_batch(&mut self) -> Result<Vec<i64>> {
        let mut counts = Vec::with_capacity(self.batch.len());
        for sql in &self.batch {
            match self.conn.execute(sql).await {
                Ok(result) => counts.push(result.rows_affected() as i64),
                Err(e) => {
                    return Err(Error::BatchUpdate {
                        counts,
                        source: Box::new(e),
                    });
                }
            }
        }
        Ok(counts)
    }
}

/// A statement that substitutes bound parameters into SQL text on the
/// client (§4.6.2), then sends the rendered text as an ordinary
/// `COM_QUERY`. No server round trip is spent preparing it, at the cost of
/// re-parsing the whole statement text on every execution.
pub struct MySqlClientPreparedStatement<'c> {
    conn: &'c mut MySqlConnection,
    sql: String,
    params: MySqlArguments,
    batch: Vec<MySqlArguments>,
}

impl<'c> MySqlClientPreparedStatement<'c> {
    pub(crate) fn new(conn: &'c mut MySqlConnection, sql: impl Into<String>) -> Self {
        Self {
            conn,
            sql: sql.into(),
            params: MySqlArguments::new(),
            batch: Vec::new(),
        }
    }

    pub fn bind<T: MySqlBind>(&mut self, value: T) -> &mut Self {
        self.params.add(value);
        self
    }

    /// Binds a verbatim, unquoted SQL expression as the next parameter
    /// (§4.6.2's "Raw parameter form"), e.g. `CURRENT_TIMESTAMP`.
    pub fn bind_raw(&mut self, sql: impl Into<String>) -> &mut Self {
        self.params.add_raw(sql);
        self
    }

    pub fn clear_parameters(&mut self) {
        self.params = MySqlArguments::new();
    }

    fn render(&self) -> Result<String> {
        self.params.substitute(&self.sql)
    }

    pub async fn execute_query(&mut self) -> Result<MySqlResultSet> {
        let sql = self.render()?;
        self.conn.query(&sql).await
    }

    pub async fn execute_update(&mut self) -> Result<MySqlQueryResult> {
        let sql = self.render()?;
        self.conn.execute(&sql).await
    }

    pub async fn execute(&mut self) -> Result<Executed> {
        let sql = self.render()?;
        execute_either(self.conn, &sql).await
    }

    /// Accumulates the currently bound parameters as one batch entry, then
    /// clears them so the next `bind` call starts a fresh row (§6
    /// `addBatch`).
    pub fn add_batch(&mut self) {
        let params = std::mem::replace(&mut self.params, MySqlArguments::new());
        self.batch.push(params);
    }

    pub fn clear_batch(&mut self) {
        self.batch.clear();
    }

    /// Renders and executes each batched parameter row as its own
    /// `COM_QUERY`. Every success contributes [`SUCCESS_NO_INFO`] rather
    /// than a real row count (§4.8).
    pub async fn execute_batch(&mut self) -> Result<Vec<i64>> {
        let batch = std::mem::take(&mut self.batch);
        let mut counts = Vec::with_capacity(batch.len());

        for params in &batch {
            let sql = params.substitute(&self.sql)?;
            match self.conn.execute(&sql).await {
                Ok(_) => counts.push(SUCCESS_NO_INFO),
                Err(e) => {
                    return Err(Error::BatchUpdate {
                        counts,
                        source: Box::new(e),
                    });
                }
            }
        }

        Ok(counts)
    }
}

/// Either a fully materialized result set or one streamed a batch at a
/// time over a server-side cursor, returned by
/// [`MySqlServerPreparedStatement::execute_query`]/
/// [`MySqlServerPreparedStatement::execute_cursor`].
///
/// Mirrors the design-notes relationship "statement owns a handle; result
/// sets borrow it": the borrow on `self` this carries means the statement
/// can't be re-executed while a `MySqlRows` from it is still alive.
pub enum MySqlRows<'a> {
    Buffered(MySqlResultSet),
    Streaming(MySqlCursorResultSet<'a>),
}

impl<'a> MySqlRows<'a> {
    pub fn columns(&self) -> &[MySqlColumn] {
        match self {
            MySqlRows::Buffered(rs) => rs.columns(),
            MySqlRows::Streaming(rs) => rs.columns(),
        }
    }

    pub async fn next(&mut self) -> Result<bool> {
        match self {
            MySqlRows::Buffered(rs) => Ok(rs.next()),
            MySqlRows::Streaming(rs) => rs.next().await,
        }
    }

    pub fn try_get<T: MySqlType>(&self, index: usize) -> Result<Option<T>> {
        match self {
            MySqlRows::Buffered(rs) => rs.try_get(index),
            MySqlRows::Streaming(rs) => rs.try_get(index),
        }
    }

    pub fn try_get_by_name<T: MySqlType>(&self, name: &str) -> Result<Option<T>> {
        match self {
            MySqlRows::Buffered(rs) => rs.try_get_by_name(name),
            MySqlRows::Streaming(rs) => rs.try_get_by_name(name),
        }
    }
}

/// A statement prepared once on the server with `COM_STMT_PREPARE` and
/// executed repeatedly with the binary protocol (§4.6.1, §4.8). The
/// prepared handle itself lives in the connection's statement cache, keyed
/// by SQL text, so dropping this value doesn't issue `COM_STMT_CLOSE` — the
/// cache evicts and closes it on its own schedule (or on `change_user`).
pub struct MySqlServerPreparedStatement<'c> {
    conn: &'c mut MySqlConnection,
    sql: String,
    prepared: Option<Prepared>,
    params: MySqlArguments,
    last_param_types: Option<Vec<ParamType>>,
}

impl<'c> MySqlServerPreparedStatement<'c> {
    pub(crate) fn new(conn: &'c mut MySqlConnection, sql: impl Into<String>) -> Self {
        Self {
            conn,
            sql: sql.into(),
            prepared: None,
            params: MySqlArguments::new(),
            last_param_types: None,
        }
    }

    pub fn bind<T: MySqlBind>(&mut self, value: T) -> &mut Self {
        self.params.add(value);
        self
    }

    pub fn clear_parameters(&mut self) {
        self.params = MySqlArguments::new();
    }

    async fn ensure_prepared(&mut self) -> Result<Prepared> {
        if let Some(prepared) = self.prepared {
            return Ok(prepared);
        }
        let prepared = self.conn.prepare(&self.sql).await?;
        self.prepared = Some(prepared);
        Ok(prepared)
    }

    /// Whether this execution needs `new_params_bound = 1` in its
    /// `COM_STMT_EXECUTE` (§4.6, §4.8): only the first execution, and any
    /// execution whose bound types differ from the previous one.
    fn new_params_bound(&mut self) -> bool {
        let current = self.params.param_types();
        let changed = self.last_param_types.as_deref() != Some(current.as_slice());
        self.last_param_types = Some(current);
        changed
    }

    fn check_param_count(&self, prepared: Prepared) -> Result<()> {
        if self.params.len() != prepared.param_count as usize {
            return Err(Error::invalid_argument(format!(
                "statement has {} placeholder(s) but {} parameter(s) were bound",
                prepared.param_count,
                self.params.len()
            )));
        }
        Ok(())
    }

    async fn execute_with_cursor(&mut self, cursor: Cursor) -> Result<PreparedOutcome> {
        let prepared = self.ensure_prepared().await?;
        self.check_param_count(prepared)?;
        let new_params_bound = self.new_params_bound();
        self.conn
            .execute_prepared(prepared.statement_id, &self.params, new_params_bound, cursor)
            .await
    }

    /// Executes and fully buffers the result set (§4.6.1). Leaves the
    /// statement free for another execution afterwards.
    pub async fn execute_query(&mut self) -> Result<MySqlResultSet> {
        match self.execute_with_cursor(Cursor::NO_CURSOR).await? {
            PreparedOutcome::Rows { columns, rows } => Ok(MySqlResultSet::new(columns, rows)),
            PreparedOutcome::Done(_) => Ok(MySqlResultSet::new(Arc::from(Vec::<MySqlColumn>::new()), Vec::new())),
            PreparedOutcome::CursorOpened { .. } => {
                Err(Error::protocol("server opened a cursor for a CURSOR_TYPE_NO_CURSOR execute"))
            }
        }
    }

    pub async fn execute_update(&mut self) -> Result<MySqlQueryResult> {
        match self.execute_with_cursor(Cursor::NO_CURSOR).await? {
            PreparedOutcome::Done(done) => Ok(done),
            PreparedOutcome::Rows { rows, .. } => {
                Ok(MySqlQueryResult::new(rows.len() as u64, 0))
            }
            PreparedOutcome::CursorOpened { .. } => {
                Err(Error::protocol("server opened a cursor for a CURSOR_TYPE_NO_CURSOR execute"))
            }
        }
    }

    /// Executes with `CURSOR_TYPE_READ_ONLY` (§4.7 streaming): rows are
    /// pulled `fetch_size` at a time with `COM_STMT_FETCH` as the returned
    /// [`MySqlCursorResultSet`] is iterated, rather than buffered up front.
    /// Requires `use_cursor_fetch` on the connection's options and a
    /// non-zero `fetch_size`.
    pub async fn execute_cursor(&mut self, fetch_size: u32) -> Result<MySqlRows<'_>> {
        if !self.conn.options().use_cursor_fetch || fetch_size == 0 {
            return Err(Error::invalid_argument(
                "execute_cursor requires use_cursor_fetch and a non-zero fetch_size",
            ));
        }

        let statement_id = self.ensure_prepared().await?.statement_id;
        match self.execute_with_cursor(Cursor::READ_ONLY).await? {
            PreparedOutcome::CursorOpened { columns } => Ok(MySqlRows::Streaming(
                self.conn.cursor_result_set(columns, statement_id, fetch_size),
            )),
            PreparedOutcome::Rows { columns, rows } => Ok(MySqlRows::Buffered(MySqlResultSet::new(columns, rows))),
            PreparedOutcome::Done(_) => Ok(MySqlRows::Buffered(MySqlResultSet::new(
                Arc::from(Vec::<MySqlColumn>::new()),
                Vec::new(),
            ))),
        }
    }
}

/// `registerOutParameter`'s declared SQL type (§4.8), a simplified
/// `java.sql.Types`-shaped subset validated against
/// `information_schema.parameters.DATA_TYPE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MySqlOutType {
    Integer,
    BigInt,
    Varchar,
    Decimal,
    Double,
    Date,
    DateTime,
    Time,
    Bit,
}

impl MySqlOutType {
    fn matches_information_schema(self, data_type: &str) -> bool {
        let data_type = data_type.to_ascii_lowercase();
        match self {
            MySqlOutType::Integer => matches!(
                data_type.as_str(),
                "tinyint" | "smallint" | "mediumint" | "int" | "year"
            ),
            MySqlOutType::BigInt => data_type == "bigint",
            MySqlOutType::Varchar => matches!(
                data_type.as_str(),
                "char" | "varchar" | "text" | "tinytext" | "mediumtext" | "longtext" | "enum" | "set"
            ),
            MySqlOutType::Decimal => matches!(data_type.as_str(), "decimal" | "numeric"),
            MySqlOutType::Double => matches!(data_type.as_str(), "float" | "double"),
            MySqlOutType::Date => data_type == "date",
            MySqlOutType::DateTime => matches!(data_type.as_str(), "datetime" | "timestamp"),
            MySqlOutType::Time => data_type == "time",
            MySqlOutType::Bit => data_type == "bit",
        }
    }
}

enum Slot {
    In(MySqlArgumentValue),
    Out(MySqlOutType),
    InOut(MySqlArgumentValue, MySqlOutType),
}

/// One declared OUT/INOUT parameter: its 1-based call position, the name
/// `information_schema.parameters` reports for it, and the 0-based column
/// position it will occupy in the synthetic `SELECT @... ` issued to read
/// values back (§4.8).
struct OutSlot {
    index: usize,
    name: String,
    select_position: usize,
}

/// `CALL proc(...)` generalized as a prepared statement (§4.8), with OUT
/// parameters declared through [`Self::register_out_parameter`].
///
/// This driver never negotiates `CLIENT_MULTI_STATEMENTS` (§4.3), so OUT
/// values can't ride back on the same multi-statement round trip a
/// driver with that capability would use. Instead, OUT/INOUT slots are
/// bound to MySQL user variables (`@out_param_N`) in the `CALL` text, and
/// after every result set the procedure produced has been drained, a
/// dedicated `SELECT @out_param_1, @out_param_2, ...` reads them back.
pub struct MySqlCallableStatement<'c> {
    conn: &'c mut MySqlConnection,
    schema: Option<String>,
    name: String,
    slots: Vec<Slot>,
    current: Option<StatementResult>,
    more_pending: bool,
    started: bool,
    out_slots: Vec<OutSlot>,
    out_values: Option<MySqlResultSet>,
}

impl<'c> MySqlCallableStatement<'c> {
    pub(crate) fn new(conn: &'c mut MySqlConnection, sql: &str) -> Result<Self> {
        let (schema, name, placeholder_count) = parse_call(sql)?;
        Ok(Self {
            conn,
            schema,
            name,
            slots: (0..placeholder_count).map(|_| Slot::In(MySqlArgumentValue::Null)).collect(),
            current: None,
            more_pending: false,
            started: false,
            out_slots: Vec::new(),
            out_values: None,
        })
    }

    fn slot_mut(&mut self, index: usize) -> Result<&mut Slot> {
        self.slots
            .get_mut(index.wrapping_sub(1))
            .ok_or_else(|| Error::invalid_argument(format!("parameter index {index} out of range")))
    }

    /// Binds an IN (or the input half of an INOUT) parameter, 1-indexed.
    pub fn set_in<T: MySqlBind>(&mut self, index: usize, value: T) -> Result<()> {
        let value = value.bind();
        let slot = self.slot_mut(index)?;
        *slot = match slot {
            Slot::Out(ty) | Slot::InOut(_, ty) => Slot::InOut(value, *ty),
            Slot::In(_) => Slot::In(value),
        };
        Ok(())
    }

    /// `registerOutParameter(index, sqlType)` (§4.8): validates `sql_type`
    /// against the procedure's own declared parameter metadata, then marks
    /// slot `index` as an OUT (or INOUT, if already bound with
    /// [`Self::set_in`]) parameter.
    pub async fn register_out_parameter(&mut self, index: usize, sql_type: MySqlOutType) -> Result<()> {
        let schema = match &self.schema {
            Some(schema) => schema.clone(),
            None => self
                .conn
                .schema()
                .map(str::to_owned)
                .ok_or_else(|| Error::invalid_argument("no schema to resolve the procedure's metadata in"))?,
        };

        let sql = format!(
            "SELECT PARAMETER_NAME, PARAMETER_MODE, DATA_TYPE, ORDINAL_POSITION \
             FROM information_schema.parameters \
             WHERE SPECIFIC_SCHEMA = {} AND SPECIFIC_NAME = {} AND ROUTINE_TYPE = 'PROCEDURE' \
             ORDER BY ORDINAL_POSITION",
            quote_literal(&schema),
            quote_literal(&self.name),
        );

        let mut rows = self.conn.query(&sql).await?;
        let mut out_params: Vec<(i64, String, String, String)> = Vec::new();
        while rows.next() {
            let ordinal: i64 = rows.try_get::<i64>(3)?.unwrap_or(0);
            let mode: String = rows.try_get::<String>(1)?.unwrap_or_default();
            let name: String = rows.try_get::<String>(0)?.unwrap_or_default();
            let data_type: String = rows.try_get::<String>(2)?.unwrap_or_default();
            if mode.eq_ignore_ascii_case("OUT") || mode.eq_ignore_ascii_case("INOUT") {
                out_params.push((ordinal, name, mode, data_type));
            }
        }

        if out_params.is_empty() {
            return Err(Error::invalid_argument("No output parameters returned by procedure"));
        }

        let declared = out_params
            .iter()
            .find(|(ordinal, ..)| *ordinal == index as i64)
            .ok_or_else(|| Error::invalid_argument("No output parameters returned by procedure"))?;

        if !sql_type.matches_information_schema(&declared.3) {
            return Err(Error::invalid_argument(
                "The type specified for the parameter does not match the type registered as a procedure",
            ));
        }

        let slot = self.slot_mut(index)?;
        *slot = match slot {
            Slot::In(MySqlArgumentValue::Null) => Slot::Out(sql_type),
            Slot::In(value) => Slot::InOut(value.clone(), sql_type),
            Slot::Out(_) => Slot::Out(sql_type),
            Slot::InOut(value, _) => Slot::InOut(value.clone(), sql_type),
        };

        let select_position = self.out_slots.len();
        self.out_slots.push(OutSlot {
            index,
            name: declared.1.clone(),
            select_position,
        });

        Ok(())
    }

    fn render_call(&self) -> String {
        let args: Vec<String> = self
            .slots
            .iter()
            .enumerate()
            .map(|(i, slot)| match slot {
                Slot::In(value) => crate::arguments::render_literal(value),
                Slot::Out(_) | Slot::InOut(_, _) => format!("@out_param_{}", i + 1),
            })
            .collect();

        let name = match &self.schema {
            Some(schema) => format!("{}.{}", quote_identifier(schema), quote_identifier(&self.name)),
            None => quote_identifier(&self.name),
        };

        format!("CALL {name}({})", args.join(", "))
    }

    /// `execute()` (§6, §4.7 "Multi-result sets"): initializes any INOUT
    /// session variables, runs `CALL`, and reports whether the first frame
    /// is a result set. Advance through the rest with
    /// [`Self::get_more_results`].
    pub async fn execute(&mut self) -> Result<bool> {
        for (i, slot) in self.slots.iter().enumerate() {
            if let Slot::InOut(value, _) = slot {
                let init = format!(
                    "SET @out_param_{} = {}",
                    i + 1,
                    crate::arguments::render_literal(value)
                );
                self.conn.execute(&init).await?;
            }
        }

        let sql = self.render_call();
        let (result, more) = self.conn.query_multi_first(&sql).await?;
        let is_result_set = matches!(result, StatementResult::ResultSet(_));
        self.current = Some(result);
        self.more_pending = more;
        self.started = true;

        if !more {
            self.fetch_out_values().await?;
        }

        Ok(is_result_set)
    }

    /// Whether a frame follows the one [`Self::execute`]/
    /// [`Self::get_more_results`] most recently returned. `false` means the
    /// call is fully drained and any declared OUT parameters are readable.
    pub fn has_more_results(&self) -> bool {
        self.more_pending
    }

    /// `getMoreResults()` (§4.7): advances past the current frame,
    /// implicitly discarding it, and reports whether the next one is a
    /// result set.
    pub async fn get_more_results(&mut self) -> Result<bool> {
        if !self.started {
            return Err(Error::invalid_argument("execute() was not called"));
        }

        if !self.more_pending {
            self.current = None;
            return Ok(false);
        }

        let (result, more) = self.conn.query_multi_next().await?;
        let is_result_set = matches!(result, StatementResult::ResultSet(_));
        self.current = Some(result);
        self.more_pending = more;

        if !more {
            self.fetch_out_values().await?;
        }

        Ok(is_result_set)
    }

    /// Takes ownership of the current frame's result set, leaving none
    /// behind (mirrors JDBC's "each result set is implicitly closed once
    /// you move past it").
    pub fn take_result_set(&mut self) -> Option<MySqlResultSet> {
        match self.current.take() {
            Some(StatementResult::ResultSet(rs)) => Some(rs),
            other => {
                self.current = other;
                None
            }
        }
    }

    pub fn update_count(&self) -> Option<u64> {
        match &self.current {
            Some(StatementResult::Done(done)) => Some(done.rows_affected()),
            _ => None,
        }
    }

    async fn fetch_out_values(&mut self) -> Result<()> {
        if self.out_slots.is_empty() || self.out_values.is_some() {
            return Ok(());
        }

        let select = self
            .out_slots
            .iter()
            .map(|slot| format!("@out_param_{} AS `{}`", slot.index, slot.name.replace('`', "``")))
            .collect::<Vec<_>>()
            .join(", ");

        let mut rows = self.conn.query(&format!("SELECT {select}")).await?;
        rows.next();
        self.out_values = Some(rows);
        Ok(())
    }

    /// The OUT/INOUT value at 1-based call position `index`, by position
    /// (§4.8). Only meaningful once the procedure call has fully drained
    /// its result sets.
    pub fn get_out_parameter<T: MySqlType>(&self, index: usize) -> Result<Option<T>> {
        let slot = self
            .out_slots
            .iter()
            .find(|slot| slot.index == index)
            .ok_or_else(|| Error::invalid_argument(format!("parameter {index} is not an OUT parameter")))?;
        let rows = self
            .out_values
            .as_ref()
            .ok_or_else(|| Error::invalid_argument("out parameters are not available until the call has finished"))?;
        rows.try_get(slot.select_position)
    }

    /// As [`Self::get_out_parameter`], but by the name
    /// `information_schema.parameters` reports for this slot (§4.8).
    pub fn get_out_parameter_by_name<T: MySqlType>(&self, name: &str) -> Result<Option<T>> {
        let rows = self
            .out_values
            .as_ref()
            .ok_or_else(|| Error::invalid_argument("out parameters are not available until the call has finished"))?;
        rows.try_get_by_name(name)
    }
}

/// Parses `CALL [schema.]proc(?, ?, ...)`, optionally wrapped in the JDBC
/// `{call ...}` escape syntax, into `(schema, name, placeholder_count)`.
fn parse_call(sql: &str) -> Result<(Option<String>, String, usize)> {
    let mut s = sql.trim();
    if let Some(inner) = s.strip_prefix('{') {
        s = inner.trim_end_matches('}').trim();
    }

    let rest = s
        .strip_prefix("CALL")
        .or_else(|| s.strip_prefix("call"))
        .or_else(|| s.strip_prefix("Call"))
        .ok_or_else(|| Error::invalid_argument("expected a CALL statement"))?
        .trim_start();

    let paren = rest
        .find('(')
        .ok_or_else(|| Error::invalid_argument("expected CALL proc(...)"))?;
    let qualified_name = rest[..paren].trim();

    let (schema, name) = match qualified_name.split_once('.') {
        Some((schema, name)) => (
            Some(schema.trim_matches('`').to_owned()),
            name.trim_matches('`').to_owned(),
        ),
        None => (None, qualified_name.trim_matches('`').to_owned()),
    };

    let placeholder_count = crate::arguments::unquoted_placeholder_positions(sql).len();

    Ok((schema, name, placeholder_count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_unqualified_call() {
        let (schema, name, count) = parse_call("CALL demoSp(?, ?)").unwrap();
        assert_eq!(schema, None);
        assert_eq!(name, "demoSp");
        assert_eq!(count, 2);
    }

    #[test]
    fn parses_qualified_call_with_jdbc_escape() {
        let (schema, name, count) = parse_call("{call test.demoSp(?)}").unwrap();
        assert_eq!(schema.as_deref(), Some("test"));
        assert_eq!(name, "demoSp");
        assert_eq!(count, 1);
    }

    #[test]
    fn rejects_non_call_statements() {
        assert!(parse_call("SELECT 1").is_err());
    }

    #[test]
    fn quotes_identifiers_and_literals() {
        assert_eq!(quote_identifier("weird`name"), "`weird``name`");
        assert_eq!(quote_literal("O'Brien"), "'O''Brien'");
    }

    #[test]
    fn out_type_matches_expected_information_schema_names() {
        assert!(MySqlOutType::Integer.matches_information_schema("int"));
        assert!(MySqlOutType::BigInt.matches_information_schema("bigint"));
        assert!(!MySqlOutType::Integer.matches_information_schema("varchar"));
    }
}
