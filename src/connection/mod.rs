//! The connection/session state machine (C7, §4.5): one TCP/TLS transport,
//! one command in flight at a time.

mod auth;
mod establish;
mod executor;

use std::sync::Arc;

use crate::column::MySqlColumn;
use crate::common::StatementCache;
use crate::done::MySqlQueryResult;
use crate::error::{Error, Result};
use crate::logging::LogSettings;
use crate::metadata::MySqlDatabaseMetaData;
use crate::net::MaybeTlsStream;
use crate::options::MySqlConnectOptions;
use crate::protocol::{Capabilities, PacketCodec, Status};
use crate::result_set::{MySqlCursorResultSet, MySqlResultSet};
use crate::row::MySqlRow;
use crate::statement::{
    MySqlCallableStatement, MySqlClientPreparedStatement, MySqlServerPreparedStatement, MySqlStatement,
};

pub(crate) use executor::{Prepared, PreparedOutcome, StatementResult};

/// A single MySQL session (§4.5).
///
/// Holds the framed transport, the capabilities negotiated at handshake
/// time, the server-prepared-statement cache, and the session's view of its
/// own status flags (autocommit, in-transaction). `&mut self` on every
/// method that issues a command is the concurrency guard described in §5:
/// two commands on the same connection can't be in flight at once because
/// the borrow checker won't allow it.
pub struct MySqlConnection {
    codec: PacketCodec<MaybeTlsStream>,
    capabilities: Capabilities,
    server_status: Status,
    connection_id: u32,
    server_version: String,
    /// The plugin/nonce pair most recently used to authenticate this
    /// session — reused to compute `COM_CHANGE_USER`'s initial auth
    /// response (§4.4); the server is free to follow up with a fresh
    /// `AuthSwitchRequest` if it wants different material, which
    /// [`auth::complete`] already handles.
    auth_plugin: crate::protocol::AuthPlugin,
    nonce: Vec<u8>,
    schema: Option<String>,
    options: MySqlConnectOptions,
    statement_cache: StatementCache<Prepared>,
    log_settings: LogSettings,
    closed: bool,
}

impl MySqlConnection {
    pub async fn connect(options: &MySqlConnectOptions) -> Result<Self> {
        let established = establish::connect(options).await?;

        Ok(Self {
            codec: established.codec,
            capabilities: established.capabilities,
            server_status: established.server_status,
            connection_id: established.connection_id,
            server_version: established.server_version,
            auth_plugin: established.auth_plugin,
            nonce: established.nonce,
            schema: options.database.clone(),
            options: options.clone(),
            statement_cache: StatementCache::new(options.statement_cache_capacity),
            log_settings: LogSettings::default(),
            closed: false,
        })
    }

    pub fn connection_id(&self) -> u32 {
        self.connection_id
    }

    pub fn server_version(&self) -> &str {
        &self.server_version
    }

    /// The schema last selected by `setSchema`/`COM_INIT_DB`, or the one
    /// given at connect time (§6 `getSchema`).
    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    /// `setSchema` (§6): changes the connection's default schema via
    /// `COM_INIT_DB`, cheaper than reissuing `USE <db>` as a query.
    pub async fn set_schema(&mut self, schema: impl Into<String>) -> Result<()> {
        self.ensure_open()?;
        let schema = schema.into();
        executor::init_db(self, &schema).await?;
        self.schema = Some(schema);
        Ok(())
    }

    /// `changeUser` (§4.4, §6): re-authenticates the session as a different
    /// user, restarting the plugin negotiation while keeping the socket
    /// open. On success every server-side prepared statement is implicitly
    /// invalidated (the server drops them), so the local statement cache is
    /// cleared without issuing `COM_STMT_CLOSE` for any of them.
    pub async fn change_user(&mut self, username: &str, password: &str, database: Option<&str>) -> Result<()> {
        self.ensure_open()?;
        executor::change_user(self, username, password, database).await?;
        self.statement_cache.drain();
        self.schema = database.map(str::to_owned);
        Ok(())
    }

    /// `resetServerState` (§6): `COM_RESET_CONNECTION` — resets session
    /// variables, the current transaction, and temporary tables while
    /// keeping the authenticated user, cheaper than [`Self::change_user`]
    /// with the same credentials.
    pub async fn reset_server_state(&mut self) -> Result<()> {
        self.ensure_open()?;
        executor::reset_connection(self).await?;
        self.statement_cache.drain();
        Ok(())
    }

    /// `getStatistics` (§6): `COM_STATISTICS`'s human-readable status line
    /// (uptime, threads, queries per second, …).
    pub async fn get_statistics(&mut self) -> Result<String> {
        self.ensure_open()?;
        executor::statistics(self).await
    }

    pub(crate) fn options(&self) -> &MySqlConnectOptions {
        &self.options
    }

    pub(crate) fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// `isValid(timeout)` (§6 public API surface): pings the server and
    /// reports whether it answered within `timeout`, rather than
    /// surfacing the error.
    pub async fn is_valid(&mut self, timeout: std::time::Duration) -> bool {
        if self.closed {
            return false;
        }
        matches!(tokio::time::timeout(timeout, self.ping()).await, Ok(Ok(())))
    }

    pub fn set_log_settings(&mut self, settings: LogSettings) {
        self.log_settings = settings;
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(Error::ConnectionClosed);
        }
        Ok(())
    }

    /// Marks the session unusable after a protocol error or write failure
    /// (§7): every subsequent operation now fails fast with
    /// `ConnectionClosed` instead of retrying I/O on a desynchronized
    /// stream.
    pub(crate) fn poison(&mut self) {
        self.closed = true;
    }

    pub async fn ping(&mut self) -> Result<()> {
        self.ensure_open()?;
        executor::ping(self).await
    }

    /// `COM_QUIT`: tells the server this session is going away, then
    /// shuts down the transport. No response is expected.
    pub async fn close(mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        executor::quit(&mut self).await
    }

    pub fn is_autocommit(&self) -> bool {
        self.server_status.contains(Status::SERVER_STATUS_AUTOCOMMIT)
    }

    pub fn in_transaction(&self) -> bool {
        self.server_status.contains(Status::SERVER_STATUS_IN_TRANS)
    }

    /// Runs `sql` via `COM_QUERY`, returning every row buffered in memory
    /// (§4.7 "materialized" result set).
    pub async fn query(&mut self, sql: &str) -> Result<MySqlResultSet> {
        self.ensure_open()?;
        executor::query(self, sql).await
    }

    /// Runs `sql` via `COM_QUERY`, expecting no result set.
    pub async fn execute(&mut self, sql: &str) -> Result<MySqlQueryResult> {
        self.ensure_open()?;
        executor::execute(self, sql).await
    }

    pub(crate) async fn prepare(&mut self, sql: &str) -> Result<Prepared> {
        self.ensure_open()?;
        executor::prepare(self, sql).await
    }

    /// `createStatement()` (§6): a plain, parameterless statement.
    pub fn create_statement(&mut self) -> MySqlStatement<'_> {
        MySqlStatement::new(self)
    }

    /// `clientPreparedStatement(sql)` (§6): binds and substitutes parameters
    /// on the client before sending `sql` as `COM_QUERY` (§4.6.2).
    pub fn client_prepared_statement(&mut self, sql: impl Into<String>) -> MySqlClientPreparedStatement<'_> {
        MySqlClientPreparedStatement::new(self, sql)
    }

    /// `serverPreparedStatement(sql)`/`prepareStatement(sql)` (§6): prepares
    /// `sql` with `COM_STMT_PREPARE` on first execution and reuses the
    /// handle thereafter (§4.6.1, §4.8).
    pub fn server_prepared_statement(&mut self, sql: impl Into<String>) -> MySqlServerPreparedStatement<'_> {
        MySqlServerPreparedStatement::new(self, sql)
    }

    /// `prepareCall(sql)` (§6): parses a `CALL proc(...)` (optionally
    /// wrapped in the JDBC `{call ...}` escape) for OUT-parameter support
    /// (§4.8).
    pub fn prepare_call(&mut self, sql: &str) -> Result<MySqlCallableStatement<'_>> {
        MySqlCallableStatement::new(self, sql)
    }

    /// `getMetaData()` (§6): a façade over `information_schema` answering
    /// JDBC-style catalog questions (§4.10).
    pub fn metadata(&mut self) -> MySqlDatabaseMetaData<'_> {
        MySqlDatabaseMetaData::new(self)
    }

    /// Runs `sql` via `COM_QUERY` and reports whether the server says
    /// another result-set frame follows, for statements that can produce
    /// more than one (§4.7 "Multi-result sets", i.e. `CALL`ing a stored
    /// procedure with multiple `SELECT`s). Continue with
    /// [`Self::query_multi_next`].
    pub(crate) async fn query_multi_first(
        &mut self,
        sql: &str,
    ) -> Result<(StatementResult, bool)> {
        self.ensure_open()?;
        executor::query_multi_first(self, sql).await
    }

    pub(crate) async fn query_multi_next(&mut self) -> Result<(StatementResult, bool)> {
        self.ensure_open()?;
        executor::query_multi_next(self).await
    }

    pub(crate) async fn close_statement(&mut self, statement_id: u32) -> Result<()> {
        executor::close_statement(self, statement_id).await
    }

    pub(crate) async fn reset_statement(&mut self, statement_id: u32) -> Result<()> {
        self.ensure_open()?;
        executor::reset_statement(self, statement_id).await
    }

    pub(crate) async fn execute_prepared(
        &mut self,
        statement_id: u32,
        params: &crate::arguments::MySqlArguments,
        new_params_bound: bool,
        cursor: crate::protocol::Cursor,
    ) -> Result<executor::PreparedOutcome> {
        self.ensure_open()?;
        executor::execute_prepared(self, statement_id, params, new_params_bound, cursor).await
    }

    pub(crate) async fn fetch_cursor_batch(
        &mut self,
        statement_id: u32,
        fetch_size: u32,
        columns: &Arc<[MySqlColumn]>,
    ) -> Result<(Vec<MySqlRow>, bool)> {
        self.ensure_open()?;
        executor::fetch_cursor_batch(self, statement_id, fetch_size, columns).await
    }

    /// Opens a streaming, forward-only result set over a server-side cursor
    /// (§4.7 "Streaming"). The caller must already have prepared
    /// `statement_id` and executed it with `Cursor::READ_ONLY`.
    pub(crate) fn cursor_result_set(
        &mut self,
        columns: Arc<[MySqlColumn]>,
        statement_id: u32,
        fetch_size: u32,
    ) -> MySqlCursorResultSet<'_> {
        MySqlCursorResultSet::new(self, columns, statement_id, fetch_size)
    }
}
