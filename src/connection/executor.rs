//! Command dispatch (§4.5): one `COM_*` request, then the generic
//! `OK | ERR | ResultSet` response shape, shared by every public query
//! method and by [`crate::statement`]'s prepared-statement paths.

use std::sync::Arc;

use bytes::Bytes;

use crate::arguments::MySqlArguments;
use crate::column::MySqlColumn;
use crate::done::MySqlQueryResult;
use crate::error::{Error, Result};
use crate::logging::QueryLogger;
use crate::protocol::{
    BinaryRow, ColumnCount, ColumnDefinition, ComChangeUser, ComInitDb, ComPing, ComQuery,
    ComQuit, ComResetConnection, ComStatistics, ComStmtClose, ComStmtExecute, ComStmtFetch,
    ComStmtPrepare, ComStmtPrepareOk, ComStmtReset, Cursor, EofPacket, ErrPacket, OkPacket,
    Response, TextRow, TypeId,
};
use crate::row::MySqlRow;

use super::{auth, MySqlConnection};

/// The outcome of `COM_STMT_PREPARE` (§4.6, §4.8): enough to drive repeated
/// `COM_STMT_EXECUTE`s without re-parsing the statement.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Prepared {
    pub(crate) statement_id: u32,
    pub(crate) param_count: u16,
    pub(crate) column_count: u16,
}

/// One frame of a (possibly multi-result-set) `COM_QUERY` response (§4.7
/// "Multi-result sets"), used by [`crate::statement::MySqlStatement::execute`]
/// and by stored-procedure calls, which get one `ResultSet`/`Done` frame per
/// statement the server executed.
pub(crate) enum StatementResult {
    ResultSet(crate::result_set::MySqlResultSet),
    Done(MySqlQueryResult),
}

/// The outcome of a `COM_STMT_EXECUTE` (§4.7): either a plain command
/// result, a fully buffered result set, or a cursor left open on the server
/// waiting for `COM_STMT_FETCH` (§4.8 streaming).
pub(crate) enum PreparedOutcome {
    Done(MySqlQueryResult),
    Rows {
        columns: Arc<[MySqlColumn]>,
        rows: Vec<MySqlRow>,
    },
    CursorOpened {
        columns: Arc<[MySqlColumn]>,
    },
}

async fn run<T: crate::protocol::Encode>(conn: &mut MySqlConnection, command: &T) -> Result<Bytes> {
    conn.codec.reset_sequence();

    let outcome = async {
        conn.codec.write(command, conn.capabilities)?;
        conn.codec.flush().await?;
        conn.codec.read().await
    }
    .await;

    match outcome {
        Ok(payload) => Ok(payload),
        Err(e) => {
            conn.poison();
            Err(e)
        }
    }
}

async fn read_column_definitions(
    conn: &mut MySqlConnection,
    count: u64,
) -> Result<Vec<ColumnDefinition>> {
    let mut defs = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let payload = conn.codec.read().await?;
        defs.push(ColumnDefinition::read(&payload)?);
    }

    if !conn.capabilities.contains(crate::protocol::Capabilities::DEPRECATE_EOF) {
        let payload = conn.codec.read().await?;
        EofPacket::read(&payload)?;
    }

    Ok(defs)
}

/// Whether `payload` is a deprecated-EOF/legacy-EOF result-set terminator
/// rather than a row. With `CLIENT_DEPRECATE_EOF`, a terminator is an `OK`
/// packet (header `0xFE`) short enough that it can't be mistaken for a
/// length-encoded row whose first column happens to start with `0xFE`
/// (which only occurs for a value ≥ 16 MiB).
fn is_row_terminator(conn: &MySqlConnection, payload: &[u8]) -> bool {
    match payload.first().copied() {
        Some(0xFE) if conn.capabilities.contains(crate::protocol::Capabilities::DEPRECATE_EOF) => {
            payload.len() < 9
        }
        Some(0xFE) => true,
        _ => false,
    }
}

async fn read_text_rows(
    conn: &mut MySqlConnection,
    column_count: usize,
) -> Result<(Vec<TextRow>, OkPacket)> {
    let mut rows = Vec::new();

    loop {
        let payload = conn.codec.read().await?;
        if payload.first().copied() == Some(0xFF) {
            return Err(Error::from(ErrPacket::read(&payload)?));
        }
        if is_row_terminator(conn, &payload) {
            let ok = OkPacket::read(&payload).or_else(|_| {
                EofPacket::read(&payload).map(|eof| OkPacket {
                    affected_rows: 0,
                    last_insert_id: 0,
                    status: eof.status,
                    warnings: eof.warnings,
                    info: String::new(),
                })
            })?;
            return Ok((rows, ok));
        }

        rows.push(TextRow::read(payload, column_count)?);
    }
}

async fn read_binary_rows(
    conn: &mut MySqlConnection,
    column_types: &[TypeId],
) -> Result<(Vec<BinaryRow>, OkPacket)> {
    let mut rows = Vec::new();

    loop {
        let payload = conn.codec.read().await?;
        if payload.first().copied() == Some(0xFF) {
            return Err(Error::from(ErrPacket::read(&payload)?));
        }
        if is_row_terminator(conn, &payload) {
            let ok = OkPacket::read(&payload).or_else(|_| {
                EofPacket::read(&payload).map(|eof| OkPacket {
                    affected_rows: 0,
                    last_insert_id: 0,
                    status: eof.status,
                    warnings: eof.warnings,
                    info: String::new(),
                })
            })?;
            return Ok((rows, ok));
        }

        rows.push(BinaryRow::read(payload, column_types)?);
    }
}

fn columns_from_definitions(defs: Vec<ColumnDefinition>) -> Arc<[MySqlColumn]> {
    defs.into_iter().map(MySqlColumn::from_definition).collect()
}

pub(crate) async fn ping(conn: &mut MySqlConnection) -> Result<()> {
    let payload = run(conn, &ComPing).await?;
    match Response::read(&payload)? {
        crate::protocol::Response::Ok(ok) => {
            conn.server_status = ok.status;
            Ok(())
        }
        crate::protocol::Response::Err(err) => Err(Error::from(err)),
        crate::protocol::Response::ResultSet(_) => Err(Error::protocol("unexpected result set from COM_PING")),
    }
}

/// `COM_INIT_DB` (§6 `setSchema`): switches the connection's default schema.
pub(crate) async fn init_db(conn: &mut MySqlConnection, schema: &str) -> Result<()> {
    let payload = run(conn, &ComInitDb { schema }).await?;
    match Response::read(&payload)? {
        Response::Ok(ok) => {
            conn.server_status = ok.status;
            Ok(())
        }
        Response::Err(err) => Err(Error::from(err)),
        Response::ResultSet(_) => Err(Error::protocol("unexpected result set from COM_INIT_DB")),
    }
}

/// `COM_STATISTICS` (§6 `getStatistics`): a single plain-text status line,
/// not framed as OK/ERR/result-set.
pub(crate) async fn statistics(conn: &mut MySqlConnection) -> Result<String> {
    let payload = run(conn, &ComStatistics).await?;
    Ok(String::from_utf8_lossy(&payload).into_owned())
}

/// `COM_RESET_CONNECTION` (§6 `resetServerState`): server drops temporary
/// tables, prepared statements and the current transaction, and resets
/// session variables; the socket and authenticated user are unchanged.
pub(crate) async fn reset_connection(conn: &mut MySqlConnection) -> Result<()> {
    let payload = run(conn, &ComResetConnection).await?;
    match Response::read(&payload)? {
        Response::Ok(ok) => {
            conn.server_status = ok.status;
            Ok(())
        }
        Response::Err(err) => Err(Error::from(err)),
        Response::ResultSet(_) => Err(Error::protocol("unexpected result set from COM_RESET_CONNECTION")),
    }
}

/// `COM_CHANGE_USER` (§4.4): re-authenticates as `username`/`password`,
/// restarting the auth-plugin negotiation on the same socket.
pub(crate) async fn change_user(
    conn: &mut MySqlConnection,
    username: &str,
    password: &str,
    database: Option<&str>,
) -> Result<()> {
    conn.codec.reset_sequence();

    let is_tls = matches!(conn.options.ssl_mode, crate::options::MySqlSslMode::Trusted | crate::options::MySqlSslMode::System);
    let auth_response = auth::initial_response(conn.auth_plugin, password, &conn.nonce, is_tls);

    let outcome = async {
        conn.codec.write(
            &ComChangeUser {
                username,
                database,
                client_collation: crate::protocol::UTF8MB4_GENERAL_CI,
                auth_plugin: conn.auth_plugin,
                auth_response: &auth_response,
            },
            conn.capabilities,
        )?;
        conn.codec.flush().await?;

        auth::complete(
            &mut conn.codec,
            conn.capabilities,
            password,
            is_tls,
            conn.options.allow_public_key_retrieval,
            conn.auth_plugin,
            conn.nonce.clone(),
        )
        .await
    }
    .await;

    match outcome {
        Ok(ok) => {
            conn.server_status = ok.status;
            Ok(())
        }
        Err(e) => {
            conn.poison();
            Err(e)
        }
    }
}

pub(crate) async fn quit(conn: &mut MySqlConnection) -> Result<()> {
    conn.codec.reset_sequence();
    conn.codec.write(&ComQuit, conn.capabilities)?;
    conn.codec.flush().await?;
    conn.poison();
    Ok(())
}

pub(crate) async fn query(conn: &mut MySqlConnection, sql: &str) -> Result<crate::result_set::MySqlResultSet> {
    let mut logger = QueryLogger::new(sql, conn.log_settings.clone());
    let payload = run(conn, &ComQuery { sql }).await?;

    match Response::read(&payload)? {
        crate::protocol::Response::Ok(ok) => {
            conn.server_status = ok.status;
            logger.increase_rows_affected(ok.affected_rows);
            Ok(crate::result_set::MySqlResultSet::new(
                Arc::from(Vec::<MySqlColumn>::new()),
                Vec::new(),
            ))
        }
        crate::protocol::Response::Err(err) => Err(Error::from(err)),
        crate::protocol::Response::ResultSet(ColumnCount { columns }) => {
            let defs = read_column_definitions(conn, columns).await?;
            let column_list = columns_from_definitions(defs);
            let (text_rows, ok) = read_text_rows(conn, column_list.len()).await?;
            conn.server_status = ok.status;

            let rows = text_rows
                .into_iter()
                .map(|r| {
                    logger.increment_rows_returned();
                    MySqlRow::from_text(r, column_list.clone())
                })
                .collect();

            Ok(crate::result_set::MySqlResultSet::new(column_list, rows))
        }
    }
}

pub(crate) async fn execute(conn: &mut MySqlConnection, sql: &str) -> Result<MySqlQueryResult> {
    let mut logger = QueryLogger::new(sql, conn.log_settings.clone());
    let payload = run(conn, &ComQuery { sql }).await?;

    match Response::read(&payload)? {
        crate::protocol::Response::Ok(ok) => {
            conn.server_status = ok.status;
            logger.increase_rows_affected(ok.affected_rows);
            Ok(MySqlQueryResult::new(ok.affected_rows, ok.last_insert_id))
        }
        crate::protocol::Response::Err(err) => Err(Error::from(err)),
        crate::protocol::Response::ResultSet(ColumnCount { columns }) => {
            // a SELECT issued through `execute`: drain it so the connection
            // isn't left desynchronized, but report no rows.
            let defs = read_column_definitions(conn, columns).await?;
            let column_count = defs.len();
            let (_rows, ok) = read_text_rows(conn, column_count).await?;
            conn.server_status = ok.status;
            Ok(MySqlQueryResult::new(0, 0))
        }
    }
}

/// Issues `sql` via `COM_QUERY` and reads the first response frame, reporting
/// whether `SERVER_MORE_RESULTS_EXISTS` says another frame follows (§4.7
/// "Multi-result sets", driven by a stored procedure with more than one
/// `SELECT`). Further frames are read with [`query_multi_next`].
pub(crate) async fn query_multi_first(
    conn: &mut MySqlConnection,
    sql: &str,
) -> Result<(StatementResult, bool)> {
    let payload = run(conn, &ComQuery { sql }).await?;
    read_statement_result(conn, &payload).await
}

/// Reads the next frame of a multi-result-set response already in flight;
/// unlike every other command here, this issues no request of its own.
pub(crate) async fn query_multi_next(conn: &mut MySqlConnection) -> Result<(StatementResult, bool)> {
    let payload = match conn.codec.read().await {
        Ok(payload) => payload,
        Err(e) => {
            conn.poison();
            return Err(e);
        }
    };
    read_statement_result(conn, &payload).await
}

async fn read_statement_result(
    conn: &mut MySqlConnection,
    payload: &[u8],
) -> Result<(StatementResult, bool)> {
    match Response::read(payload)? {
        Response::Ok(ok) => {
            conn.server_status = ok.status;
            let more = ok.status.contains(crate::protocol::Status::SERVER_MORE_RESULTS_EXISTS);
            Ok((
                StatementResult::Done(MySqlQueryResult::new(ok.affected_rows, ok.last_insert_id)),
                more,
            ))
        }
        Response::Err(err) => Err(Error::from(err)),
        Response::ResultSet(ColumnCount { columns }) => {
            let defs = read_column_definitions(conn, columns).await?;
            let column_list = columns_from_definitions(defs);
            let (text_rows, ok) = read_text_rows(conn, column_list.len()).await?;
            conn.server_status = ok.status;
            let more = ok.status.contains(crate::protocol::Status::SERVER_MORE_RESULTS_EXISTS);

            let rows = text_rows
                .into_iter()
                .map(|r| MySqlRow::from_text(r, column_list.clone()))
                .collect();

            Ok((
                StatementResult::ResultSet(crate::result_set::MySqlResultSet::new(column_list, rows)),
                more,
            ))
        }
    }
}

pub(crate) async fn prepare(conn: &mut MySqlConnection, sql: &str) -> Result<Prepared> {
    if let Some(prepared) = conn.statement_cache.get(sql) {
        return Ok(prepared);
    }

    let payload = run(conn, &ComStmtPrepare { sql }).await?;
    if payload.first().copied() == Some(0xFF) {
        return Err(Error::from(ErrPacket::read(&payload)?));
    }
    let ok = ComStmtPrepareOk::read(&payload)?;

    // Unlike COM_QUERY/COM_STMT_EXECUTE result sets, COM_STMT_PREPARE_OK's
    // parameter and column definition blocks are each followed by an EOF
    // packet regardless of CLIENT_DEPRECATE_EOF.
    for _ in 0..ok.params {
        conn.codec.read().await?;
    }
    if ok.params > 0 {
        conn.codec.read().await?;
    }
    for _ in 0..ok.columns {
        conn.codec.read().await?;
    }
    if ok.columns > 0 {
        conn.codec.read().await?;
    }

    let prepared = Prepared {
        statement_id: ok.statement_id,
        param_count: ok.params,
        column_count: ok.columns,
    };

    if let Some(evicted) = conn.statement_cache.insert(sql, prepared) {
        close_statement(conn, evicted.statement_id).await?;
    }

    Ok(prepared)
}

pub(crate) async fn close_statement(conn: &mut MySqlConnection, statement_id: u32) -> Result<()> {
    conn.codec.reset_sequence();
    conn.codec.write(&ComStmtClose { statement_id }, conn.capabilities)?;
    conn.codec.flush().await?;
    Ok(())
}

/// `COM_STMT_RESET` (§4.8 `ServerPreparedStatement`'s parameter rebinding):
/// closes any cursor left open by an abandoned fetch loop and clears
/// previously bound parameter data, without forgetting the statement's id.
pub(crate) async fn reset_statement(conn: &mut MySqlConnection, statement_id: u32) -> Result<()> {
    let payload = run(conn, &ComStmtReset { statement_id }).await?;
    match Response::read(&payload)? {
        Response::Ok(ok) => {
            conn.server_status = ok.status;
            Ok(())
        }
        Response::Err(err) => Err(Error::from(err)),
        Response::ResultSet(_) => Err(Error::protocol("unexpected result set from COM_STMT_RESET")),
    }
}

pub(crate) async fn execute_prepared(
    conn: &mut MySqlConnection,
    statement_id: u32,
    params: &MySqlArguments,
    new_params_bound: bool,
    cursor: Cursor,
) -> Result<PreparedOutcome> {
    let (null_bitmap, param_types, param_values) = params.encode_binary();

    let payload = run(
        conn,
        &ComStmtExecute {
            statement_id,
            cursor,
            new_params_bound,
            param_types: &param_types,
            null_bitmap: &null_bitmap,
            params: &param_values,
        },
    )
    .await?;

    match Response::read(&payload)? {
        crate::protocol::Response::Ok(ok) => {
            conn.server_status = ok.status;
            Ok(PreparedOutcome::Done(MySqlQueryResult::new(
                ok.affected_rows,
                ok.last_insert_id,
            )))
        }
        crate::protocol::Response::Err(err) => Err(Error::from(err)),
        crate::protocol::Response::ResultSet(ColumnCount { columns }) => {
            let defs = read_column_definitions(conn, columns).await?;
            let type_ids: Vec<TypeId> = defs.iter().map(|d| d.type_id).collect();
            let column_list = columns_from_definitions(defs);

            if cursor.contains(Cursor::READ_ONLY) {
                // rows are not sent inline; the server holds them for
                // COM_STMT_FETCH (§4.7 streaming).
                return Ok(PreparedOutcome::CursorOpened { columns: column_list });
            }

            let (binary_rows, ok) = read_binary_rows(conn, &type_ids).await?;
            conn.server_status = ok.status;

            let rows = binary_rows
                .into_iter()
                .map(|r| MySqlRow::from_binary(r, column_list.clone()))
                .collect();

            Ok(PreparedOutcome::Rows {
                columns: column_list,
                rows,
            })
        }
    }
}

/// One `COM_STMT_FETCH` round (§4.8): returns the rows of this batch plus
/// whether the server marked it as the last one
/// (`SERVER_STATUS_LAST_ROW_SENT`).
pub(crate) async fn fetch_cursor_batch(
    conn: &mut MySqlConnection,
    statement_id: u32,
    fetch_size: u32,
    columns: &Arc<[MySqlColumn]>,
) -> Result<(Vec<MySqlRow>, bool)> {
    let type_ids: Vec<TypeId> = columns.iter().map(|c| c.type_info().type_id()).collect();

    conn.codec.reset_sequence();
    conn.codec.write(
        &ComStmtFetch {
            statement_id,
            rows: fetch_size,
        },
        conn.capabilities,
    )?;
    conn.codec.flush().await?;

    let (binary_rows, ok) = read_binary_rows(conn, &type_ids).await?;
    conn.server_status = ok.status;

    let last_row_sent = ok
        .status
        .contains(crate::protocol::Status::SERVER_STATUS_LAST_ROW_SENT);

    let rows = binary_rows
        .into_iter()
        .map(|r| MySqlRow::from_binary(r, columns.clone()))
        .collect();

    Ok((rows, last_row_sent))
}
