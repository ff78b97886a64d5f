//! The result-set cursor engine (C9, §4.7): a materialized, scrollable
//! result set for ordinary queries, and a forward-only streaming variant for
//! a server-side cursor opened with `use_cursor_fetch` (§4.8).

use std::sync::Arc;

use crate::column::MySqlColumn;
use crate::connection::MySqlConnection;
use crate::error::{Error, Result};
use crate::row::MySqlRow;
use crate::types::MySqlType;

/// Where a [`MySqlResultSet`]'s cursor sits relative to its rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    BeforeFirst,
    At(usize),
    AfterLast,
}

/// A fully materialized, scrollable result set (§4.7).
///
/// Every row was already read off the wire by the executor before this was
/// constructed, so every scroll operation below is synchronous and never
/// touches the connection; this is the `TYPE_SCROLL_INSENSITIVE` side of the
/// contract, at the cost of buffering the whole result client-side. Use
/// [`MySqlCursorResultSet`] when that cost isn't acceptable.
#[derive(Debug)]
pub struct MySqlResultSet {
    columns: Arc<[MySqlColumn]>,
    rows: Vec<MySqlRow>,
    position: Position,
    closed: bool,
}

impl MySqlResultSet {
    pub(crate) fn new(columns: Arc<[MySqlColumn]>, rows: Vec<MySqlRow>) -> Self {
        Self {
            columns,
            rows,
            position: Position::BeforeFirst,
            closed: false,
        }
    }

    /// Closes the result set (§3, §6 `ResultSet::close`). Idempotent;
    /// every typed accessor fails with [`Error::ResultSetState`] afterwards
    /// (Testable Property 5).
    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn columns(&self) -> &[MySqlColumn] {
        &self.columns
    }

    /// Advances to the next row, returning `false` once exhausted (§4.7
    /// `next()`).
    pub fn next(&mut self) -> bool {
        let candidate = match self.position {
            Position::BeforeFirst => 0,
            Position::At(i) => i + 1,
            Position::AfterLast => return false,
        };

        if candidate < self.rows.len() {
            self.position = Position::At(candidate);
            true
        } else {
            self.position = Position::AfterLast;
            false
        }
    }

    pub fn previous(&mut self) -> bool {
        match self.position {
            Position::At(0) | Position::BeforeFirst => {
                self.position = Position::BeforeFirst;
                false
            }
            Position::At(i) => {
                self.position = Position::At(i - 1);
                true
            }
            Position::AfterLast => {
                if self.rows.is_empty() {
                    self.position = Position::BeforeFirst;
                    false
                } else {
                    self.position = Position::At(self.rows.len() - 1);
                    true
                }
            }
        }
    }

    /// Moves to an absolute row number (1-based; negative counts back from
    /// the end, as in JDBC's `absolute(int)`).
    pub fn absolute(&mut self, row: i64) -> bool {
        if self.rows.is_empty() {
            self.position = Position::BeforeFirst;
            return false;
        }

        let target = if row >= 0 {
            row - 1
        } else {
            self.rows.len() as i64 + row
        };

        if target < 0 {
            self.position = Position::BeforeFirst;
            false
        } else if target as usize >= self.rows.len() {
            self.position = Position::AfterLast;
            false
        } else {
            self.position = Position::At(target as usize);
            true
        }
    }

    pub fn relative(&mut self, offset: i64) -> bool {
        let current = match self.position {
            Position::BeforeFirst => -1,
            Position::At(i) => i as i64,
            Position::AfterLast => self.rows.len() as i64,
        };

        self.absolute(current + offset + 1)
    }

    /// The 1-based row number of the cursor, or `0` when not positioned on a
    /// row (§4.7 `getRow()`).
    pub fn row_number(&self) -> u64 {
        match self.position {
            Position::At(i) => i as u64 + 1,
            _ => 0,
        }
    }

    pub fn is_before_first(&self) -> bool {
        self.position == Position::BeforeFirst
    }

    pub fn is_after_last(&self) -> bool {
        self.position == Position::AfterLast
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn current(&self) -> Result<&MySqlRow> {
        if self.closed {
            return Err(Error::ResultSetState("result set is closed"));
        }
        match self.position {
            Position::At(i) => Ok(&self.rows[i]),
            Position::BeforeFirst => Err(Error::ResultSetState("cursor is positioned before the first row")),
            Position::AfterLast => Err(Error::ResultSetState("cursor is positioned after the last row")),
        }
    }

    pub fn try_get<T: MySqlType>(&self, index: usize) -> Result<Option<T>> {
        self.current()?.try_get(index)
    }

    pub fn try_get_by_name<T: MySqlType>(&self, name: &str) -> Result<Option<T>> {
        self.current()?.try_get_by_name(name)
    }

    pub fn was_null(&self, index: usize) -> Result<bool> {
        self.current()?.was_null(index)
    }
}

/// A forward-only result set backed by a server-side cursor (§4.8): rows are
/// pulled `fetch_size` at a time with `COM_STMT_FETCH` as `next()` is
/// called, instead of being read all at once.
///
/// Any scroll operation besides `next()` is a programming error (a
/// `TYPE_FORWARD_ONLY` result set, in JDBC terms) and returns
/// [`Error::ResultSetState`].
pub struct MySqlCursorResultSet<'c> {
    conn: &'c mut MySqlConnection,
    columns: Arc<[MySqlColumn]>,
    statement_id: u32,
    fetch_size: u32,
    buffered: std::collections::VecDeque<MySqlRow>,
    current: Option<MySqlRow>,
    exhausted: bool,
    closed: bool,
}

impl<'c> MySqlCursorResultSet<'c> {
    pub(crate) fn new(
        conn: &'c mut MySqlConnection,
        columns: Arc<[MySqlColumn]>,
        statement_id: u32,
        fetch_size: u32,
    ) -> Self {
        Self {
            conn,
            columns,
            statement_id,
            fetch_size,
            buffered: std::collections::VecDeque::new(),
            current: None,
            exhausted: false,
            closed: false,
        }
    }

    pub fn columns(&self) -> &[MySqlColumn] {
        &self.columns
    }

    /// Closes the result set (§3, §6 `ResultSet::close`). Idempotent;
    /// every typed accessor fails with [`Error::ResultSetState`] afterwards
    /// (Testable Property 5).
    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Fetches the next row, issuing a `COM_STMT_FETCH` batch when the
    /// client-side buffer runs dry. Returns `false` once the server signals
    /// `SERVER_STATUS_LAST_ROW_SENT` and the buffer is empty.
    pub async fn next(&mut self) -> Result<bool> {
        if self.buffered.is_empty() && !self.exhausted {
            let (rows, last_row_sent) = self
                .conn
                .fetch_cursor_batch(self.statement_id, self.fetch_size, &self.columns)
                .await?;
            self.buffered.extend(rows);
            self.exhausted = last_row_sent;
        }

        match self.buffered.pop_front() {
            Some(row) => {
                self.current = Some(row);
                Ok(true)
            }
            None => {
                self.current = None;
                Ok(false)
            }
        }
    }

    fn current(&self) -> Result<&MySqlRow> {
        if self.closed {
            return Err(Error::ResultSetState("result set is closed"));
        }
        self.current
            .as_ref()
            .ok_or_else(|| Error::ResultSetState("cursor is not positioned on a row"))
    }

    pub fn try_get<T: MySqlType>(&self, index: usize) -> Result<Option<T>> {
        self.current()?.try_get(index)
    }

    pub fn try_get_by_name<T: MySqlType>(&self, name: &str) -> Result<Option<T>> {
        self.current()?.try_get_by_name(name)
    }

    pub fn was_null(&self, index: usize) -> Result<bool> {
        self.current()?.was_null(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{ColumnDefinition, ColumnFlags, TypeId, UTF8MB4_GENERAL_CI};

    fn columns() -> Arc<[MySqlColumn]> {
        vec![MySqlColumn::from_definition(ColumnDefinition {
            schema: None,
            table_alias: None,
            table: None,
            column_alias: None,
            column: Some("id".to_owned()),
            char_set: UTF8MB4_GENERAL_CI as u16,
            max_size: 11,
            type_id: TypeId::LONG,
            flags: ColumnFlags::empty(),
            decimals: 0,
        })]
        .into()
    }

    fn row(n: i32) -> MySqlRow {
        let bytes = n.to_string().into_bytes();
        let mut payload = Vec::new();
        payload.push(bytes.len() as u8);
        payload.extend_from_slice(&bytes);
        let text_row = crate::protocol::TextRow::read(bytes::Bytes::from(payload), 1).unwrap();
        MySqlRow::from_text(text_row, columns())
    }

    #[test]
    fn next_walks_forward_and_stops_after_last() {
        let mut rs = MySqlResultSet::new(columns(), vec![row(1), row(2)]);
        assert!(rs.is_before_first());
        assert!(rs.next());
        assert_eq!(rs.try_get::<i32>(0).unwrap(), Some(1));
        assert!(rs.next());
        assert_eq!(rs.try_get::<i32>(0).unwrap(), Some(2));
        assert!(!rs.next());
        assert!(rs.is_after_last());
        assert!(rs.try_get::<i32>(0).is_err());
    }

    #[test]
    fn absolute_supports_negative_indexing_from_the_end() {
        let mut rs = MySqlResultSet::new(columns(), vec![row(1), row(2), row(3)]);
        assert!(rs.absolute(-1));
        assert_eq!(rs.row_number(), 3);
        assert_eq!(rs.try_get::<i32>(0).unwrap(), Some(3));

        assert!(!rs.absolute(10));
        assert!(rs.is_after_last());
    }

    #[test]
    fn previous_from_after_last_lands_on_the_last_row() {
        let mut rs = MySqlResultSet::new(columns(), vec![row(1), row(2)]);
        while rs.next() {}
        assert!(rs.previous());
        assert_eq!(rs.try_get::<i32>(0).unwrap(), Some(2));
    }
}
