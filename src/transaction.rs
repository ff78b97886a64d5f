//! The transaction/savepoint controller (C11, §4.9).
//!
//! Autocommit, isolation level, and read-only are session-scoped server
//! variables; every setter here is a `SET` statement run through
//! [`MySqlConnection::execute`], and every getter reads the same session
//! state back. There's no dedicated wire packet for any of this — it's all
//! plain SQL, same as `ldbc-connector`'s own transaction layer.

use crate::connection::MySqlConnection;
use crate::error::{Error, Result};

/// `setTransactionIsolation`/`getTransactionIsolation` (§4.9, §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MySqlIsolationLevel {
    ReadUncommitted,
    ReadCommitted,
    RepeatableRead,
    Serializable,
}

impl MySqlIsolationLevel {
    fn as_sql(self) -> &'static str {
        match self {
            Self::ReadUncommitted => "READ UNCOMMITTED",
            Self::ReadCommitted => "READ COMMITTED",
            Self::RepeatableRead => "REPEATABLE READ",
            Self::Serializable => "SERIALIZABLE",
        }
    }

    fn from_server_value(value: &str) -> Result<Self> {
        match value.trim().to_ascii_uppercase().replace('-', " ").as_str() {
            "READ UNCOMMITTED" => Ok(Self::ReadUncommitted),
            "READ COMMITTED" => Ok(Self::ReadCommitted),
            "REPEATABLE READ" => Ok(Self::RepeatableRead),
            "SERIALIZABLE" => Ok(Self::Serializable),
            other => Err(Error::protocol(format!(
                "unrecognized @@transaction_isolation value: {other}"
            ))),
        }
    }
}

/// A named marker on the transaction stack (§3 "Savepoint"), returned by
/// [`MySqlConnection::set_savepoint`] and consumed by
/// [`MySqlConnection::rollback_to_savepoint`]/[`MySqlConnection::release_savepoint`].
#[derive(Debug, Clone)]
pub struct MySqlSavepoint {
    name: String,
}

impl MySqlSavepoint {
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Quotes `name` as a MySQL identifier (backtick-delimited, internal
/// backticks doubled), since savepoint names can't be bound as `?`
/// placeholders.
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

impl MySqlConnection {
    /// `setAutoCommit` (§4.9, §6): `SET autocommit = 0/1`.
    pub async fn set_autocommit(&mut self, autocommit: bool) -> Result<()> {
        self.execute(if autocommit {
            "SET autocommit = 1"
        } else {
            "SET autocommit = 0"
        })
        .await?;
        Ok(())
    }

    /// `getAutoCommit` (§6): the session's own view of `SERVER_STATUS_AUTOCOMMIT`,
    /// no round trip required.
    pub fn get_autocommit(&self) -> bool {
        self.is_autocommit()
    }

    /// `setReadOnly` (§4.9, §6): `SET TRANSACTION READ ONLY/WRITE`, effective
    /// for the next transaction.
    pub async fn set_read_only(&mut self, read_only: bool) -> Result<()> {
        self.execute(if read_only {
            "SET TRANSACTION READ ONLY"
        } else {
            "SET TRANSACTION READ WRITE"
        })
        .await?;
        Ok(())
    }

    /// `isReadOnly` (§6): reads `@@transaction_read_only` back.
    pub async fn is_read_only(&mut self) -> Result<bool> {
        let mut rows = self.query("SELECT @@transaction_read_only").await?;
        if !rows.next() {
            return Err(Error::protocol("@@transaction_read_only returned no row"));
        }
        Ok(rows.try_get::<i64>(0)?.unwrap_or(0) != 0)
    }

    /// `setTransactionIsolation` (§4.9, §6): `SET TRANSACTION ISOLATION LEVEL ...`,
    /// effective for the next transaction only (matching MySQL's default scope).
    pub async fn set_transaction_isolation(&mut self, level: MySqlIsolationLevel) -> Result<()> {
        self.execute(&format!(
            "SET TRANSACTION ISOLATION LEVEL {}",
            level.as_sql()
        ))
        .await?;
        Ok(())
    }

    /// `getTransactionIsolation` (§6): reads `@@transaction_isolation` back.
    pub async fn get_transaction_isolation(&mut self) -> Result<MySqlIsolationLevel> {
        let mut rows = self.query("SELECT @@transaction_isolation").await?;
        if !rows.next() {
            return Err(Error::protocol("@@transaction_isolation returned no row"));
        }
        let value = rows
            .try_get::<String>(0)?
            .ok_or_else(|| Error::protocol("@@transaction_isolation was NULL"))?;
        MySqlIsolationLevel::from_server_value(&value)
    }

    /// `commit()` (§4.9, §6). Legal only when autocommit is off.
    pub async fn commit(&mut self) -> Result<()> {
        if self.is_autocommit() {
            return Err(Error::NonTransient(
                "Can't call commit when autocommit=true",
            ));
        }
        self.execute("COMMIT").await?;
        Ok(())
    }

    /// `rollback()` (§4.9, §6). Legal only when autocommit is off.
    pub async fn rollback(&mut self) -> Result<()> {
        if self.is_autocommit() {
            return Err(Error::NonTransient(
                "Can't call rollback when autocommit=true",
            ));
        }
        self.execute("ROLLBACK").await?;
        Ok(())
    }

    /// `setSavepoint(name)` (§4.9, §6): `SAVEPOINT name`.
    pub async fn set_savepoint(&mut self, name: impl Into<String>) -> Result<MySqlSavepoint> {
        let name = name.into();
        self.execute(&format!("SAVEPOINT {}", quote_identifier(&name)))
            .await?;
        Ok(MySqlSavepoint { name })
    }

    /// `rollback(Savepoint)` (§4.9, §6): `ROLLBACK TO SAVEPOINT name`.
    pub async fn rollback_to_savepoint(&mut self, savepoint: &MySqlSavepoint) -> Result<()> {
        self.execute(&format!(
            "ROLLBACK TO SAVEPOINT {}",
            quote_identifier(&savepoint.name)
        ))
        .await?;
        Ok(())
    }

    /// `releaseSavepoint(Savepoint)` (§4.9, §6): `RELEASE SAVEPOINT name`.
    pub async fn release_savepoint(&mut self, savepoint: &MySqlSavepoint) -> Result<()> {
        self.execute(&format!(
            "RELEASE SAVEPOINT {}",
            quote_identifier(&savepoint.name)
        ))
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_and_doubles_internal_backticks() {
        assert_eq!(quote_identifier("sp1"), "`sp1`");
        assert_eq!(quote_identifier("weird`name"), "`weird``name`");
    }

    #[test]
    fn isolation_level_round_trips_server_spelling() {
        assert_eq!(
            MySqlIsolationLevel::from_server_value("REPEATABLE-READ").unwrap(),
            MySqlIsolationLevel::RepeatableRead
        );
        assert_eq!(
            MySqlIsolationLevel::from_server_value("read committed").unwrap(),
            MySqlIsolationLevel::ReadCommitted
        );
        assert!(MySqlIsolationLevel::from_server_value("bogus").is_err());
    }
}
