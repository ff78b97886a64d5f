//! Binary-protocol packets used by server-side prepared statements (§4.6).

mod com_stmt_close;
mod com_stmt_execute;
mod com_stmt_fetch;
mod com_stmt_prepare;
mod com_stmt_prepare_ok;
mod com_stmt_reset;
mod row;

pub(crate) use com_stmt_close::ComStmtClose;
pub(crate) use com_stmt_execute::{ComStmtExecute, Cursor, ParamType};
pub(crate) use com_stmt_fetch::ComStmtFetch;
pub(crate) use com_stmt_prepare::ComStmtPrepare;
pub(crate) use com_stmt_prepare_ok::ComStmtPrepareOk;
pub(crate) use com_stmt_reset::ComStmtReset;
pub(crate) use row::BinaryRow;
