//! Small shared utilities used across modules.

mod statement_cache;

pub(crate) use statement_cache::StatementCache;
