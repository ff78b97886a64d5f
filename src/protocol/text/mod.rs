//! Text-protocol packets (`COM_QUERY`'s request and the row encoding both it
//! and `COM_STMT_EXECUTE`'s text fallback share, §4.6).

mod com_query;
mod row;

pub(crate) use com_query::ComQuery;
pub(crate) use row::TextRow;
