//! Error and Result types.

use std::error::Error as StdError;
use std::fmt::{self, Debug, Display};
use std::io;

/// A specialized `Result` type used throughout this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// The single error type returned by every fallible operation in this crate.
///
/// Recoverable protocol events (auth-switch retries, deprecated-EOF framing,
/// an empty cursor fetch) are handled internally and never surface here; what
/// reaches a caller is always one of the terminal conditions below.
#[derive(Debug)]
pub enum Error {
    /// Transport failure: DNS, connect, read, write, or TLS handshake.
    Io(io::Error),

    /// A `mysql://` connection string could not be parsed, or an option was
    /// out of its valid range (e.g. `max_allowed_packet` outside
    /// `[1024, 16_777_215]`).
    Configuration(Box<str>),

    /// A packet violated the wire protocol: bad header, unexpected packet
    /// identifier, truncated payload, sequence-id mismatch.
    Protocol(Box<str>),

    /// The server returned an `ERR` packet.
    Database(Box<dyn DatabaseError>),

    /// Authentication failed, or an authentication plugin policy was
    /// violated (e.g. full auth requested over plaintext without
    /// `allow_public_key_retrieval`).
    Authentication(Box<str>),

    /// A bound argument count did not match a statement's placeholder count,
    /// or an out parameter's declared type did not match the procedure.
    InvalidArgument(Box<str>),

    /// A temporal column held a zero value (`'0000-00-00'` and its
    /// `DATETIME` sibling), which `time`'s `Date`/`PrimitiveDateTime` can't
    /// represent (§4.7). Distinguished from [`Error::InvalidArgument`] so a
    /// nullable column can decode this as `None` instead of propagating it.
    ZeroDate(&'static str),

    /// An operation was attempted on a `ResultSet` after `close()`, or a
    /// scroll operation was attempted on a `TYPE_FORWARD_ONLY` result set.
    ResultSetState(&'static str),

    /// A session-level invariant was violated (e.g. `commit()` while
    /// autocommit is on).
    NonTransient(&'static str),

    /// A read or operation exceeded its configured timeout. The connection
    /// is unusable after this error and must be closed.
    Timeout,

    /// A logical payload exceeded `max_allowed_packet`; nothing was sent.
    PacketTooLarge { len: usize, max: u32 },

    /// One or more statements in a batch failed; `counts` holds the
    /// per-statement update counts observed before the failure.
    BatchUpdate {
        counts: Vec<i64>,
        source: Box<Error>,
    },

    /// An operation was attempted after the session transitioned to
    /// `Closed` (protocol error, write failure, or read timeout).
    ConnectionClosed,
}

impl Error {
    pub(crate) fn protocol(msg: impl Into<String>) -> Self {
        Error::Protocol(msg.into().into_boxed_str())
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Error::Configuration(msg.into().into_boxed_str())
    }

    pub(crate) fn auth(msg: impl Into<String>) -> Self {
        Error::Authentication(msg.into().into_boxed_str())
    }

    pub(crate) fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into().into_boxed_str())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Database(e) => Some(e.as_ref()),
            Error::BatchUpdate { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "io error: {e}"),
            Error::Configuration(msg) => write!(f, "invalid configuration: {msg}"),
            Error::Protocol(msg) => write!(f, "protocol error: {msg}"),
            Error::Database(e) => Display::fmt(e, f),
            Error::Authentication(msg) => write!(f, "authentication failed: {msg}"),
            Error::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            Error::ZeroDate(kind) => write!(f, "column value is a zero {kind} (e.g. '0000-00-00')"),
            Error::ResultSetState(msg) => f.write_str(msg),
            Error::NonTransient(msg) => f.write_str(msg),
            Error::Timeout => f.write_str("operation timed out"),
            Error::PacketTooLarge { len, max } => write!(
                f,
                "packet of {len} bytes exceeds max_allowed_packet of {max} bytes"
            ),
            Error::BatchUpdate { source, .. } => write!(f, "batch update failed: {source}"),
            Error::ConnectionClosed => f.write_str("connection is closed"),
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        if e.kind() == io::ErrorKind::TimedOut {
            Error::Timeout
        } else {
            Error::Io(e)
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Self {
        Error::config(e.to_string())
    }
}

/// An error returned by the MySQL server, preserving the wire-level detail.
///
/// This is the concrete `DatabaseError` implementation produced by this
/// crate; see [`MySqlErrorKind`] for the SQLState-derived classification
/// used by callers that want to branch on error category rather than
/// string-match `sqlstate()`.
pub trait DatabaseError: Display + Debug + Send + Sync + 'static {
    /// The human-readable message the server returned.
    fn message(&self) -> &str;

    /// The vendor-specific numeric error code (`ER_*` constant).
    fn code(&self) -> u16;

    /// The five-character SQLSTATE string, e.g. `"42S02"`.
    fn sqlstate(&self) -> &str;

    /// Coarse classification of `sqlstate()`'s class (first two characters).
    fn kind(&self) -> MySqlErrorKind {
        MySqlErrorKind::from_sqlstate(self.sqlstate())
    }
}

/// Coarse error classification derived from a SQLSTATE class, per §7.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MySqlErrorKind {
    /// `22***` — data exception (value out of range, invalid cast, …).
    Data,
    /// `23***` — integrity constraint violation.
    IntegrityConstraintViolation,
    /// `42***` — syntax error or access rule violation.
    Syntax,
    /// `HY000` / `HYT**` — transient or driver-defined condition.
    Transient,
    /// Anything not specially classified above.
    Other,
}

impl MySqlErrorKind {
    pub(crate) fn from_sqlstate(sqlstate: &str) -> Self {
        match sqlstate.get(0..2) {
            Some("22") => MySqlErrorKind::Data,
            Some("23") => MySqlErrorKind::IntegrityConstraintViolation,
            Some("42") => MySqlErrorKind::Syntax,
            _ if sqlstate == "HY000" || sqlstate.starts_with("HYT") => MySqlErrorKind::Transient,
            _ => MySqlErrorKind::Other,
        }
    }
}

/// The concrete [`DatabaseError`] produced from a server `ERR` packet (§4.5).
#[derive(Debug, Clone)]
pub struct MySqlError {
    code: u16,
    sqlstate: String,
    message: String,
}

impl MySqlError {
    pub(crate) fn new(code: u16, sqlstate: String, message: String) -> Self {
        Self {
            code,
            sqlstate,
            message,
        }
    }
}

impl Display for MySqlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.code, self.sqlstate, self.message)
    }
}

impl StdError for MySqlError {}

impl DatabaseError for MySqlError {
    fn message(&self) -> &str {
        &self.message
    }

    fn code(&self) -> u16 {
        self.code
    }

    fn sqlstate(&self) -> &str {
        &self.sqlstate
    }
}

impl From<crate::protocol::ErrPacket> for Error {
    fn from(packet: crate::protocol::ErrPacket) -> Self {
        Error::Database(Box::new(MySqlError::new(
            packet.error_code,
            packet.sql_state,
            packet.error_message,
        )))
    }
}
