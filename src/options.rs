//! Connection configuration (§6).

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use url::Url;

use crate::error::{Error, Result};
use crate::net::SocketOptions;

/// Whether and with what priority a TLS connection is negotiated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MySqlSslMode {
    /// Never upgrade to TLS.
    #[default]
    None,
    /// Upgrade to TLS and validate the server certificate against
    /// `ssl_ca` (or the bundled Mozilla roots if unset).
    Trusted,
    /// Upgrade to TLS and validate the server certificate against the
    /// platform trust store (falls back to the bundled roots; see
    /// `net::tls`).
    System,
}

impl FromStr for MySqlSslMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "none" | "None" | "DISABLED" => Ok(MySqlSslMode::None),
            "trusted" | "Trusted" => Ok(MySqlSslMode::Trusted),
            "system" | "System" => Ok(MySqlSslMode::System),
            _ => Err(Error::config(format!("unknown ssl mode: {s:?}"))),
        }
    }
}

/// Which axis `DatabaseMetaData` (C12) reports as "catalog" and which as
/// "schema".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DatabaseTerm {
    Catalog,
    #[default]
    Schema,
}

/// Options and flags used to configure a MySQL connection (§6).
///
/// Values are immutable once built: every setter consumes `self` and
/// returns a new value, so a `MySqlConnectOptions` can be shared and
/// cloned freely without aliasing surprises (see DESIGN.md, Open Question
/// on configuration mutability).
#[derive(Debug, Clone)]
pub struct MySqlConnectOptions {
    pub(crate) host: String,
    pub(crate) port: u16,
    pub(crate) username: String,
    pub(crate) password: Option<String>,
    pub(crate) database: Option<String>,

    pub(crate) ssl_mode: MySqlSslMode,
    pub(crate) ssl_ca: Option<PathBuf>,

    pub(crate) socket_options: SocketOptions,
    pub(crate) read_timeout: Option<Duration>,

    pub(crate) allow_public_key_retrieval: bool,
    pub(crate) database_term: DatabaseTerm,
    pub(crate) use_cursor_fetch: bool,
    pub(crate) use_server_prep_stmts: bool,
    pub(crate) max_allowed_packet: u32,

    pub(crate) statement_cache_capacity: usize,
    pub(crate) debug: bool,
}

pub(crate) const MIN_MAX_ALLOWED_PACKET: u32 = 1024;
pub(crate) const MAX_MAX_ALLOWED_PACKET: u32 = 16_777_215;
const DEFAULT_MAX_ALLOWED_PACKET: u32 = 65_535;

impl Default for MySqlConnectOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl MySqlConnectOptions {
    pub fn new() -> Self {
        Self {
            host: String::from("localhost"),
            port: 3306,
            username: String::from("root"),
            password: None,
            database: None,
            ssl_mode: MySqlSslMode::None,
            ssl_ca: None,
            socket_options: SocketOptions::default(),
            read_timeout: None,
            allow_public_key_retrieval: false,
            database_term: DatabaseTerm::Schema,
            use_cursor_fetch: false,
            use_server_prep_stmts: false,
            max_allowed_packet: DEFAULT_MAX_ALLOWED_PACKET,
            statement_cache_capacity: 100,
            debug: false,
        }
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    pub fn ssl_mode(mut self, mode: MySqlSslMode) -> Self {
        self.ssl_mode = mode;
        self
    }

    pub fn ssl_ca(mut self, file_name: impl AsRef<Path>) -> Self {
        self.ssl_ca = Some(file_name.as_ref().to_owned());
        self
    }

    pub fn socket_options(mut self, options: SocketOptions) -> Self {
        self.socket_options = options;
        self
    }

    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    pub fn allow_public_key_retrieval(mut self, allow: bool) -> Self {
        self.allow_public_key_retrieval = allow;
        self
    }

    pub fn database_term(mut self, term: DatabaseTerm) -> Self {
        self.database_term = term;
        self
    }

    pub fn use_cursor_fetch(mut self, enabled: bool) -> Self {
        self.use_cursor_fetch = enabled;
        self
    }

    pub fn use_server_prep_stmts(mut self, enabled: bool) -> Self {
        self.use_server_prep_stmts = enabled;
        self
    }

    /// Sets `max_allowed_packet`. Must be within `[1024, 16_777_215]`.
    pub fn max_allowed_packet(mut self, bytes: u32) -> Result<Self> {
        if !(MIN_MAX_ALLOWED_PACKET..=MAX_MAX_ALLOWED_PACKET).contains(&bytes) {
            return Err(Error::config(format!(
                "max_allowed_packet must be within [{MIN_MAX_ALLOWED_PACKET}, {MAX_MAX_ALLOWED_PACKET}], got {bytes}"
            )));
        }
        self.max_allowed_packet = bytes;
        Ok(self)
    }

    pub fn statement_cache_capacity(mut self, capacity: usize) -> Self {
        self.statement_cache_capacity = capacity;
        self
    }

    pub fn debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }
}

impl FromStr for MySqlConnectOptions {
    type Err = Error;

    /// Parses `mysql://[user[:password]@][host][:port][/database][?properties]`.
    fn from_str(s: &str) -> Result<Self> {
        let url: Url = s.parse()?;
        let mut options = Self::new();

        if let Some(host) = url.host_str() {
            options = options.host(host);
        }

        if let Some(port) = url.port() {
            options = options.port(port);
        }

        let username = url.username();
        if !username.is_empty() {
            options = options.username(username);
        }

        if let Some(password) = url.password() {
            options = options.password(password);
        }

        let path = url.path().trim_start_matches('/');
        if !path.is_empty() {
            options = options.database(path);
        }

        for (key, value) in url.query_pairs() {
            options = match &*key {
                "ssl-mode" => options.ssl_mode(value.parse()?),
                "ssl-ca" => options.ssl_ca(&*value),
                "statement-cache-capacity" => options.statement_cache_capacity(
                    value
                        .parse()
                        .map_err(|_| Error::config("invalid statement-cache-capacity"))?,
                ),
                "read-timeout-ms" => options.read_timeout(Duration::from_millis(
                    value
                        .parse()
                        .map_err(|_| Error::config("invalid read-timeout-ms"))?,
                )),
                "allow-public-key-retrieval" => options.allow_public_key_retrieval(
                    value
                        .parse()
                        .map_err(|_| Error::config("invalid allow-public-key-retrieval"))?,
                ),
                "use-cursor-fetch" => options.use_cursor_fetch(
                    value
                        .parse()
                        .map_err(|_| Error::config("invalid use-cursor-fetch"))?,
                ),
                "use-server-prep-stmts" => options.use_server_prep_stmts(
                    value
                        .parse()
                        .map_err(|_| Error::config("invalid use-server-prep-stmts"))?,
                ),
                "max-allowed-packet" => options.max_allowed_packet(
                    value
                        .parse()
                        .map_err(|_| Error::config("invalid max-allowed-packet"))?,
                )?,
                _ => options,
            };
        }

        Ok(options)
    }
}
