//! Configuration for gredis
//!
//! Connection options resolved once, before a session is dialed.
//!
//! ## Connection string
//! ```text
//! gredis://[:PASSWORD@]HOST[:PORT][/DB][?db=DB][&password=PASSWORD]
//! ```
//!
//! - A password in the userinfo wins over the `password` query parameter.
//! - A database in the path wins over the `db` query parameter.

use std::str::FromStr;
use std::time::Duration;

use percent_encoding::percent_decode_str;
use url::{Host, Url};

use crate::error::{GredisError, Result};

/// URL scheme accepted by [`Options::from_url`]
pub const SCHEME: &str = "gredis";

/// Host used when the connection string names none
pub const DEFAULT_HOST: &str = "localhost";

/// Port used when the connection string names none
pub const DEFAULT_PORT: u16 = 16379;

/// Default budget for establishing the TCP connection
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(60);

/// Default deadline for reading one reply
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(2);

/// Default deadline for flushing one command
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(2);

/// Connection options for one session
///
/// A zero timeout means no deadline at all: the operation blocks until the
/// transport answers or fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    // -------------------------------------------------------------------------
    // Endpoint
    // -------------------------------------------------------------------------
    pub host: String,
    pub port: u16,

    // -------------------------------------------------------------------------
    // Handshake
    // -------------------------------------------------------------------------
    /// Logical database selected after connecting (0 skips SELECT)
    pub db: u32,

    /// Password sent with AUTH after connecting (empty skips AUTH)
    pub password: String,

    // -------------------------------------------------------------------------
    // Deadlines
    // -------------------------------------------------------------------------
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub write_timeout: Duration,

    // -------------------------------------------------------------------------
    // Diagnostics
    // -------------------------------------------------------------------------
    /// Emit every raw chunk on the wire as a `gredis::wire` debug event
    pub trace_protocol: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            db: 0,
            password: String::new(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
            write_timeout: DEFAULT_WRITE_TIMEOUT,
            trace_protocol: false,
        }
    }
}

impl Options {
    /// Create a new options builder
    pub fn builder() -> OptionsBuilder {
        OptionsBuilder::default()
    }

    /// Resolve options from a `gredis://` connection string
    ///
    /// Timeouts are always the defaults; only endpoint, password and
    /// database come from the string.
    pub fn from_url(raw: &str) -> Result<Self> {
        let url = match Url::parse(raw) {
            Ok(url) => url,
            // No "scheme:" prefix at all, e.g. "localhost".
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                return Err(GredisError::InvalidScheme(String::new()))
            }
            Err(_) => return Err(GredisError::InvalidUrl),
        };

        if url.scheme() != SCHEME {
            return Err(GredisError::InvalidScheme(url.scheme().to_string()));
        }
        // "gredis:host" has no authority; its text would land in the path.
        if url.cannot_be_a_base() {
            return Err(GredisError::InvalidUrl);
        }

        let mut options = Options::default();

        let host = match url.host() {
            Some(Host::Domain(domain)) => domain.to_string(),
            Some(Host::Ipv4(addr)) => addr.to_string(),
            Some(Host::Ipv6(addr)) => addr.to_string(),
            None => String::new(),
        };
        if !host.is_empty() {
            options.host = host;
        }
        if let Some(port) = url.port() {
            options.port = port;
        }

        let mut query_password = None;
        let mut query_db = None;
        for (name, value) in url.query_pairs() {
            match name.as_ref() {
                "password" if query_password.is_none() => query_password = Some(value.into_owned()),
                "db" if query_db.is_none() => query_db = Some(value.into_owned()),
                _ => {}
            }
        }

        options.password = match url.password() {
            Some(password) => percent_decode_str(password).decode_utf8_lossy().into_owned(),
            None => query_password.unwrap_or_default(),
        };

        if let Some(db) = query_db.filter(|db| !db.is_empty()) {
            options.db = parse_db(&db)?;
        }

        // Path segment is evaluated last so it overrides ?db=
        let path = url.path();
        if path.len() > 1 {
            options.db = parse_db(&path[1..])?;
        }

        Ok(options)
    }

    /// `host:port` form of the endpoint, for logging
    pub fn address(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

impl FromStr for Options {
    type Err = GredisError;

    fn from_str(s: &str) -> Result<Self> {
        Options::from_url(s)
    }
}

fn parse_db(raw: &str) -> Result<u32> {
    raw.parse()
        .map_err(|_| GredisError::InvalidDatabase(raw.to_string()))
}

/// Builder for Options
#[derive(Default)]
pub struct OptionsBuilder {
    options: Options,
}

impl OptionsBuilder {
    /// Set the server host name or address
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.options.host = host.into();
        self
    }

    /// Set the server port
    pub fn port(mut self, port: u16) -> Self {
        self.options.port = port;
        self
    }

    /// Set the database selected after connecting
    pub fn db(mut self, db: u32) -> Self {
        self.options.db = db;
        self
    }

    /// Set the password sent after connecting
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.options.password = password.into();
        self
    }

    /// Set the connect timeout (zero waits for the OS)
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.options.connect_timeout = timeout;
        self
    }

    /// Set the read deadline per reply (zero disables it)
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.options.read_timeout = timeout;
        self
    }

    /// Set the write deadline per flush (zero disables it)
    pub fn write_timeout(mut self, timeout: Duration) -> Self {
        self.options.write_timeout = timeout;
        self
    }

    /// Enable wire-level tracing
    pub fn trace_protocol(mut self, enabled: bool) -> Self {
        self.options.trace_protocol = enabled;
        self
    }

    pub fn build(self) -> Options {
        self.options
    }
}
