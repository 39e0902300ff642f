use std::fmt;
use std::time::Duration;

use crate::error::{DbEngineError, Result};

/// Connection and behaviour settings for a [`crate::ConnectionSession`].
#[derive(Clone, PartialEq)]
pub struct SessionConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    /// When set, failed statements are only captured in their outcome, not reported.
    pub suppress_errors: bool,
    /// Upper bound for each statement. `None` means no timeout (default).
    pub query_timeout: Option<Duration>,
    pub connect_timeout: Option<Duration>,
}

impl SessionConfig {
    /// Settings for `database` on `localhost:5432`.
    pub fn new(
        user: impl Into<String>,
        password: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: user.into(),
            password: password.into(),
            database: database.into(),
            suppress_errors: false,
            query_timeout: None,
            connect_timeout: None,
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_suppress_errors(mut self, suppress: bool) -> Self {
        self.suppress_errors = suppress;
        self
    }

    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = Some(timeout);
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Loads `.env` if present, then reads `DBENGINE_*` variables.
    ///
    /// `DBENGINE_USER` and `DBENGINE_DATABASE` are required; `DBENGINE_HOST`,
    /// `DBENGINE_PORT`, `DBENGINE_PASSWORD`, `DBENGINE_SUPPRESS_ERRORS`,
    /// `DBENGINE_QUERY_TIMEOUT_MS` and `DBENGINE_CONNECT_TIMEOUT_MS` are optional.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| {
            lookup(key).ok_or_else(|| DbEngineError::Config(format!("{key} is not set")))
        };

        let mut config = Self::new(
            required("DBENGINE_USER")?,
            lookup("DBENGINE_PASSWORD").unwrap_or_default(),
            required("DBENGINE_DATABASE")?,
        );

        if let Some(host) = lookup("DBENGINE_HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("DBENGINE_PORT") {
            config.port = parse("DBENGINE_PORT", &port)?;
        }
        if let Some(flag) = lookup("DBENGINE_SUPPRESS_ERRORS") {
            config.suppress_errors = parse_flag("DBENGINE_SUPPRESS_ERRORS", &flag)?;
        }
        if let Some(ms) = lookup("DBENGINE_QUERY_TIMEOUT_MS") {
            config.query_timeout = Some(Duration::from_millis(parse(
                "DBENGINE_QUERY_TIMEOUT_MS",
                &ms,
            )?));
        }
        if let Some(ms) = lookup("DBENGINE_CONNECT_TIMEOUT_MS") {
            config.connect_timeout = Some(Duration::from_millis(parse(
                "DBENGINE_CONNECT_TIMEOUT_MS",
                &ms,
            )?));
        }

        Ok(config)
    }

    pub(crate) fn to_pg_config(&self) -> tokio_postgres::Config {
        let mut pg = tokio_postgres::Config::new();
        pg.host(&self.host)
            .port(self.port)
            .user(&self.user)
            .password(&self.password)
            .dbname(&self.database);
        if let Some(timeout) = self.connect_timeout {
            pg.connect_timeout(timeout);
        }
        pg
    }
}

fn parse<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| DbEngineError::Config(format!("{key} has invalid value '{raw}'")))
}

fn parse_flag(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(DbEngineError::Config(format!(
            "{key} has invalid value '{raw}'"
        ))),
    }
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("suppress_errors", &self.suppress_errors)
            .field("query_timeout", &self.query_timeout)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}
