//! Database connection management
//!
//! Opens and configures SQLite connections from an `EngineConfig`.

use crate::errors::{from_rusqlite, invalid_url, Result};
use relmap_core_types::schema::EVENT_ECHO;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Where the database lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseTarget {
    /// Private in-memory database, gone when the connection closes
    Memory,
    /// Database file on disk
    File(PathBuf),
}

impl DatabaseTarget {
    /// Parse a database URL
    ///
    /// Accepts `sqlite:///:memory:`, `sqlite://`, `:memory:`,
    /// `sqlite:///relative/path.db`, `sqlite:////absolute/path.db`, or a bare path.
    ///
    /// # Errors
    /// * `InvalidInput` - for a non-sqlite scheme or an empty URL
    pub fn parse(url: &str) -> Result<Self> {
        let url = url.trim();
        if url.is_empty() {
            return Err(invalid_url(url, "empty"));
        }

        let path = match url.strip_prefix("sqlite://") {
            Some(rest) if rest.is_empty() => return Ok(DatabaseTarget::Memory),
            Some(rest) => rest
                .strip_prefix('/')
                .ok_or_else(|| invalid_url(url, "expected sqlite:///<path>"))?,
            None if url.contains("://") => {
                return Err(invalid_url(url, "only sqlite URLs are supported"));
            }
            None => url,
        };

        if path.is_empty() || path == ":memory:" {
            Ok(DatabaseTarget::Memory)
        } else {
            Ok(DatabaseTarget::File(PathBuf::from(path)))
        }
    }

    pub fn is_memory(&self) -> bool {
        matches!(self, DatabaseTarget::Memory)
    }
}

impl FromStr for DatabaseTarget {
    type Err = relmap_core::ExError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Engine settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub database: DatabaseTarget,
    /// Log every SQL statement the connection runs
    pub echo: bool,
    /// Enforce foreign keys (`PRAGMA foreign_keys`)
    pub foreign_keys: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            database: DatabaseTarget::Memory,
            echo: false,
            foreign_keys: true,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_database(mut self, database: DatabaseTarget) -> Self {
        self.database = database;
        self
    }

    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    pub fn with_foreign_keys(mut self, foreign_keys: bool) -> Self {
        self.foreign_keys = foreign_keys;
        self
    }
}

/// Open a SQLite database at the given path
///
/// # Errors
/// * `Persistence` - if SQLite cannot open the file
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    Connection::open(path).map_err(from_rusqlite)
}

/// Open an in-memory SQLite database
///
/// # Errors
/// * `Persistence` - if SQLite cannot allocate the database
pub fn open_in_memory() -> Result<Connection> {
    Connection::open_in_memory().map_err(from_rusqlite)
}

/// Open and configure a connection as described by `config`
///
/// # Errors
/// * `Persistence` - if the database cannot be opened or configured
pub fn connect(config: &EngineConfig) -> Result<Connection> {
    let mut conn = match &config.database {
        DatabaseTarget::Memory => open_in_memory()?,
        DatabaseTarget::File(path) => open(path)?,
    };

    if config.echo {
        conn.trace(Some(echo_sql));
    }

    configure(&conn, config)?;

    tracing::debug!(
        database = ?config.database,
        echo = config.echo,
        foreign_keys = config.foreign_keys,
        "Opened database connection"
    );

    Ok(conn)
}

/// Apply connection pragmas
///
/// # Errors
/// * `Persistence` - if a pragma is rejected
pub fn configure(conn: &Connection, config: &EngineConfig) -> Result<()> {
    conn.pragma_update(None, "foreign_keys", config.foreign_keys)
        .map_err(from_rusqlite)?;

    // WAL only applies to file databases; in-memory ones stay in "memory" mode
    if !config.database.is_memory() {
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
            row.get::<_, String>(0)
        })
        .map_err(from_rusqlite)?;
    }

    Ok(())
}

fn echo_sql(sql: &str) {
    tracing::info!(
        component = module_path!(),
        op = "sql",
        event = EVENT_ECHO,
        sql = sql,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_memory_urls() {
        for url in ["sqlite:///:memory:", "sqlite:///", "sqlite://", ":memory:"] {
            assert_eq!(DatabaseTarget::parse(url).unwrap(), DatabaseTarget::Memory);
        }
    }

    #[test]
    fn test_parse_file_urls() {
        assert_eq!(
            DatabaseTarget::parse("sqlite:///data/app.db").unwrap(),
            DatabaseTarget::File(PathBuf::from("data/app.db"))
        );
        assert_eq!(
            DatabaseTarget::parse("sqlite:////tmp/app.db").unwrap(),
            DatabaseTarget::File(PathBuf::from("/tmp/app.db"))
        );
        assert_eq!(
            DatabaseTarget::parse("app.db").unwrap(),
            DatabaseTarget::File(PathBuf::from("app.db"))
        );
    }

    #[test]
    fn test_parse_rejects_other_schemes() {
        assert!(DatabaseTarget::parse("postgres://localhost/db").is_err());
        assert!(DatabaseTarget::parse("sqlite:/relative").is_ok());
        assert!(DatabaseTarget::parse("  ").is_err());
    }

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert!(config.database.is_memory());
        assert!(!config.echo);
        assert!(config.foreign_keys);
    }

    #[test]
    fn test_connect_enables_foreign_keys() {
        let conn = connect(&EngineConfig::new()).unwrap();
        let enabled: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(enabled, 1);
    }

    #[test]
    fn test_connect_can_disable_foreign_keys() {
        let conn = connect(&EngineConfig::new().with_foreign_keys(false)).unwrap();
        let enabled: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(enabled, 0);
    }
}
