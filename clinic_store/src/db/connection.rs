//! SQLite connection helpers.
//!
//! [`connect_sqlite`] opens a connection and applies the connection-wide PRAGMAs every reader and
//! writer relies on: a 5000ms busy_timeout, WAL journaling and foreign_keys=ON.
//!
//! Example:
//! ```no_run
//! use clinic_store::db::connection::connect_sqlite;
//!
//! let path = std::env::temp_dir().join("clinic_example.db");
//! let _conn = connect_sqlite(path.to_str().unwrap()).expect("open sqlite");
//! ```

use diesel::{Connection, RunQueryDsl, SqliteConnection, sql_query};

/// Strip an optional `sqlite://` or `sqlite:` scheme; diesel wants a path or `file:` URI.
pub fn sqlite_path(database_url: &str) -> &str {
    database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))
        .unwrap_or(database_url)
}

/// Open a SQLite connection and apply connection-wide PRAGMAs.
pub fn connect_sqlite(database_url: &str) -> anyhow::Result<SqliteConnection> {
    let mut conn = SqliteConnection::establish(sqlite_path(database_url))?;

    // busy_timeout first: several readers may open the same file at once
    sql_query("PRAGMA busy_timeout=5000;").execute(&mut conn)?;
    sql_query("PRAGMA journal_mode=WAL;").execute(&mut conn)?;
    sql_query("PRAGMA foreign_keys=ON;").execute(&mut conn)?;
    Ok(conn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheme_is_optional() {
        assert_eq!(sqlite_path("sqlite:///tmp/a.db"), "/tmp/a.db");
        assert_eq!(sqlite_path("sqlite:clinic.db"), "clinic.db");
        assert_eq!(sqlite_path("/var/lib/clinic.db"), "/var/lib/clinic.db");
        assert_eq!(
            sqlite_path("file:clinic.db?mode=ro"),
            "file:clinic.db?mode=ro"
        );
    }
}
