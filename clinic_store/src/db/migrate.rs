//! Embedded schema migrations.

use anyhow::anyhow;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

use crate::db::connection::connect_sqlite;

/// Diesel migrations bundled with this crate.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Apply pending migrations to the SQLite database at `database_url`.
///
/// The connection gets the usual PRAGMAs, so the file is left in WAL mode. Returns the number
/// of migrations applied.
pub fn run_sqlite(database_url: &str) -> anyhow::Result<usize> {
    let mut conn = connect_sqlite(database_url)?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| anyhow!(e))?;

    info!(applied = applied.len(), "migrations applied");
    Ok(applied.len())
}

#[cfg(test)]
mod test {
    use super::*;
    use diesel::connection::SimpleConnection;

    #[test]
    fn migrations_apply_once_on_temp_file() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        let path = temp.path().to_string_lossy().to_string();

        assert_eq!(run_sqlite(&path).expect("migration run"), 1);
        assert_eq!(run_sqlite(&path).expect("second run"), 0);

        let mut conn = connect_sqlite(&path).unwrap();
        conn.batch_execute("INSERT INTO rooms (number, kind) VALUES ('101', 'ward')")
            .unwrap();
    }
}
