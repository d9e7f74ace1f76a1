use rusqlite::Connection;

use crate::error::StoreResult;

struct Migration {
    version: &'static str,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: "001",
    name: "initial",
    sql: include_str!("migrations/001_initial.sql"),
}];

pub fn run_migrations(conn: &Connection) -> StoreResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            applied_at TEXT NOT NULL
        )",
    )?;

    let applied = get_applied_migrations(conn)?;

    for migration in MIGRATIONS {
        if !applied.iter().any(|v| v == migration.version) {
            apply_migration(conn, migration)?;
        }
    }

    Ok(())
}

fn get_applied_migrations(conn: &Connection) -> StoreResult<Vec<String>> {
    let mut stmt = conn.prepare("SELECT version FROM schema_migrations ORDER BY version")?;
    let versions = stmt
        .query_map([], |row| row.get(0))?
        .collect::<Result<Vec<String>, _>>()?;
    Ok(versions)
}

fn apply_migration(conn: &Connection, migration: &Migration) -> StoreResult<()> {
    tracing::info!(
        "Applying migration {}: {}",
        migration.version,
        migration.name
    );

    // The schema change and its schema_migrations row commit together.
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(migration.sql).inspect_err(|e| {
        tracing::error!(
            "Failed to apply migration {}: {}: {}",
            migration.version,
            migration.name,
            e
        );
    })?;
    tx.execute(
        "INSERT INTO schema_migrations (version, name, applied_at) VALUES (?, ?, ?)",
        (
            migration.version,
            migration.name,
            chrono::Utc::now().to_rfc3339(),
        ),
    )?;
    tx.commit()?;

    tracing::info!("Migration {} applied successfully", migration.version);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_exists(conn: &Connection, name: &str) -> bool {
        let count: i32 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?",
                [name],
                |row| row.get(0),
            )
            .unwrap();
        count == 1
    }

    #[test]
    fn test_migrations_run_on_fresh_db() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        assert!(table_exists(&conn, "cats"));
        assert!(table_exists(&conn, "logs"));

        let versions = get_applied_migrations(&conn).unwrap();
        assert_eq!(versions, vec!["001"]);
    }

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        let versions = get_applied_migrations(&conn).unwrap();
        assert_eq!(versions, vec!["001"]);
    }

    #[test]
    fn test_failed_migration_is_not_recorded() {
        let conn = Connection::open_in_memory().unwrap();
        // A pre-existing cats table makes 001 fail on CREATE TABLE.
        conn.execute_batch("CREATE TABLE cats (id TEXT PRIMARY KEY)")
            .unwrap();

        assert!(run_migrations(&conn).is_err());
        assert!(get_applied_migrations(&conn).unwrap().is_empty());
        assert!(!table_exists(&conn, "logs"));
    }

    #[test]
    fn test_unrecorded_migration_leaves_no_tables_behind() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE schema_migrations (
                version TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                applied_at TEXT NOT NULL
            );
            CREATE TRIGGER reject_record BEFORE INSERT ON schema_migrations
            BEGIN SELECT RAISE(ABORT, 'recording blocked'); END;",
        )
        .unwrap();

        assert!(run_migrations(&conn).is_err());
        assert!(!table_exists(&conn, "cats"));
        assert!(!table_exists(&conn, "logs"));

        // Once recording works again the migration applies cleanly.
        conn.execute_batch("DROP TRIGGER reject_record").unwrap();
        run_migrations(&conn).unwrap();
        assert!(table_exists(&conn, "cats"));
        assert_eq!(get_applied_migrations(&conn).unwrap(), vec!["001"]);
    }
}
