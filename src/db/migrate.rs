//! Versioned schema migrations. Each applied version is recorded in the `log`
//! table as an `operation = 'migration_applied'` row, so the chain can be re-run
//! at every start.

use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, Result};

type Step = fn(&Connection) -> Result<()>;

/// (version, description, step) in application order.
const MIGRATIONS: &[(&str, &str, Step)] = &[
    (
        "20260301_0001_create_settings",
        "Created settings table",
        create_settings_table,
    ),
    (
        "20260301_0002_create_snapshots",
        "Created snapshots table",
        create_snapshots_table,
    ),
    (
        "20260412_0003_snapshot_summary_columns",
        "Added scholars/total summary columns to snapshots",
        add_snapshot_summary_columns,
    ),
];

/// Ensure that the `log` table exists. Everything else depends on it.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )
}

pub fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

pub fn mark_applied(conn: &Connection, version: &str, message: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [version, message],
    )?;
    Ok(())
}

fn create_settings_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            org_id     TEXT PRIMARY KEY,
            payload    TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )
}

fn create_snapshots_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS snapshots (
            org_id      TEXT NOT NULL,
            month_label TEXT NOT NULL,
            payload     TEXT NOT NULL,
            created_at  TEXT NOT NULL,
            PRIMARY KEY (org_id, month_label)
        );
        "#,
    )
}

fn snapshots_has_column(conn: &Connection, name: &str) -> Result<bool> {
    let mut stmt = conn.prepare("PRAGMA table_info('snapshots')")?;
    let cols = stmt.query_map([], |row| row.get::<_, String>(1))?;
    for c in cols {
        if c? == name {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Denormalized counters so `months` can list snapshots without decoding payloads.
fn add_snapshot_summary_columns(conn: &Connection) -> Result<()> {
    if !snapshots_has_column(conn, "scholars")? {
        conn.execute_batch("ALTER TABLE snapshots ADD COLUMN scholars INTEGER NOT NULL DEFAULT 0;")?;
    }
    if !snapshots_has_column(conn, "total")? {
        conn.execute_batch("ALTER TABLE snapshots ADD COLUMN total REAL NOT NULL DEFAULT 0;")?;
    }

    conn.execute_batch(
        r#"
        UPDATE snapshots
           SET scholars = COALESCE(json_array_length(payload, '$.results'), 0),
               total = COALESCE((
                   SELECT SUM(json_extract(value, '$.stipend'))
                     FROM json_each(snapshots.payload, '$.results')
               ), 0);
        "#,
    )
}

/// Run all pending migrations in order, inside one transaction per step.
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    ensure_log_table(conn)?;

    for (version, message, step) in MIGRATIONS {
        if is_applied(conn, version)? {
            continue;
        }

        conn.execute_batch("BEGIN;")?;
        let outcome = step(conn).and_then(|_| mark_applied(conn, version, message));
        match outcome {
            Ok(()) => {
                conn.execute_batch("COMMIT;")?;
                tracing::debug!(version, "migration applied");
                success(format!("Migration applied: {version} → {message}"));
            }
            Err(e) => {
                conn.execute_batch("ROLLBACK;")?;
                return Err(e);
            }
        }
    }

    Ok(())
}

/// Versions not yet applied (used by `db --check`).
pub fn pending_versions(conn: &Connection) -> Result<Vec<&'static str>> {
    ensure_log_table(conn)?;
    let mut out = Vec::new();
    for (version, _, _) in MIGRATIONS {
        if !is_applied(conn, version)? {
            out.push(*version);
        }
    }
    Ok(out)
}
