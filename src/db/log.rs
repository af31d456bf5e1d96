use crate::errors::AppResult;
use chrono::Local;
use rusqlite::{Connection, params};

/// Append one row to the `log` audit table.
///
/// `operation` is a short verb (`process`, `approve`, `settings`, ...), `target`
/// usually the organization/month the operation touched.
pub fn ttlog(conn: &Connection, operation: &str, target: &str, message: &str) -> AppResult<()> {
    let now = Local::now().to_rfc3339();

    conn.prepare_cached(
        "INSERT INTO log (date, operation, target, message)
         VALUES (?1, ?2, ?3, ?4)",
    )?
    .execute(params![now, operation, target, message])?;

    Ok(())
}
