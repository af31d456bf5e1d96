//! Settings and monthly snapshot storage, keyed by organization id.

use crate::errors::{AppError, AppResult};
use crate::models::month::MonthLabel;
use crate::models::result::MonthlyReport;
use crate::settings::{self, Settings};
use chrono::Local;
use rusqlite::{Connection, OptionalExtension, params};

/// One saved month as listed by `months`.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotInfo {
    pub month: String,
    pub scholars: i64,
    pub total: f64,
    pub created_at: String,
}

/// Stored settings of an organization, always passed through the schema upgrade.
pub fn load_settings(conn: &Connection, org: &str) -> AppResult<Option<Settings>> {
    let payload: Option<String> = conn
        .query_row(
            "SELECT payload FROM settings WHERE org_id = ?1",
            [org],
            |row| row.get(0),
        )
        .optional()?;

    match payload {
        Some(p) => Ok(Some(settings::normalize(serde_json::from_str(&p)?)?)),
        None => Ok(None),
    }
}

pub fn require_settings(conn: &Connection, org: &str) -> AppResult<Settings> {
    load_settings(conn, org)?.ok_or_else(|| AppError::NoSettings(org.to_string()))
}

/// Validate and store settings, replacing any previous version.
pub fn save_settings(conn: &Connection, org: &str, s: &Settings) -> AppResult<()> {
    settings::validate::validate(s)?;
    let payload = serde_json::to_string(s)?;

    conn.execute(
        "INSERT INTO settings (org_id, payload, updated_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(org_id) DO UPDATE SET payload = excluded.payload,
                                           updated_at = excluded.updated_at",
        params![org, payload, Local::now().to_rfc3339()],
    )?;
    Ok(())
}

/// Persist a month. An existing snapshot is only replaced when `force` is set.
pub fn save_snapshot(conn: &Connection, org: &str, report: &MonthlyReport, force: bool) -> AppResult<()> {
    let key = report.month.key();

    if !force && snapshot_exists(conn, org, &key)? {
        return Err(AppError::SnapshotExists(report.month.to_string()));
    }

    let payload = serde_json::to_string(report)?;
    conn.execute(
        "INSERT OR REPLACE INTO snapshots (org_id, month_label, payload, created_at, scholars, total)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            org,
            key,
            payload,
            Local::now().to_rfc3339(),
            report.results.len() as i64,
            report.total_payout()
        ],
    )?;
    Ok(())
}

fn snapshot_exists(conn: &Connection, org: &str, key: &str) -> AppResult<bool> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM snapshots WHERE org_id = ?1 AND month_label = ?2",
            [org, key],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

pub fn load_snapshot(conn: &Connection, org: &str, month: &MonthLabel) -> AppResult<MonthlyReport> {
    let payload: Option<String> = conn
        .query_row(
            "SELECT payload FROM snapshots WHERE org_id = ?1 AND month_label = ?2",
            [org, month.key().as_str()],
            |row| row.get(0),
        )
        .optional()?;

    let payload = payload.ok_or_else(|| AppError::NoSnapshot {
        org: org.to_string(),
        month: month.to_string(),
    })?;
    Ok(serde_json::from_str(&payload)?)
}

/// Returns `true` when a snapshot was removed.
pub fn delete_snapshot(conn: &Connection, org: &str, month: &MonthLabel) -> AppResult<bool> {
    let n = conn.execute(
        "DELETE FROM snapshots WHERE org_id = ?1 AND month_label = ?2",
        [org, month.key().as_str()],
    )?;
    Ok(n > 0)
}

/// Saved months of an organization, oldest first.
pub fn list_snapshots(conn: &Connection, org: &str) -> AppResult<Vec<SnapshotInfo>> {
    let mut stmt = conn.prepare(
        "SELECT month_label, scholars, total, created_at
           FROM snapshots
          WHERE org_id = ?1
          ORDER BY month_label ASC",
    )?;

    let rows = stmt.query_map([org], |row| {
        Ok(SnapshotInfo {
            month: row.get(0)?,
            scholars: row.get(1)?,
            total: row.get(2)?,
            created_at: row.get(3)?,
        })
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
