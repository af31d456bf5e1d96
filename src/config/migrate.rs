//! Config file migrations: backfill keys that older config files lack.

use super::Config;
use crate::db::migrate::{is_applied, mark_applied};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use rusqlite::Connection;
use serde_yaml::Value;
use std::fs;
use std::path::Path;

const VERSION: &str = "20260520_0004_config_backfill_keys";

/// Add every key of the default config that `path` is missing. Existing values are
/// never touched. Returns the names of the keys that were added.
pub fn backfill_missing_keys(path: &Path) -> AppResult<Vec<String>> {
    let content = fs::read_to_string(path)?;
    let mut yaml: Value = serde_yaml::from_str(&content)?;
    let defaults = serde_yaml::to_value(Config::default())?;

    let (Some(map), Some(default_map)) = (yaml.as_mapping_mut(), defaults.as_mapping()) else {
        return Err(AppError::Config(format!(
            "{} is not a YAML mapping",
            path.display()
        )));
    };

    let mut added = Vec::new();
    for (k, v) in default_map {
        if !map.contains_key(k) {
            map.insert(k.clone(), v.clone());
            if let Some(name) = k.as_str() {
                added.push(name.to_string());
            }
        }
    }

    if !added.is_empty() {
        fs::write(path, serde_yaml::to_string(&yaml)?)?;
    }
    Ok(added)
}

/// Run the config backfill once per database, recording it in the `log` table.
pub fn run_config_migration(conn: &Connection, path: &Path) -> AppResult<()> {
    if is_applied(conn, VERSION)? || !path.exists() {
        return Ok(());
    }

    let added = backfill_missing_keys(path)?;
    let message = if added.is_empty() {
        "Config already complete".to_string()
    } else {
        format!("Added config keys: {}", added.join(", "))
    };

    mark_applied(conn, VERSION, &message)?;
    if !added.is_empty() {
        success(format!("Migration applied: {VERSION} → {message}"));
    }
    Ok(())
}
