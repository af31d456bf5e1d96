//! `settings` command: import, print and generate an organization's stipend rules.

use crate::config::Config;
use crate::core::recompute::recompute_report;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::{list_snapshots, load_snapshot, require_settings, save_settings, save_snapshot};
use crate::errors::AppResult;
use crate::models::month::MonthLabel;
use crate::settings::Settings;
use crate::settings::template::{DefaultTemplate, settings_from_template};
use crate::ui::messages::{info, success};
use std::path::Path;

pub struct SettingsLogic;

impl SettingsLogic {
    /// Store a JSON/YAML settings file; with `recompute`, every saved month of the
    /// organization is recalculated under the new rules.
    pub fn import(pool: &mut DbPool, cfg: &Config, file: &Path, recompute: bool) -> AppResult<()> {
        let settings = Settings::from_file(file)?;
        save_settings(&pool.conn, &cfg.organization, &settings)?;

        ttlog(
            &pool.conn,
            "settings",
            &cfg.organization,
            &format!(
                "Imported {} ({} sessions, {} general bonuses)",
                file.display(),
                settings.sessions.len(),
                settings.general_bonuses.len()
            ),
        )?;
        success(format!(
            "Settings imported for '{}': {} sessions, base {}",
            cfg.organization,
            settings.sessions.len(),
            cfg.money(settings.base_stipend)
        ));

        if recompute {
            let n = Self::recompute_all(pool, cfg, &settings)?;
            info(format!("Recomputed {n} saved months."));
        }
        Ok(())
    }

    fn recompute_all(pool: &mut DbPool, cfg: &Config, settings: &Settings) -> AppResult<usize> {
        let saved = list_snapshots(&pool.conn, &cfg.organization)?;
        let mut count = 0;

        for snapshot in saved {
            let month: MonthLabel = snapshot.month.parse()?;
            let mut report = load_snapshot(&pool.conn, &cfg.organization, &month)?;
            recompute_report(&mut report, settings);
            save_snapshot(&pool.conn, &cfg.organization, &report, true)?;
            ttlog(
                &pool.conn,
                "settings",
                &format!("{}/{}", cfg.organization, month.key()),
                &format!("Recomputed {month}: total {:.2}", report.total_payout()),
            )?;
            count += 1;
        }
        Ok(count)
    }

    pub fn print(pool: &mut DbPool, cfg: &Config) -> AppResult<()> {
        let settings = require_settings(&pool.conn, &cfg.organization)?;
        println!("{}", serde_json::to_string_pretty(&settings)?);
        Ok(())
    }

    /// Print a validated starting point; redirect it to a file and `--import` it.
    pub fn template(prompt: Option<&str>) -> AppResult<()> {
        let settings = settings_from_template(&DefaultTemplate, prompt.unwrap_or_default())?;
        println!("{}", serde_json::to_string_pretty(&settings)?);
        Ok(())
    }
}
