// src/export/logic.rs

use crate::db::pool::DbPool;
use crate::db::queries::load_snapshot;
use crate::errors::{AppError, AppResult};
use crate::export::ExportFormat;
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::export::model::{detail_rows, summary_rows};
use crate::export::xlsx::export_xlsx;
use crate::models::month::MonthLabel;
use crate::ui::messages::warning;
use std::path::Path;

pub struct ExportLogic;

impl ExportLogic {
    /// Export a saved month of `org` to `file`.
    pub fn export(
        pool: &mut DbPool,
        org: &str,
        month: &MonthLabel,
        format: ExportFormat,
        file: &str,
        force: bool,
    ) -> AppResult<()> {
        let path = Path::new(file);

        if !path.is_absolute() {
            return Err(AppError::Export(format!(
                "Output file path must be absolute: {file}"
            )));
        }

        ensure_writable(path, force)?;

        let report = load_snapshot(&pool.conn, org, month)?;
        if report.results.is_empty() {
            warning(format!("No scholars stored for {month}."));
        }

        let summary = summary_rows(&report);
        match format {
            ExportFormat::Csv => export_csv(&summary, path)?,
            ExportFormat::Json => export_json(&summary, path)?,
            ExportFormat::Xlsx => export_xlsx(&summary, &detail_rows(&report), path)?,
        }

        crate::db::log::ttlog(
            &pool.conn,
            "export",
            &format!("{org}/{}", month.key()),
            &format!("Exported {} as {} to {}", month, format.as_str(), path.display()),
        )?;
        Ok(())
    }
}
