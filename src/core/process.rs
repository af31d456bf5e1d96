//! Workbook → monthly report: parse, calculate every scholar, sort by name.

use crate::config::Config;
use crate::core::calculator::calculate;
use crate::core::report::print_report;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::{require_settings, save_snapshot};
use crate::errors::AppResult;
use crate::models::attendance::ParsedWorkbook;
use crate::models::result::{MonthlyReport, StipendResult};
use crate::parser;
use crate::settings::Settings;
use crate::ui::messages::{info, success};
use std::cmp::Ordering;
use std::fs;
use std::path::Path;

/// How scholar names are ordered in a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameOrder {
    /// Case-folded, Hebrew final letters and vowel points ignored.
    #[default]
    Locale,
    /// Plain code point order.
    Codepoint,
}

/// Collation key for [`NameOrder::Locale`].
fn collation_key(name: &str) -> String {
    name.trim()
        .chars()
        .filter(|c| !('\u{0591}'..='\u{05C7}').contains(c) || *c == '\u{05BE}')
        .map(|c| match c {
            'ך' => 'כ',
            'ם' => 'מ',
            'ן' => 'נ',
            'ף' => 'פ',
            'ץ' => 'צ',
            other => other,
        })
        .flat_map(char::to_lowercase)
        .collect()
}

pub fn compare_names(a: &str, b: &str, order: NameOrder) -> Ordering {
    match order {
        NameOrder::Locale => collation_key(a)
            .cmp(&collation_key(b))
            .then_with(|| a.cmp(b)),
        NameOrder::Codepoint => a.cmp(b),
    }
}

pub fn sort_results(results: &mut [StipendResult], order: NameOrder) {
    results.sort_by(|a, b| compare_names(&a.name, &b.name, order));
}

/// Calculate every extracted scholar and assemble the month.
pub fn build_report(parsed: ParsedWorkbook, settings: &Settings) -> MonthlyReport {
    build_report_with(parsed, settings, NameOrder::Locale)
}

pub fn build_report_with(parsed: ParsedWorkbook, settings: &Settings, order: NameOrder) -> MonthlyReport {
    let mut results: Vec<StipendResult> = parsed
        .scholars
        .iter()
        .map(|s| calculate(s, settings, parsed.active_days.as_ref(), &parsed.month))
        .collect();
    sort_results(&mut results, order);

    MonthlyReport {
        month: parsed.month,
        layout: parsed.layout,
        active_days: parsed.active_days,
        results,
        warnings: parsed.warnings,
    }
}

/// The whole pipeline on an in-memory workbook.
pub fn process_workbook(
    bytes: &[u8],
    filename: Option<&str>,
    settings: &Settings,
    order: NameOrder,
) -> AppResult<MonthlyReport> {
    let parsed = parser::parse_workbook(bytes, filename, settings)?;
    let report = build_report_with(parsed, settings, order);
    tracing::info!(
        month = %report.month,
        scholars = report.results.len(),
        total = report.total_payout(),
        "processed workbook"
    );
    Ok(report)
}

pub struct ProcessLogic;

impl ProcessLogic {
    /// `process <WORKBOOK>`: calculate with the organization's stored settings,
    /// print the month and optionally persist it.
    pub fn process(
        pool: &mut DbPool,
        cfg: &Config,
        workbook: &Path,
        save: bool,
        force: bool,
        details: bool,
    ) -> AppResult<MonthlyReport> {
        let settings = require_settings(&pool.conn, &cfg.organization)?;

        info(format!("Reading {}", workbook.display()));
        let bytes = fs::read(workbook)?;
        let filename = workbook.file_name().and_then(|n| n.to_str());

        let report = process_workbook(&bytes, filename, &settings, cfg.name_order())?;
        print_report(&report, cfg, details);

        if save {
            save_snapshot(&pool.conn, &cfg.organization, &report, force)?;
            ttlog(
                &pool.conn,
                "process",
                &format!("{}/{}", cfg.organization, report.month.key()),
                &format!(
                    "Saved {} scholars from {} (total {:.2})",
                    report.results.len(),
                    filename.unwrap_or("workbook"),
                    report.total_payout()
                ),
            )?;
            success(format!("Saved {} for '{}'.", report.month, cfg.organization));
        } else {
            info("Not saved (use --save to store this month).");
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn final_letters_and_case_do_not_change_order() {
        assert_eq!(compare_names("אברהם", "אברהמי", NameOrder::Locale), Ordering::Less);
        assert_eq!(compare_names("cohen", "Davidi", NameOrder::Locale), Ordering::Less);
        assert_eq!(compare_names("cohen", "Davidi", NameOrder::Codepoint), Ordering::Greater);
    }

    #[test]
    fn vowel_points_are_ignored() {
        assert_eq!(collation_key("מֹשֶׁה"), "משה");
    }
}
