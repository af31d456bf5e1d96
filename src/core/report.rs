//! Terminal rendering of a month and the saved-months commands (`months`, `show`,
//! `delete`).

use crate::config::Config;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::{delete_snapshot, list_snapshots, load_snapshot};
use crate::errors::{AppError, AppResult};
use crate::export::detail_rows;
use crate::models::month::MonthLabel;
use crate::models::result::{MonthlyReport, StipendResult};
use crate::ui::messages::{header, info, success, warning};
use crate::utils::colors::{BOLD, GREY, RESET, color_for_amount};
use crate::utils::table::{Align, Table};
use crate::utils::time::format_hours;

fn summary_table(report: &MonthlyReport, cfg: &Config) -> Table {
    let mut table = Table::new(&[
        ("Scholar", Align::Left),
        ("Days", Align::Right),
        ("Hours", Align::Right),
        ("Required", Align::Right),
        ("Attend.", Align::Right),
        ("Deduction", Align::Right),
        ("Bonus", Align::Right),
        ("Stipend", Align::Right),
    ]);

    for r in &report.results {
        table.add_row(vec![
            r.name.clone(),
            r.working_days.to_string(),
            format_hours(r.total_hours),
            format_hours(r.required_hours),
            format!("{:.1}%", r.attendance_percent),
            cfg.money(r.total_deduction),
            cfg.money(r.total_bonus),
            cfg.money(r.stipend),
        ]);
    }
    table
}

/// One line per scholar plus the month's total.
pub fn print_summary(report: &MonthlyReport, cfg: &Config) {
    header(format!("Stipends for {}", report.month));
    print!("{}", summary_table(report, cfg).render());

    let total = report.total_payout();
    println!(
        "\n{BOLD}Total payout:{RESET} {}{}{RESET}  ({} scholars)",
        color_for_amount(total),
        cfg.money(total),
        report.results.len()
    );

    for w in &report.warnings {
        warning(w);
    }
}

/// Deduction and bonus lines, then the day-by-day attendance of one scholar.
pub fn print_scholar(result: &StipendResult, daily: &[crate::export::DetailRow], cfg: &Config) {
    header(&result.name);
    println!(
        "Base {}  −  deductions {}  +  bonuses {}  =  {BOLD}{}{RESET}",
        cfg.money(result.base_stipend_used),
        cfg.money(result.total_deduction),
        cfg.money(result.total_bonus),
        cfg.money(result.stipend)
    );
    if result.approved_absence_hours > 0.0 || result.approved_lateness_count > 0 {
        println!(
            "{GREY}Approved: {} absence hours, {} late arrivals{RESET}",
            format_hours(result.approved_absence_hours),
            result.approved_lateness_count
        );
    }

    if !result.deductions.is_empty() {
        let mut t = Table::new(&[
            ("Session", Align::Left),
            ("Required", Align::Right),
            ("Credited", Align::Right),
            ("Deficit", Align::Right),
            ("Attend.", Align::Right),
            ("Rate", Align::Right),
            ("Amount", Align::Right),
        ]);
        for d in &result.deductions {
            t.add_row(vec![
                d.session_name.clone(),
                format_hours(d.required_hours),
                format_hours(d.credited_hours),
                format_hours(d.deficit_hours),
                format!("{:.1}%", d.attendance_percent),
                cfg.money(d.rate),
                cfg.money(d.amount),
            ]);
        }
        println!();
        print!("{}", t.render());
    }

    if !result.bonuses.is_empty() {
        let mut t = Table::new(&[
            ("Bonus", Align::Left),
            ("Count", Align::Right),
            ("Amount", Align::Right),
            ("", Align::Left),
        ]);
        for b in &result.bonuses {
            t.add_row(vec![
                b.name.clone(),
                format!("{}", b.count),
                cfg.money(b.amount),
                if b.cancelled { "cancelled".into() } else { String::new() },
            ]);
        }
        println!();
        print!("{}", t.render());
    }

    let mut t = Table::new(&[
        ("Date", Align::Left),
        ("Hours", Align::Right),
        ("Status", Align::Left),
        ("Punches", Align::Left),
    ]);
    for d in daily.iter().filter(|d| d.scholar == result.name) {
        t.add_row(vec![
            d.date.clone(),
            d.hours.clone(),
            if d.status.is_empty() { "--".into() } else { d.status.clone() },
            d.punches.clone(),
        ]);
    }
    if !t.is_empty() {
        println!();
        print!("{}", t.render());
    }
}

pub fn print_report(report: &MonthlyReport, cfg: &Config, details: bool) {
    print_summary(report, cfg);
    if details {
        let daily = detail_rows(report);
        for r in &report.results {
            print_scholar(r, &daily, cfg);
        }
    }
}

pub struct ReportLogic;

impl ReportLogic {
    pub fn months(pool: &mut DbPool, cfg: &Config) -> AppResult<()> {
        let saved = list_snapshots(&pool.conn, &cfg.organization)?;
        if saved.is_empty() {
            info(format!(
                "No saved months for organization '{}'.",
                cfg.organization
            ));
            return Ok(());
        }

        let mut t = Table::new(&[
            ("Month", Align::Left),
            ("Scholars", Align::Right),
            ("Total", Align::Right),
            ("Saved at", Align::Left),
        ]);
        for s in saved {
            let saved_at = chrono::DateTime::parse_from_rfc3339(&s.created_at)
                .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or(s.created_at);
            t.add_row(vec![s.month, s.scholars.to_string(), cfg.money(s.total), saved_at]);
        }

        header(format!("Saved months ({})", cfg.organization));
        print!("{}", t.render());
        Ok(())
    }

    pub fn show(pool: &mut DbPool, cfg: &Config, month: &MonthLabel, details: bool) -> AppResult<()> {
        let report = load_snapshot(&pool.conn, &cfg.organization, month)?;
        print_report(&report, cfg, details);
        Ok(())
    }

    pub fn delete(pool: &mut DbPool, cfg: &Config, month: &MonthLabel) -> AppResult<()> {
        if !delete_snapshot(&pool.conn, &cfg.organization, month)? {
            return Err(AppError::NoSnapshot {
                org: cfg.organization.clone(),
                month: month.to_string(),
            });
        }

        ttlog(
            &pool.conn,
            "delete",
            &format!("{}/{}", cfg.organization, month.key()),
            &format!("Deleted saved month {month}"),
        )?;
        success(format!("Deleted saved month {month}."));
        Ok(())
    }
}
