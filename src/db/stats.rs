use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use rusqlite::OptionalExtension;
use std::fs;

fn count(pool: &DbPool, sql: &str) -> AppResult<i64> {
    Ok(pool.conn.query_row(sql, [], |row| row.get(0))?)
}

pub fn print_db_info(pool: &mut DbPool, db_path: &str) -> AppResult<()> {
    println!();

    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    let orgs = count(pool, "SELECT COUNT(*) FROM settings")?;
    let snapshots = count(pool, "SELECT COUNT(*) FROM snapshots")?;
    let log_rows = count(pool, "SELECT COUNT(*) FROM log")?;

    println!("{}• Organizations:{} {}{}{}", CYAN, RESET, GREEN, orgs, RESET);
    println!("{}• Saved months:{} {}{}{}", CYAN, RESET, GREEN, snapshots, RESET);
    println!("{}• Log entries:{} {}", CYAN, RESET, log_rows);

    let range: Option<(String, String)> = pool
        .conn
        .query_row(
            "SELECT MIN(month_label), MAX(month_label) FROM snapshots HAVING COUNT(*) > 0",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;

    let (first, last) = range.unwrap_or_else(|| (format!("{GREY}--{RESET}"), format!("{GREY}--{RESET}")));
    println!("{}• Month range:{}", CYAN, RESET);
    println!("    from: {}", first);
    println!("    to:   {}", last);

    let payout: f64 = pool
        .conn
        .query_row("SELECT COALESCE(SUM(total), 0) FROM snapshots", [], |row| row.get(0))?;
    println!("{}• Total paid out:{} {:.2}", CYAN, RESET, payout);

    println!();
    Ok(())
}
