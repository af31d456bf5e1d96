use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::utils::colors::{RESET, color_for_operation};
use unicode_width::UnicodeWidthStr;

const OP_WIDTH_MAX: usize = 40;

struct Entry {
    id: i64,
    date: String,
    operation: String,
    target: String,
    message: String,
}

impl Entry {
    fn label(&self) -> String {
        if self.target.is_empty() {
            self.operation.clone()
        } else {
            format!("{} ({})", self.operation, self.target)
        }
    }
}

/// Cut to `max` display columns, marking the cut with `...`.
fn truncate(s: &str, max: usize) -> String {
    if UnicodeWidthStr::width(s) <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for c in s.chars() {
        if UnicodeWidthStr::width(out.as_str()) + 3 >= max {
            break;
        }
        out.push(c);
    }
    out.push_str("...");
    out
}

pub struct LogLogic;

impl LogLogic {
    pub fn print_log(pool: &mut DbPool) -> AppResult<()> {
        let mut stmt = pool.conn.prepare_cached(
            "SELECT id, date, operation, target, message FROM log ORDER BY id ASC",
        )?;

        let entries = stmt
            .query_map([], |row| {
                let raw_date: String = row.get(1)?;
                let date = chrono::DateTime::parse_from_rfc3339(&raw_date)
                    .map(|dt| dt.format("%F %T").to_string())
                    .unwrap_or(raw_date);
                Ok(Entry {
                    id: row.get(0)?,
                    date,
                    operation: row.get(2)?,
                    target: row.get(3)?,
                    message: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        if entries.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        let id_w = entries.iter().map(|e| e.id.to_string().len()).max().unwrap_or(1);
        let op_w = entries
            .iter()
            .map(|e| UnicodeWidthStr::width(e.label().as_str()))
            .max()
            .unwrap_or(10)
            .min(OP_WIDTH_MAX);

        println!("📜 Internal log:\n");

        for e in &entries {
            let label = truncate(&e.label(), OP_WIDTH_MAX);
            let padding = " ".repeat(op_w.saturating_sub(UnicodeWidthStr::width(label.as_str())));

            // Only the operation word is colored.
            let colored = match label.split_once(' ') {
                Some((op, rest)) => format!("{}{op}{RESET} {rest}", color_for_operation(&e.operation)),
                None => format!("{}{label}{RESET}", color_for_operation(&e.operation)),
            };

            println!(
                "{:>id_w$}: {} | {}{} => {}",
                e.id,
                e.date,
                colored,
                padding,
                e.message,
                id_w = id_w
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_labels_are_cut() {
        let long = "process (a-very-long-organization-name/2024-03)";
        let cut = truncate(long, 20);
        assert!(cut.ends_with("..."));
        assert!(UnicodeWidthStr::width(cut.as_str()) <= 20);
        assert_eq!(truncate("init", 20), "init");
    }
}
