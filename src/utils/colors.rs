//! ANSI color helpers for terminal output.

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";

pub const GREY: &str = "\x1b[90m";
pub const WHITE: &str = "\x1b[37m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const BLUE: &str = "\x1b[34m";
pub const MAGENTA: &str = "\x1b[35m";
pub const CYAN: &str = "\x1b[36m";
pub const ORANGE: &str = "\x1b[38;5;208m";

/// Color of an operation name in the audit log.
pub fn color_for_operation(op: &str) -> &'static str {
    match op {
        "process" => GREEN,
        "delete" => RED,
        "approve" | "revoke" => YELLOW,
        "settings" => BLUE,
        "export" => CYAN,
        "init" => ORANGE,
        "migration_applied" => MAGENTA,
        _ => WHITE,
    }
}

/// Amounts below zero in red, above zero in green.
pub fn color_for_amount(value: f64) -> &'static str {
    if value > 0.0 {
        GREEN
    } else if value < 0.0 {
        RED
    } else {
        RESET
    }
}
