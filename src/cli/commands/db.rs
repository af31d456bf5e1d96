use crate::cli::parser::Commands;
use crate::config::Config;
use crate::config::migrate::run_config_migration;
use crate::db::migrate::run_pending_migrations;
use crate::db::pool::DbPool;
use crate::db::stats;
use crate::errors::AppResult;
use crate::ui::messages::info;
use crate::utils::colors::{CYAN, GREEN, RED, RESET};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Db {
        migrate,
        check,
        vacuum,
        info: show_info,
    } = cmd
    else {
        return Ok(());
    };

    if !(*migrate || *check || *vacuum || *show_info) {
        info("Nothing to do: pass --migrate, --check, --vacuum or --info.");
        return Ok(());
    }

    let mut pool = DbPool::new(&cfg.database)?;

    if *migrate {
        println!("{CYAN}▶ Running migrations…{RESET}");
        run_pending_migrations(&pool.conn)?;
        let config_file = Config::config_file();
        if config_file.exists() {
            run_config_migration(&pool.conn, &config_file)?;
        }
        println!("{GREEN}✔ Migration completed.{RESET}\n");
    }

    if *show_info {
        stats::print_db_info(&mut pool, &cfg.database)?;
    }

    if *check {
        println!("{CYAN}▶ Running integrity check…{RESET}");

        let integrity: String = pool
            .conn
            .query_row("PRAGMA integrity_check;", [], |row| row.get(0))?;

        if integrity == "ok" {
            println!("{GREEN}✔ Integrity check passed.{RESET}\n");
        } else {
            println!("{RED}✘ Integrity check failed:{RESET} {integrity}\n");
        }
    }

    if *vacuum {
        println!("{CYAN}▶ Running VACUUM…{RESET}");
        pool.conn.execute_batch("VACUUM;")?;
        println!("{GREEN}✔ Vacuum completed.{RESET}\n");
    }

    Ok(())
}
