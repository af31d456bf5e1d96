use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::report::ReportLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::month::MonthLabel;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Delete { month } = cmd {
        let month: MonthLabel = month.parse()?;
        let mut pool = DbPool::open_migrated(&cfg.database)?;
        ReportLogic::delete(&mut pool, cfg, &month)?;
    }
    Ok(())
}
