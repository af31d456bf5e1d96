use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::process::ProcessLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::utils::path::resolve;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Process {
        workbook,
        save,
        force,
        details,
    } = cmd
    {
        let mut pool = DbPool::open_migrated(&cfg.database)?;
        ProcessLogic::process(&mut pool, cfg, &resolve(workbook), *save, *force, *details)?;
    }
    Ok(())
}
