use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::export::ExportLogic;
use crate::models::month::MonthLabel;
use crate::utils::path::resolve;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        month,
        format,
        file,
        force,
    } = cmd
    {
        let month: MonthLabel = month.parse()?;
        let path = resolve(file);
        let mut pool = DbPool::open_migrated(&cfg.database)?;
        ExportLogic::export(
            &mut pool,
            &cfg.organization,
            &month,
            *format,
            &path.to_string_lossy(),
            *force,
        )?;
    }
    Ok(())
}
