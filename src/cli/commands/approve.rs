use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::approve::{Approval, ApproveLogic};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::month::MonthLabel;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Approve {
        month,
        scholar,
        day,
        session,
        kind,
        revoke,
    } = cmd
    {
        let month: MonthLabel = month.parse()?;
        let mut pool = DbPool::open_migrated(&cfg.database)?;
        let req = Approval {
            scholar,
            day: *day,
            session,
            kind: *kind,
            approved: !*revoke,
        };
        ApproveLogic::apply(&mut pool, cfg, &month, &req)?;
    }
    Ok(())
}
