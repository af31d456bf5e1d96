use crate::config::Config;
use crate::core::report::ReportLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;

pub fn handle(cfg: &Config) -> AppResult<()> {
    let mut pool = DbPool::open_migrated(&cfg.database)?;
    ReportLogic::months(&mut pool, cfg)
}
