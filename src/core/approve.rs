use crate::config::Config;
use crate::core::recompute::{ApprovalKind, apply_approval};
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::{load_snapshot, require_settings, save_snapshot};
use crate::errors::AppResult;
use crate::models::month::MonthLabel;
use crate::ui::messages::success;

/// One approval request against a saved month.
pub struct Approval<'a> {
    pub scholar: &'a str,
    pub day: u32,
    pub session: &'a str,
    pub kind: ApprovalKind,
    pub approved: bool,
}

pub struct ApproveLogic;

impl ApproveLogic {
    pub fn apply(pool: &mut DbPool, cfg: &Config, month: &MonthLabel, req: &Approval) -> AppResult<()> {
        let settings = require_settings(&pool.conn, &cfg.organization)?;
        let mut report = load_snapshot(&pool.conn, &cfg.organization, month)?;

        let before = report.scholar(req.scholar).map(|r| r.stipend);

        apply_approval(
            &mut report,
            &settings,
            req.scholar,
            req.day,
            req.session,
            req.kind,
            req.approved,
        )?;
        save_snapshot(&pool.conn, &cfg.organization, &report, true)?;

        let verb = if req.approved { "approve" } else { "revoke" };
        let after = report.scholar(req.scholar).map(|r| r.stipend);

        ttlog(
            &pool.conn,
            verb,
            &format!("{}/{}", cfg.organization, month.key()),
            &format!(
                "{} {} of {} on day {} ({})",
                verb, req.kind, req.scholar, req.day, req.session
            ),
        )?;

        let action = if req.approved { "Approved" } else { "Revoked" };
        match (before, after) {
            (Some(b), Some(a)) => success(format!(
                "{action} {} for {} on {}/{}: stipend {} → {}",
                req.kind,
                req.scholar,
                req.day,
                month,
                cfg.money(b),
                cfg.money(a)
            )),
            _ => success(format!("{action} {} for {}.", req.kind, req.scholar)),
        }
        Ok(())
    }
}
