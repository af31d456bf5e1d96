use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::settings::SettingsLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::info;
use crate::utils::path::resolve;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Settings {
        import,
        recompute,
        print,
        template,
        prompt,
    } = cmd
    {
        if *template {
            return SettingsLogic::template(prompt.as_deref());
        }

        let mut pool = DbPool::open_migrated(&cfg.database)?;

        if let Some(file) = import {
            SettingsLogic::import(&mut pool, cfg, &resolve(file), *recompute)?;
        } else if *print {
            SettingsLogic::print(&mut pool, cfg)?;
        } else {
            info("Nothing to do: pass --import <FILE>, --print or --template.");
        }
    }
    Ok(())
}
