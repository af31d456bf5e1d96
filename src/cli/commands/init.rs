use crate::cli::parser::Cli;
use crate::config::Config;
use crate::config::migrate::run_config_migration;
use crate::db::initialize::init_db;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::warning;

/// Handle the `init` command
///
/// Creates the config directory and file (skipped in test mode), the SQLite
/// database, and applies every pending migration.
pub fn handle(cli: &Cli) -> AppResult<()> {
    let db_path = Config::init_all(cli.db.clone(), cli.test)?;
    let db = db_path.to_string_lossy().to_string();

    println!("⚙️  Initializing kollelpay…");
    if !cli.test {
        println!("📄 Config file : {}", Config::config_file().display());
    }
    println!("🗄️  Database   : {db}");

    let pool = DbPool::new(&db)?;
    init_db(&pool.conn)?;

    if !cli.test {
        run_config_migration(&pool.conn, &Config::config_file())?;
    }

    println!("✅ Database initialized at {db}");

    // The audit log is best effort here.
    if let Err(e) = ttlog(
        &pool.conn,
        "init",
        "database",
        &format!("Database initialized at {db}"),
    ) {
        warning(format!("Failed to write internal log: {e}"));
    }

    println!("🎉 kollelpay initialization completed!");
    Ok(())
}
