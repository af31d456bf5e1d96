use crate::core::recompute::ApprovalKind;
use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for kollelpay
#[derive(Parser)]
#[command(
    name = "kollelpay",
    version = env!("CARGO_PKG_VERSION"),
    about = "Kollel stipend calculator: turn monthly attendance workbooks into itemized stipends",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Organization whose settings and months are used (default: from config)
    #[arg(global = true, long = "org")]
    pub org: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(long = "editor", help = "Editor to use with --edit")]
        editor: Option<String>,
    },

    /// Manage the organization's stipend settings
    Settings {
        #[arg(
            long,
            value_name = "FILE",
            conflicts_with_all = ["print", "template"],
            help = "Import settings from a JSON or YAML file"
        )]
        import: Option<String>,

        #[arg(long, requires = "import", help = "Recalculate every saved month with the imported settings")]
        recompute: bool,

        #[arg(long, help = "Print the stored settings as JSON")]
        print: bool,

        #[arg(long, help = "Print a settings template to start from")]
        template: bool,

        #[arg(long, value_name = "TEXT", requires = "template", help = "Describe the kollel to tune the template")]
        prompt: Option<String>,
    },

    /// Calculate stipends from an attendance workbook
    Process {
        /// Workbook file (.xlsx, .xls, .ods)
        workbook: String,

        #[arg(long, help = "Store the month in the database")]
        save: bool,

        #[arg(long, short = 'f', requires = "save", help = "Overwrite an already saved month")]
        force: bool,

        #[arg(long, help = "Print deductions, bonuses and daily attendance per scholar")]
        details: bool,
    },

    /// List saved months
    Months,

    /// Show a saved month
    Show {
        /// Month (YYYY-MM or MM/YYYY)
        month: String,

        #[arg(long, help = "Print deductions, bonuses and daily attendance per scholar")]
        details: bool,
    },

    /// Delete a saved month
    Delete {
        /// Month (YYYY-MM or MM/YYYY)
        month: String,
    },

    /// Approve (or revoke) an absence or lateness in a saved month
    Approve {
        /// Month (YYYY-MM or MM/YYYY)
        month: String,

        #[arg(long)]
        scholar: String,

        #[arg(long, help = "Day of month")]
        day: u32,

        #[arg(long, help = "Session id")]
        session: String,

        #[arg(long, default_value = "absence", help = "absence | lateness")]
        kind: ApprovalKind,

        #[arg(long, help = "Remove the approval instead of granting it")]
        revoke: bool,
    },

    /// Export a saved month
    Export {
        /// Month (YYYY-MM or MM/YYYY)
        month: String,

        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Print or manage the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },
}
