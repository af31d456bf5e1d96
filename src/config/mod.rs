use crate::core::process::NameOrder;
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub mod migrate;

const APP_DIR: &str = "kollelpay";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    /// Organization used when `--org` is not given.
    #[serde(default = "default_organization")]
    pub organization: String,
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    /// Sort scholar names with the Hebrew-aware collation instead of code points.
    #[serde(default = "default_locale_sort")]
    pub locale_sort: bool,
}

fn default_organization() -> String {
    "default".to_string()
}
fn default_currency_symbol() -> String {
    "₪".to_string()
}
fn default_locale_sort() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: Self::database_file().to_string_lossy().to_string(),
            organization: default_organization(),
            currency_symbol: default_currency_symbol(),
            locale_sort: default_locale_sort(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join(APP_DIR)
        } else {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(format!(".{APP_DIR}"))
        }
    }

    pub fn config_file() -> PathBuf {
        Self::config_dir().join(format!("{APP_DIR}.conf"))
    }

    pub fn database_file() -> PathBuf {
        Self::config_dir().join(format!("{APP_DIR}.sqlite"))
    }

    /// Load the configuration file, or defaults when there is none.
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Create the config directory, the config file (unless `is_test`) and an
    /// empty database file. Returns the database path.
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> AppResult<PathBuf> {
        let dir = Self::config_dir();

        let db_path = match custom_db {
            Some(name) => {
                let p = Path::new(&name);
                if p.is_absolute() { p.to_path_buf() } else { dir.join(p) }
            }
            None => Self::database_file(),
        };

        if !is_test {
            fs::create_dir_all(&dir)?;
            let config = Config {
                database: db_path.to_string_lossy().to_string(),
                ..Self::default()
            };
            fs::write(Self::config_file(), serde_yaml::to_string(&config)?)?;
        }

        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        if !db_path.exists() {
            fs::File::create(&db_path)?;
        }

        Ok(db_path)
    }

    pub fn name_order(&self) -> NameOrder {
        if self.locale_sort {
            NameOrder::Locale
        } else {
            NameOrder::Codepoint
        }
    }

    pub fn money(&self, amount: f64) -> String {
        format!("{}{:.2}", self.currency_symbol, amount)
    }
}
