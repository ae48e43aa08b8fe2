//! Configuration for the catalogue client.
//!
//! Sources, lowest precedence first: built-in defaults, the user config file
//! (`<config dir>/book-catalogue/config.toml`), the file named by
//! `CATALOGUE_CONFIG`, then `CATALOGUE__SECTION__KEY` environment variables.

use config::{Config, Environment, File};
use reqwest::Url;
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{AppError, AppResult};

const DEFAULT_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_BOOKS_PATH: &str = "/books";
const DEFAULT_TIMEOUT_SECS: i64 = 30;
const ENV_PREFIX: &str = "CATALOGUE";
const CONFIG_FILE_ENV: &str = "CATALOGUE_CONFIG";

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub books_path: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SearchConfig {
    /// Defaults to `{base_url}{books_path}/search`
    pub url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    pub api: ApiConfig,
    #[serde(default)]
    pub search: SearchConfig,
    pub http: HttpConfig,
    pub logging: LoggingConfig,
}

/// `<config dir>/book-catalogue/config.toml`, when the platform has a config dir.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("book-catalogue").join("config.toml"))
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> AppResult<Self> {
        let mut files = Vec::new();
        if let Some(path) = user_config_path() {
            files.push((path, false));
        }
        if let Ok(path) = env::var(CONFIG_FILE_ENV) {
            files.push((PathBuf::from(path), true));
        }

        let environment = Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true);

        Self::build(&files, Some(environment))
    }

    /// Defaults overlaid with a single required file. No environment lookup.
    pub fn from_file(path: &Path) -> AppResult<Self> {
        Self::build(&[(path.to_path_buf(), true)], None)
    }

    fn build(files: &[(PathBuf, bool)], environment: Option<Environment>) -> AppResult<Self> {
        let mut builder = Config::builder()
            .set_default("api.base_url", DEFAULT_BASE_URL)?
            .set_default("api.books_path", DEFAULT_BOOKS_PATH)?
            .set_default("http.timeout_secs", DEFAULT_TIMEOUT_SECS)?
            .set_default("logging.level", "info")?;

        for (path, required) in files {
            builder = builder.add_source(File::from(path.as_path()).required(*required));
        }
        if let Some(environment) = environment {
            builder = builder.add_source(environment);
        }

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> AppResult<()> {
        parse_url(&self.books_url())?;
        parse_url(&self.search_url())?;
        if self.http.timeout_secs == 0 {
            return Err(AppError::Other(
                "http.timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Absolute URL of the books collection.
    pub fn books_url(&self) -> String {
        format!(
            "{}/{}",
            self.api.base_url.trim_end_matches('/'),
            self.api.books_path.trim_start_matches('/')
        )
    }

    pub fn search_url(&self) -> String {
        match &self.search.url {
            Some(url) => url.clone(),
            None => format!("{}/search", self.books_url().trim_end_matches('/')),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            books_path: DEFAULT_BOOKS_PATH.to_string(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS as u64,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

pub(crate) fn parse_url(url: &str) -> AppResult<Url> {
    Url::parse(url).map_err(|e| AppError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })
}
