use crate::constants::DEFAULT_LISTING_URL;
use crate::error::{Result, ScraperError};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scrape: ScrapeConfig,
    pub output: OutputConfig,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    pub listing_url: String,
    pub pages_dir: PathBuf,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            listing_url: DEFAULT_LISTING_URL.to_string(),
            pages_dir: PathBuf::from("data/pages"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub csv_path: PathBuf,
    pub json_path: PathBuf,
    pub metrics_path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from("data/business_pages_parsed.csv"),
            json_path: PathBuf::from("data/business_pages_parsed.json"),
            metrics_path: PathBuf::from("data/metrics.prom"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Config {
    /// Load `path` if it exists, otherwise start from defaults, then apply
    /// `DEI_LISTING_URL` / `DEI_PAGES_DIR` from the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH));
        let mut config = if config_path.is_file() {
            let config_content = fs::read_to_string(config_path).map_err(|e| {
                ScraperError::Config(format!(
                    "Failed to read config file '{}': {}",
                    config_path.display(),
                    e
                ))
            })?;
            Self::from_toml(&config_content)?
        } else if path.is_some() {
            return Err(ScraperError::Config(format!(
                "Config file '{}' not found",
                config_path.display()
            )));
        } else {
            debug!("No {} found, using defaults", DEFAULT_CONFIG_PATH);
            Self::default()
        };

        config.apply_env();
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("DEI_LISTING_URL") {
            if !url.trim().is_empty() {
                self.scrape.listing_url = url;
            }
        }
        if let Ok(dir) = std::env::var("DEI_PAGES_DIR") {
            if !dir.trim().is_empty() {
                self.scrape.pages_dir = PathBuf::from(dir);
            }
        }
    }
}
