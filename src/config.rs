// ⚙️ Configuration - everything the pipeline used to hard-code
//
// Precedence: built-in defaults < JSON config file < CLI flags.
// Missing keys in the JSON file fall back to the defaults.

use crate::error::ConfigError;
use crate::extractor::{FilePageSource, HttpPageSource, PageSource, DEFAULT_ROW_LIMIT};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_URL: &str =
    "https://web.archive.org/web/20230908091635/https://en.wikipedia.org/wiki/List_of_largest_banks";

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 bank-etl/0.1";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EtlConfig {
    pub url: String,

    /// Read the page from this file instead of fetching `url`
    pub page_file: Option<PathBuf>,

    /// Output names for the (bank name, USD capital) columns
    pub table_attribs: Vec<String>,

    pub row_limit: usize,
    pub exchange_rate_csv: PathBuf,
    pub currencies: Vec<String>,
    pub output_csv: PathBuf,
    pub db_path: PathBuf,
    pub table_name: String,
    pub log_file: PathBuf,

    /// None disables the fetch timeout
    pub fetch_timeout_secs: Option<u64>,

    pub user_agent: String,
}

impl Default for EtlConfig {
    fn default() -> Self {
        EtlConfig {
            url: DEFAULT_URL.to_string(),
            page_file: None,
            table_attribs: vec!["Name".to_string(), "MC_USD_Billion".to_string()],
            row_limit: DEFAULT_ROW_LIMIT,
            exchange_rate_csv: PathBuf::from("exchange_rate.csv"),
            currencies: vec!["GBP".to_string(), "EUR".to_string(), "INR".to_string()],
            output_csv: PathBuf::from("Largest_banks_data.csv"),
            db_path: PathBuf::from("Banks.db"),
            table_name: "Largest_banks".to_string(),
            log_file: PathBuf::from("code_log.txt"),
            fetch_timeout_secs: Some(30),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl EtlConfig {
    /// Load from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        let config: EtlConfig =
            serde_json::from_str(&content).context("Failed to parse config JSON")?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.table_attribs.len() != 2 {
            return Err(ConfigError::FieldNames(self.table_attribs.len()));
        }
        if self.row_limit == 0 {
            return Err(ConfigError::ZeroRowLimit);
        }
        if self.currencies.is_empty() {
            return Err(ConfigError::NoCurrencies);
        }
        if self.currencies.iter().any(|c| c.trim().is_empty()) {
            return Err(ConfigError::EmptyCurrency);
        }
        for (i, code) in self.currencies.iter().enumerate() {
            if self.currencies[..i].contains(code) {
                return Err(ConfigError::DuplicateCurrency(code.clone()));
            }
        }
        if self.table_name.trim().is_empty() {
            return Err(ConfigError::EmptyTableName);
        }
        Ok(())
    }

    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch_timeout_secs.map(Duration::from_secs)
    }

    /// Page file if one is configured, otherwise HTTP against `url`
    pub fn page_source(&self) -> Result<Box<dyn PageSource>> {
        match &self.page_file {
            Some(path) => Ok(Box::new(FilePageSource::new(path))),
            None => Ok(Box::new(HttpPageSource::new(
                self.url.as_str(),
                self.fetch_timeout(),
                &self.user_agent,
            )?)),
        }
    }
}
