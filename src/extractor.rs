// 🌐 Extractor - fetch the ranking page and pull (name, market cap) rows
//
// Page acquisition sits behind PageSource so the parser never knows whether
// the HTML came over the network or from a saved copy.

use crate::error::ConfigError;
use crate::records::{BankRecord, ResultTable};
use anyhow::{anyhow, Context, Result};
use scraper::{ElementRef, Html, Selector};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Rows kept after parsing unless configured otherwise
pub const DEFAULT_ROW_LIMIT: usize = 10;

// ============================================================================
// PAGE SOURCES
// ============================================================================

/// Anything that can hand back the HTML of the ranking page
pub trait PageSource {
    fn fetch(&self) -> Result<String>;

    /// Where the page comes from (for logs)
    fn describe(&self) -> String;
}

/// Blocking HTTP GET against a fixed URL
pub struct HttpPageSource {
    client: reqwest::blocking::Client,
    url: String,
}

impl HttpPageSource {
    /// `timeout` of None waits indefinitely
    pub fn new(url: impl Into<String>, timeout: Option<Duration>, user_agent: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(HttpPageSource {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl PageSource for HttpPageSource {
    fn fetch(&self) -> Result<String> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .with_context(|| format!("Failed to fetch {}", self.url))?
            .error_for_status()
            .with_context(|| format!("Bad HTTP status from {}", self.url))?;

        response
            .text()
            .with_context(|| format!("Failed to read response body from {}", self.url))
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Saved HTML document on disk
pub struct FilePageSource {
    path: PathBuf,
}

impl FilePageSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        FilePageSource {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl PageSource for FilePageSource {
    fn fetch(&self) -> Result<String> {
        fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read page file: {:?}", self.path))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

// ============================================================================
// EXTRACTION
// ============================================================================

/// Fetch the page from `source` and parse at most `limit` records out of it.
pub fn extract(source: &dyn PageSource, table_attribs: &[String], limit: usize) -> Result<ResultTable> {
    debug!(source = %source.describe(), "fetching page");
    let html = source.fetch()?;
    parse_table(&html, table_attribs, limit)
}

/// Fetch `url` with default client settings and keep the top 10 rows.
pub fn extract_from_url(url: &str, table_attribs: &[String]) -> Result<ResultTable> {
    let source = HttpPageSource::new(url, None, crate::config::DEFAULT_USER_AGENT)?;
    extract(&source, table_attribs, DEFAULT_ROW_LIMIT)
}

/// Parse the first table body of `html`.
///
/// Rows containing any `th` cell are headers. Data rows need at least three
/// `td` cells: the name is the last link text of the second cell, the
/// capital is the third cell with `,` removed. Rows that fail either check
/// are counted in `skipped` and dropped. Truncation to `limit` happens after
/// all rows are read.
pub fn parse_table(html: &str, table_attribs: &[String], limit: usize) -> Result<ResultTable> {
    let [name_column, capital_column] = table_attribs else {
        return Err(ConfigError::FieldNames(table_attribs.len()).into());
    };
    let mut table = ResultTable::new(name_column.as_str(), capital_column.as_str());

    let document = Html::parse_document(html);
    let tbody = selector("tbody")?;
    let tr = selector("tr")?;
    let th = selector("th")?;
    let td = selector("td")?;
    let anchor = selector("a")?;

    let Some(body) = document.select(&tbody).next() else {
        debug!("page has no table body");
        return Ok(table);
    };

    for row in body.select(&tr) {
        let cells: Vec<ElementRef> = row.select(&td).collect();

        // Any header cell marks the whole row as a header
        if row.select(&th).next().is_some() {
            continue;
        }
        if cells.len() <= 2 {
            continue;
        }

        let name = cells[1]
            .select(&anchor)
            .last()
            .map(cell_text)
            .unwrap_or_default();
        let capital = cell_text(cells[2]).replace(',', "");

        match parse_capital(&name, &capital) {
            Some(record) => table.records.push(record),
            None => table.skipped += 1,
        }
    }

    table.records.truncate(limit);
    Ok(table)
}

fn parse_capital(name: &str, capital: &str) -> Option<BankRecord> {
    if name.is_empty() || capital.is_empty() {
        return None;
    }
    let value = capital.parse::<f64>().ok()?;
    Some(BankRecord::new(name, value))
}

/// Text of every descendant, each piece trimmed, concatenated
fn cell_text(element: ElementRef) -> String {
    element.text().map(str::trim).collect()
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("Invalid CSS selector {:?}: {:?}", css, e))
}
