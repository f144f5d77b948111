// 🚚 Pipeline - Extract → Transform → Load → Query, one linear pass
//
// No retries, no rollback. A milestone is logged after each stage; the
// database connection lives for the write plus the three reads, and is
// released by Drop on any early return.

use crate::config::EtlConfig;
use crate::extractor::{extract, PageSource};
use crate::loader::{load_to_csv, load_to_db, quote_ident};
use crate::progress::{Milestone, MilestoneLog};
use crate::query::{run_query, QueryOutput};
use crate::records::EnrichedTable;
use crate::transformer::transform;
use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::{info, warn};

/// What a successful run did
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub extracted: usize,
    pub skipped: usize,
    pub loaded: usize,
    pub queries: Vec<QueryOutput>,
}

/// The three read queries every run finishes with
pub fn fixed_queries(table: &EnrichedTable, table_name: &str) -> Vec<String> {
    let ident = quote_ident(table_name);
    let mut queries = vec![format!("SELECT * FROM {}", ident)];

    if let Some(first) = table.currencies.first() {
        queries.push(format!(
            "SELECT AVG({}) FROM {}",
            quote_ident(&EnrichedTable::currency_column(first)),
            ident
        ));
    }

    queries.push(format!(
        "SELECT {} FROM {} LIMIT 5",
        quote_ident(&table.name_column),
        ident
    ));
    queries
}

/// Run against the page source the config describes
pub fn run(config: &EtlConfig) -> Result<RunSummary> {
    let source = config.page_source()?;
    run_with_source(config, source.as_ref())
}

pub fn run_with_source(config: &EtlConfig, source: &dyn PageSource) -> Result<RunSummary> {
    config.validate()?;
    let log = MilestoneLog::new(&config.log_file);
    log.record(Milestone::Preliminaries)?;

    // 1. Extract
    let table = extract(source, &config.table_attribs, config.row_limit)?;
    info!(rows = table.len(), source = %source.describe(), "extraction complete");
    if table.skipped > 0 {
        warn!(skipped = table.skipped, "rows dropped during extraction");
    }
    log.record(Milestone::Extracted)?;

    // 2. Transform
    let enriched = transform(&table, &config.exchange_rate_csv, &config.currencies)?;
    info!(currencies = ?enriched.currencies, "transformation complete");
    log.record(Milestone::Transformed)?;

    // 3. Load
    load_to_csv(&enriched, &config.output_csv)?;
    info!(path = ?config.output_csv, "csv saved");
    log.record(Milestone::SavedCsv)?;

    let conn = Connection::open(&config.db_path)
        .with_context(|| format!("Failed to open database: {:?}", config.db_path))?;
    log.record(Milestone::DbConnected)?;

    let loaded = load_to_db(&enriched, &conn, &config.table_name)?;
    info!(rows = loaded, table = %config.table_name, "database table loaded");
    log.record(Milestone::LoadedDb)?;

    // 4. Query
    let queries = fixed_queries(&enriched, &config.table_name)
        .iter()
        .map(|sql| run_query(&conn, sql))
        .collect::<Result<Vec<_>>>()?;
    log.record(Milestone::Complete)?;

    conn.close()
        .map_err(|(_, e)| e)
        .context("Failed to close database connection")?;
    log.record(Milestone::ConnectionClosed)?;

    Ok(RunSummary {
        extracted: table.len(),
        skipped: table.skipped,
        loaded,
        queries,
    })
}
