// Bank ETL - Core Library
// Largest banks by market cap: scrape → convert currencies → CSV + SQLite → report

pub mod config;
pub mod error;
pub mod extractor;
pub mod loader;
pub mod pipeline;
pub mod progress;
pub mod query;
pub mod rates;
pub mod records;
pub mod transformer;

// Re-export commonly used types
pub use config::EtlConfig;
pub use error::{ConfigError, RateError};
pub use extractor::{
    extract, extract_from_url, parse_table,
    FilePageSource, HttpPageSource, PageSource,
};
pub use loader::{load_to_csv, load_to_db, table_row_count};
pub use pipeline::{fixed_queries, run, run_with_source, RunSummary};
pub use progress::{Milestone, MilestoneLog};
pub use query::{execute_query, run_query, QueryOutput};
pub use rates::ExchangeRateTable;
pub use records::{BankRecord, Converted, EnrichedRecord, EnrichedTable, ResultTable};
pub use transformer::{enrich, transform};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
