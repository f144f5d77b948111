use anyhow::Result;
use bank_etl::{extract, run, run_query, EtlConfig, VERSION};
use clap::{Args, Parser, Subcommand};
use rusqlite::Connection;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "bank-etl",
    version,
    about = "Largest banks ETL: scrape market caps, convert currencies, load CSV + SQLite"
)]
struct Cli {
    /// More diagnostics on stderr (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline (default).
    Run(PipelineArgs),

    /// Extract only and print the parsed table. Writes nothing.
    Extract(PipelineArgs),

    /// Run an ad-hoc read query against the database.
    Query {
        /// SQL statement to execute.
        sql: String,

        /// SQLite database file. Defaults to Banks.db.
        #[arg(long)]
        db: Option<PathBuf>,
    },
}

#[derive(Args, Default)]
struct PipelineArgs {
    /// JSON config file; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Page URL to scrape.
    #[arg(long)]
    url: Option<String>,

    /// Read the page from a saved HTML file instead of the network.
    #[arg(long)]
    page_file: Option<PathBuf>,

    /// Exchange-rate CSV (Currency, Rate).
    #[arg(long)]
    rates: Option<PathBuf>,

    /// Target currency; repeat for several (e.g. --currency GBP --currency EUR).
    #[arg(long = "currency")]
    currencies: Vec<String>,

    /// Output CSV path.
    #[arg(long)]
    output_csv: Option<PathBuf>,

    /// SQLite database file.
    #[arg(long)]
    db: Option<PathBuf>,

    /// Database table name.
    #[arg(long)]
    table: Option<String>,

    /// Milestone log file.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Keep at most this many banks.
    #[arg(long)]
    limit: Option<usize>,

    /// Fetch timeout in seconds (0 waits forever).
    #[arg(long)]
    timeout: Option<u64>,
}

impl PipelineArgs {
    fn resolve(self) -> Result<EtlConfig> {
        let mut config = match &self.config {
            Some(path) => EtlConfig::from_file(path)?,
            None => EtlConfig::default(),
        };

        if let Some(url) = self.url {
            config.url = url;
        }
        if let Some(page_file) = self.page_file {
            config.page_file = Some(page_file);
        }
        if let Some(rates) = self.rates {
            config.exchange_rate_csv = rates;
        }
        if !self.currencies.is_empty() {
            config.currencies = self.currencies;
        }
        if let Some(output_csv) = self.output_csv {
            config.output_csv = output_csv;
        }
        if let Some(db) = self.db {
            config.db_path = db;
        }
        if let Some(table) = self.table {
            config.table_name = table;
        }
        if let Some(log_file) = self.log_file {
            config.log_file = log_file;
        }
        if let Some(limit) = self.limit {
            config.row_limit = limit;
        }
        if let Some(timeout) = self.timeout {
            config.fetch_timeout_secs = (timeout > 0).then_some(timeout);
        }

        config.validate()?;
        Ok(config)
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command.unwrap_or(Commands::Run(PipelineArgs::default())) {
        Commands::Run(args) => run_pipeline(args.resolve()?),
        Commands::Extract(args) => run_extract(args.resolve()?),
        Commands::Query { sql, db } => {
            let db = db.unwrap_or_else(|| EtlConfig::default().db_path);
            let conn = Connection::open(&db)?;
            run_query(&conn, &sql)?;
            Ok(())
        }
    }
}

fn run_pipeline(config: EtlConfig) -> Result<()> {
    println!("🏦 Largest Banks ETL v{}", VERSION);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    match &config.page_file {
        Some(path) => println!("📄 Source: {}", path.display()),
        None => println!("🌐 Source: {}", config.url),
    }
    println!();

    let summary = run(&config)?;

    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("✓ Extracted: {} banks", summary.extracted);
    if summary.skipped > 0 {
        println!("⚠️  Skipped rows: {}", summary.skipped);
    }
    println!("✓ CSV: {}", config.output_csv.display());
    println!(
        "✓ Table {} in {}: {} rows",
        config.table_name,
        config.db_path.display(),
        summary.loaded
    );
    println!("✓ Log: {}", config.log_file.display());

    Ok(())
}

fn run_extract(config: EtlConfig) -> Result<()> {
    let source = config.page_source()?;
    let table = extract(source.as_ref(), &config.table_attribs, config.row_limit)?;

    println!("{:>3}  {:<50} {}", "#", table.name_column, table.capital_column);
    for (i, record) in table.records.iter().enumerate() {
        println!("{:>3}  {:<50} {:.2}", i + 1, record.name, record.market_cap_usd);
    }
    println!("\n✓ {} banks, {} rows skipped", table.len(), table.skipped);

    Ok(())
}
