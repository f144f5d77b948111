// tests/pipeline_e2e.rs
use std::fs;
use std::path::{Path, PathBuf};

use bank_etl::{
    execute_query, run_with_source, table_row_count, ConfigError, EtlConfig, FilePageSource,
    Milestone, RateError,
};
use rusqlite::types::Value;
use rusqlite::Connection;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn config_in(dir: &Path) -> EtlConfig {
    let rates = dir.join("exchange_rate.csv");
    fs::write(&rates, "Currency,Rate\nGBP,0.8\nEUR,0.9\nINR,80\n").unwrap();

    EtlConfig {
        page_file: Some(fixture("largest_banks.html")),
        exchange_rate_csv: rates,
        output_csv: dir.join("Largest_banks_data.csv"),
        db_path: dir.join("Banks.db"),
        log_file: dir.join("code_log.txt"),
        ..EtlConfig::default()
    }
}

#[test]
fn full_run_fills_every_sink() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    let source = FilePageSource::new(fixture("largest_banks.html"));

    let summary = run_with_source(&config, &source).unwrap();

    assert_eq!(summary.extracted, 10);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.loaded, 10);
    assert_eq!(summary.queries.len(), 3);

    // CSV: header + 10 rows
    let csv = fs::read_to_string(&config.output_csv).unwrap();
    let lines: Vec<_> = csv.lines().collect();
    assert_eq!(lines.len(), 11);
    assert_eq!(
        lines[0],
        "Name,MC_USD_Billion,MC_GBP_Billion,MC_EUR_Billion,MC_INR_Billion"
    );
    assert_eq!(lines[1], "JPMorgan Chase,432.92,346.34,389.63,34633.6");

    // Database: 10 rows, source order kept
    let conn = Connection::open(&config.db_path).unwrap();
    assert_eq!(table_row_count(&conn, "Largest_banks").unwrap(), 10);
    let count = execute_query(&conn, "SELECT COUNT(*) FROM Largest_banks").unwrap();
    assert_eq!(count.scalar(), Some(&Value::Integer(10)));

    let last: String = conn
        .query_row("SELECT Name FROM Largest_banks WHERE rowid = 10", [], |row| row.get(0))
        .unwrap();
    assert_eq!(last, "Bank of China");

    // Log: exactly the 8 milestones, in order
    let log = fs::read_to_string(&config.log_file).unwrap();
    let log_lines: Vec<_> = log.lines().collect();
    assert_eq!(log_lines.len(), 8);
    for (line, milestone) in log_lines.iter().zip(Milestone::ALL) {
        assert!(line.ends_with(&format!(" : {}", milestone.message())), "{}", line);
    }

    // Fixed queries
    assert_eq!(summary.queries[0].rows.len(), 10);
    assert_eq!(summary.queries[2].rows.len(), 5);
    assert_eq!(
        summary.queries[2].rows[0][0],
        Value::Text("JPMorgan Chase".to_string())
    );
}

#[test]
fn second_run_replaces_outputs_and_appends_log() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    let source = FilePageSource::new(fixture("largest_banks.html"));

    run_with_source(&config, &source).unwrap();
    run_with_source(&config, &source).unwrap();

    let conn = Connection::open(&config.db_path).unwrap();
    assert_eq!(table_row_count(&conn, "Largest_banks").unwrap(), 10);
    assert_eq!(fs::read_to_string(&config.output_csv).unwrap().lines().count(), 11);
    assert_eq!(fs::read_to_string(&config.log_file).unwrap().lines().count(), 16);
}

#[test]
fn missing_currency_stops_after_extraction() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(dir.path());
    fs::write(&config.exchange_rate_csv, "Currency,Rate\nGBP,0.8\nEUR,0.9\n").unwrap();
    config.currencies = vec!["GBP".into(), "EUR".into(), "INR".into()];
    let source = FilePageSource::new(fixture("largest_banks.html"));

    let err = run_with_source(&config, &source).unwrap_err();

    assert_eq!(
        err.downcast_ref::<RateError>(),
        Some(&RateError::MissingCurrency { code: "INR".to_string() })
    );
    assert!(!config.output_csv.exists());
    assert!(!config.db_path.exists());
    assert_eq!(fs::read_to_string(&config.log_file).unwrap().lines().count(), 2);
}

#[test]
fn duplicate_currency_is_rejected_before_any_output() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(dir.path());
    config.currencies = vec!["GBP".into(), "GBP".into()];
    let source = FilePageSource::new(fixture("largest_banks.html"));

    let err = run_with_source(&config, &source).unwrap_err();

    assert_eq!(
        err.downcast_ref::<ConfigError>(),
        Some(&ConfigError::DuplicateCurrency("GBP".to_string()))
    );
    assert!(!config.output_csv.exists());
    assert!(!config.db_path.exists());
}

#[test]
fn configured_limit_and_currencies_shape_output() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(dir.path());
    config.row_limit = 3;
    config.currencies = vec!["EUR".into()];
    config.table_name = "Top_three".into();
    let source = FilePageSource::new(fixture("largest_banks.html"));

    let summary = run_with_source(&config, &source).unwrap();

    assert_eq!(summary.loaded, 3);
    let header = fs::read_to_string(&config.output_csv).unwrap();
    assert_eq!(header.lines().next(), Some("Name,MC_USD_Billion,MC_EUR_Billion"));
    assert_eq!(summary.queries[1].columns, vec!["AVG(\"MC_EUR_Billion\")"]);
}
