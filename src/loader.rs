// 💾 Loader - write the enriched table to CSV and SQLite
//
// Both sinks replace whatever was there before. Nothing is merged or
// appended, and there is no schema migration.

use crate::records::EnrichedTable;
use anyhow::{Context, Result};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};
use std::path::Path;
use tracing::debug;

// ============================================================================
// CSV SINK
// ============================================================================

/// Write `table` to `path` with a header row and no index column.
/// Missing values are written as empty fields.
pub fn load_to_csv<P: AsRef<Path>>(table: &EnrichedTable, path: P) -> Result<()> {
    let path = path.as_ref();
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file: {:?}", path))?;

    wtr.write_record(table.columns())
        .context("Failed to write CSV header")?;

    for record in &table.records {
        let mut row = vec![record.name.clone()];
        row.extend(record.numeric_values().map(format_value));
        wtr.write_record(&row)
            .with_context(|| format!("Failed to write CSV row for {}", record.name))?;
    }

    wtr.flush()
        .with_context(|| format!("Failed to flush CSV file: {:?}", path))?;
    debug!(rows = table.len(), path = ?path, "csv written");

    Ok(())
}

// Debug formatting keeps a trailing ".0" on whole numbers
fn format_value(value: Option<f64>) -> String {
    value.map(|v| format!("{:?}", v)).unwrap_or_default()
}

// ============================================================================
// DATABASE SINK
// ============================================================================

/// Quote an SQL identifier (table or column name)
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Replace `table_name` with the contents of `table`.
///
/// Drop, create and inserts run in one SQL transaction. Column types are
/// `TEXT` for the name and `REAL` for every capital column.
pub fn load_to_db(table: &EnrichedTable, conn: &Connection, table_name: &str) -> Result<usize> {
    let columns = table.columns();
    let ident = quote_ident(table_name);

    let column_defs = columns
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let ty = if i == 0 { "TEXT" } else { "REAL" };
            format!("{} {}", quote_ident(c), ty)
        })
        .collect::<Vec<_>>()
        .join(", ");
    let column_list = columns
        .iter()
        .map(|c| quote_ident(c))
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = (1..=columns.len())
        .map(|i| format!("?{}", i))
        .collect::<Vec<_>>()
        .join(", ");

    let tx = conn
        .unchecked_transaction()
        .context("Failed to start database transaction")?;

    tx.execute_batch(&format!(
        "DROP TABLE IF EXISTS {ident};
         CREATE TABLE {ident} ({column_defs});"
    ))
    .with_context(|| format!("Failed to recreate table {}", table_name))?;

    let mut inserted = 0;
    {
        let mut stmt = tx.prepare(&format!(
            "INSERT INTO {ident} ({column_list}) VALUES ({placeholders})"
        ))
        .with_context(|| format!("Failed to prepare insert into {}", table_name))?;

        for record in &table.records {
            let mut values = vec![Value::Text(record.name.clone())];
            values.extend(
                record
                    .numeric_values()
                    .map(|v| v.map(Value::Real).unwrap_or(Value::Null)),
            );

            stmt.execute(params_from_iter(values.iter()))
                .with_context(|| format!("Failed to insert row for {}", record.name))?;
            inserted += 1;
        }
    }

    tx.commit().context("Failed to commit table load")?;
    debug!(rows = inserted, table = table_name, "database table replaced");

    Ok(inserted)
}

/// Row count of a loaded table
pub fn table_row_count(conn: &Connection, table_name: &str) -> Result<i64> {
    let count: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM {}", quote_ident(table_name)),
        [],
        |row| row.get(0),
    )?;

    Ok(count)
}
