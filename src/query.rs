// 🔍 Query Runner - execute a read statement and print what came back
//
// Statements are fixed strings built by the caller. No validation or
// parameter binding happens here.

use anyhow::{Context, Result};
use rusqlite::types::Value;
use rusqlite::Connection;

/// Captured result set
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOutput {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl QueryOutput {
    /// First cell of the first row, if any
    pub fn scalar(&self) -> Option<&Value> {
        self.rows.first().and_then(|row| row.first())
    }

    /// Plain-text table: header, then one line per row, columns right-aligned
    pub fn render(&self) -> String {
        let cells: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.iter().map(display_value).collect())
            .collect();

        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.chars().count()).collect();
        for row in &cells {
            for (i, cell) in row.iter().enumerate() {
                if let Some(w) = widths.get_mut(i) {
                    *w = (*w).max(cell.chars().count());
                }
            }
        }
        let index_width = self.rows.len().saturating_sub(1).to_string().len();

        let mut out = String::new();
        out.push_str(&" ".repeat(index_width));
        for (column, width) in self.columns.iter().zip(&widths) {
            out.push_str(&format!("  {:>width$}", column, width = width));
        }
        for (index, row) in cells.iter().enumerate() {
            out.push('\n');
            out.push_str(&format!("{:<width$}", index, width = index_width));
            for (cell, width) in row.iter().zip(&widths) {
                out.push_str(&format!("  {:>width$}", cell, width = width));
            }
        }

        out
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Real(r) => r.to_string(),
        Value::Text(s) => s.clone(),
        Value::Blob(b) => format!("<{} bytes>", b.len()),
    }
}

/// Execute `sql` and collect every row.
pub fn execute_query(conn: &Connection, sql: &str) -> Result<QueryOutput> {
    let mut stmt = conn
        .prepare(sql)
        .with_context(|| format!("Failed to prepare query: {}", sql))?;

    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    let width = columns.len();

    let rows = stmt
        .query_map([], |row| {
            (0..width)
                .map(|i| row.get::<_, Value>(i))
                .collect::<rusqlite::Result<Vec<_>>>()
        })?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| format!("Failed to run query: {}", sql))?;

    Ok(QueryOutput { columns, rows })
}

/// Execute `sql` and report it on stdout.
pub fn run_query(conn: &Connection, sql: &str) -> Result<QueryOutput> {
    println!("Query: {}", sql);
    let output = execute_query(conn, sql)?;
    println!("{}\n", output.render());
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE banks (Name TEXT, MC_GBP_Billion REAL);
             INSERT INTO banks VALUES ('JPMorgan Chase', 346.34);
             INSERT INTO banks VALUES ('Bank of America', 185.22);
             INSERT INTO banks VALUES ('Unknown', NULL);",
        )
        .unwrap();
        conn
    }

    #[test]
    fn test_count_query() {
        let conn = seeded();

        let output = execute_query(&conn, "SELECT COUNT(*) FROM banks").unwrap();

        assert_eq!(output.columns, vec!["COUNT(*)"]);
        assert_eq!(output.scalar(), Some(&Value::Integer(3)));
    }

    #[test]
    fn test_select_collects_columns_and_rows() {
        let conn = seeded();

        let output = run_query(&conn, "SELECT * FROM banks").unwrap();

        assert_eq!(output.columns, vec!["Name", "MC_GBP_Billion"]);
        assert_eq!(output.rows.len(), 3);
        assert_eq!(output.rows[0][0], Value::Text("JPMorgan Chase".to_string()));
        assert_eq!(output.rows[2][1], Value::Null);
    }

    #[test]
    fn test_average_ignores_nulls() {
        let conn = seeded();

        let output = execute_query(&conn, "SELECT AVG(MC_GBP_Billion) FROM banks").unwrap();

        match output.scalar() {
            Some(Value::Real(avg)) => assert!((avg - 265.78).abs() < 1e-9),
            other => panic!("unexpected average: {:?}", other),
        }
    }

    #[test]
    fn test_render_lists_header_and_rows() {
        let conn = seeded();

        let rendered = execute_query(&conn, "SELECT Name FROM banks LIMIT 2")
            .unwrap()
            .render();
        let lines: Vec<_> = rendered.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].trim_end().ends_with("Name"));
        assert!(lines[1].starts_with('0'));
        assert!(lines[1].ends_with("JPMorgan Chase"));
        assert!(lines[2].ends_with("Bank of America"));
    }

    #[test]
    fn test_bad_sql_fails() {
        let conn = seeded();
        assert!(execute_query(&conn, "SELECT * FROM missing_table").is_err());
    }
}
