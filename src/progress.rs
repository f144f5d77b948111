// 📝 Milestone Log - append-only run history
//
// One line per finished stage: `<YYYY-MM-DD-HH:MM:SS> : <message>`.
// Only the success path writes here; a failed run stops at its last milestone.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Milestone {
    Preliminaries,
    Extracted,
    Transformed,
    SavedCsv,
    DbConnected,
    LoadedDb,
    Complete,
    ConnectionClosed,
}

impl Milestone {
    /// Every milestone of a successful run, in order
    pub const ALL: [Milestone; 8] = [
        Milestone::Preliminaries,
        Milestone::Extracted,
        Milestone::Transformed,
        Milestone::SavedCsv,
        Milestone::DbConnected,
        Milestone::LoadedDb,
        Milestone::Complete,
        Milestone::ConnectionClosed,
    ];

    pub fn message(&self) -> &'static str {
        match self {
            Milestone::Preliminaries => "Preliminaries complete. Initiating ETL process",
            Milestone::Extracted => "Data extraction complete. Initiating Transformation process",
            Milestone::Transformed => "Data transformation complete. Initiating Loading process",
            Milestone::SavedCsv => "Data saved to CSV file",
            Milestone::DbConnected => "SQL Connection initiated",
            Milestone::LoadedDb => "Data loaded to Database as a table, Executing queries",
            Milestone::Complete => "Process Complete",
            Milestone::ConnectionClosed => "Server Connection closed",
        }
    }
}

/// Format one log line (without the trailing newline)
pub fn format_line(at: DateTime<Local>, message: &str) -> String {
    format!("{} : {}", at.format(TIMESTAMP_FORMAT), message)
}

pub struct MilestoneLog {
    path: PathBuf,
}

impl MilestoneLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        MilestoneLog {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn record(&self, milestone: Milestone) -> Result<()> {
        self.append(milestone.message())
    }

    /// Append a free-form line, creating the file if needed
    pub fn append(&self, message: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open log file: {:?}", self.path))?;

        writeln!(file, "{}", format_line(Local::now(), message))
            .with_context(|| format!("Failed to write log file: {:?}", self.path))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_line_format() {
        let at = Local.with_ymd_and_hms(2023, 9, 8, 9, 16, 35).unwrap();

        assert_eq!(
            format_line(at, "Process Complete"),
            "2023-09-08-09:16:35 : Process Complete"
        );
    }

    #[test]
    fn test_append_keeps_existing_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("code_log.txt");
        std::fs::write(&path, "earlier run\n").unwrap();

        let log = MilestoneLog::new(&path);
        log.record(Milestone::Preliminaries).unwrap();
        log.record(Milestone::Extracted).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "earlier run");
        assert!(lines[1].ends_with(" : Preliminaries complete. Initiating ETL process"));
        // "YYYY-MM-DD-HH:MM:SS" is 19 characters
        assert_eq!(lines[2].find(" : "), Some(19));
    }

    #[test]
    fn test_eight_distinct_milestones() {
        let mut messages: Vec<_> = Milestone::ALL.iter().map(|m| m.message()).collect();
        messages.sort();
        messages.dedup();

        assert_eq!(messages.len(), 8);
        assert_eq!(Milestone::ALL[7].message(), "Server Connection closed");
    }
}
