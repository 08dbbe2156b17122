//! Run-level audit log and diagnostic tracing setup.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use crate::error::{ProwlError, Result};

/// Route `tracing` output to stderr, leaving stdout for JSON.
///
/// `RUST_LOG` wins when set; otherwise `prowl=info`, or `prowl=debug` when verbose.
pub fn init_tracing(verbose: bool) {
    let fallback = if verbose { "prowl=debug" } else { "prowl=info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub keyword: Option<String>,
    pub event: String,
    pub details: Option<String>,
}

impl LogEntry {
    fn line(&self) -> String {
        let glyph = match self.level {
            LogLevel::Info => "🟢",
            LogLevel::Error => "🔴",
        };
        format!(
            "{} {} {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            glyph,
            self.event,
            self.keyword.as_deref().unwrap_or("*"),
            self.details.as_deref().unwrap_or("")
        )
    }
}

/// Appends one line per run-level event to `~/.prowl/activity.log`.
pub struct ActivityLogger {
    log_path: PathBuf,
}

impl ActivityLogger {
    pub fn new() -> Result<Self> {
        let user_dirs = directories::UserDirs::new()
            .ok_or_else(|| ProwlError::Config("could not determine home directory".into()))?;
        let prowl_dir = user_dirs.home_dir().join(".prowl");
        fs::create_dir_all(&prowl_dir)?;
        Ok(Self::with_path(prowl_dir.join("activity.log")))
    }

    /// Log to an explicit file.
    pub fn with_path(log_path: impl Into<PathBuf>) -> Self {
        Self {
            log_path: log_path.into(),
        }
    }

    pub fn log(
        &self,
        level: LogLevel,
        keyword: Option<&str>,
        event: &str,
        details: Option<&str>,
    ) -> Result<()> {
        let entry = LogEntry {
            timestamp: Utc::now(),
            level,
            keyword: keyword.map(|k| k.to_string()),
            event: event.to_string(),
            details: details.map(|d| d.to_string()),
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;
        writeln!(file, "{}", entry.line())?;
        Ok(())
    }

    /// Matching lines, most recent first.
    pub fn read_logs(&self, keyword_filter: Option<&str>, errors_only: bool) -> Result<Vec<String>> {
        if !self.log_path.exists() {
            return Ok(vec![]);
        }

        let reader = BufReader::new(fs::File::open(&self.log_path)?);
        let mut matching_lines = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if errors_only && !line.contains("🔴") {
                continue;
            }
            if let Some(keyword) = keyword_filter {
                if !line.contains(keyword) {
                    continue;
                }
            }
            matching_lines.push(line);
        }

        matching_lines.reverse();
        Ok(matching_lines)
    }

    pub fn info(&self, keyword: Option<&str>, event: &str, details: Option<&str>) -> Result<()> {
        self.log(LogLevel::Info, keyword, event, details)
    }

    pub fn error(&self, keyword: Option<&str>, event: &str, details: Option<&str>) -> Result<()> {
        self.log(LogLevel::Error, keyword, event, details)
    }
}
