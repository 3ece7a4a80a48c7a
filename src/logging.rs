/// Structured logging for the surf forecast service
///
/// Provides context-rich logging with break-name identifiers,
/// timestamps, and severity levels. Supports both console output
/// and file-based logging for unattended runs.

use chrono::Utc;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::str::FromStr;
use std::sync::Mutex;

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level: {:?}", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Source Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Fetch,
    Scrape,
    Search,
    Config,
    System,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Fetch => write!(f, "FETCH"),
            Source::Scrape => write!(f, "SCRAPE"),
            Source::Search => write!(f, "SEARCH"),
            Source::Config => write!(f, "CONFIG"),
            Source::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Failure Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureType {
    /// Expected failure - the break does not exist or was renamed
    Expected,
    /// Unexpected failure - site layout drift, server errors, or network trouble
    Unexpected,
    /// Unknown - cannot determine if this is expected or not
    Unknown,
}

impl fmt::Display for FailureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureType::Expected => write!(f, "EXPECTED"),
            FailureType::Unexpected => write!(f, "UNEXPECTED"),
            FailureType::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// ---------------------------------------------------------------------------
// Logger Configuration
// ---------------------------------------------------------------------------

/// Global logger instance
static LOGGER: Mutex<Option<Logger>> = Mutex::new(None);

pub struct Logger {
    /// Minimum log level to display
    min_level: LogLevel,
    /// Optional file path for logging
    log_file: Option<String>,
    /// Whether to include timestamps in console output
    console_timestamps: bool,
}

impl Logger {
    /// Initialize the global logger
    pub fn init(min_level: LogLevel, log_file: Option<String>, console_timestamps: bool) {
        let logger = Logger {
            min_level,
            log_file,
            console_timestamps,
        };

        if let Ok(mut global) = LOGGER.lock() {
            *global = Some(logger);
        }
    }

    fn format_entry(
        level: LogLevel,
        source: &Source,
        break_name: Option<&str>,
        message: &str,
    ) -> String {
        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
        let break_part = break_name.map(|s| format!(" [{}]", s)).unwrap_or_default();
        format!("{} {} {}{}: {}", timestamp, level, source, break_part, message)
    }

    fn log(&self, level: LogLevel, source: &Source, break_name: Option<&str>, message: &str) {
        if level < self.min_level {
            return;
        }

        let log_entry = Self::format_entry(level, source, break_name, message);
        let break_part = break_name.map(|s| format!(" [{}]", s)).unwrap_or_default();

        // Console output goes to stderr so stdout stays clean for JSON output
        if self.console_timestamps {
            eprintln!("{}", log_entry);
        } else {
            match level {
                LogLevel::Error => eprintln!("   ✗ {}{}: {}", source, break_part, message),
                LogLevel::Warning => eprintln!("   ⚠ {}{}: {}", source, break_part, message),
                LogLevel::Info => eprintln!("   {}", message),
                LogLevel::Debug => eprintln!("   [DEBUG] {}", message),
            }
        }

        if let Some(ref path) = self.log_file {
            if let Err(e) = Self::append_to_file(path, &log_entry) {
                eprintln!("Failed to write to log file {}: {}", path, e);
            }
        }
    }

    fn append_to_file(path: &str, entry: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        writeln!(file, "{}", entry)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

/// Initialize the global logger
pub fn init_logger(min_level: LogLevel, log_file: Option<&str>, console_timestamps: bool) {
    Logger::init(min_level, log_file.map(String::from), console_timestamps);
}

fn log(level: LogLevel, source: Source, break_name: Option<&str>, message: &str) {
    if let Ok(guard) = LOGGER.lock() {
        if let Some(logger) = guard.as_ref() {
            logger.log(level, &source, break_name, message);
        }
    }
}

/// Log a general informational message
pub fn info(source: Source, break_name: Option<&str>, message: &str) {
    log(LogLevel::Info, source, break_name, message);
}

/// Log a warning message
pub fn warn(source: Source, break_name: Option<&str>, message: &str) {
    log(LogLevel::Warning, source, break_name, message);
}

/// Log an error message
pub fn error(source: Source, break_name: Option<&str>, message: &str) {
    log(LogLevel::Error, source, break_name, message);
}

/// Log a debug message
pub fn debug(source: Source, break_name: Option<&str>, message: &str) {
    log(LogLevel::Debug, source, break_name, message);
}

// ---------------------------------------------------------------------------
// Failure Classification Helpers
// ---------------------------------------------------------------------------

/// Classify a fetch failure based on its rendered message
pub fn classify_fetch_failure(error_message: &str) -> FailureType {
    if error_message.contains("break not found") {
        FailureType::Expected
    }
    // Server errors and transport failures point at the site or the network
    else if error_message.contains("HTTP error") || error_message.contains("request failed") {
        FailureType::Unexpected
    }
    // A page that no longer matches the known layout
    else if error_message.contains("could not find") || error_message.contains("Parse error") {
        FailureType::Unexpected
    }
    else {
        FailureType::Unknown
    }
}

/// Log a fetch or scrape failure with automatic classification
pub fn log_fetch_failure(break_name: &str, operation: &str, err: &dyn std::error::Error) {
    let error_msg = err.to_string();
    let failure_type = classify_fetch_failure(&error_msg);

    let message = format!("{} failed [{}]: {}", operation, failure_type, error_msg);

    match failure_type {
        FailureType::Expected => warn(Source::Fetch, Some(break_name), &message),
        FailureType::Unexpected => error(Source::Fetch, Some(break_name), &message),
        FailureType::Unknown => warn(Source::Fetch, Some(break_name), &message),
    }
}

// ---------------------------------------------------------------------------
// Run Summary Logging
// ---------------------------------------------------------------------------

/// Log a summary of a multi-break run
pub fn log_run_summary(source: Source, total: usize, successful: usize, failed: usize) {
    let message = format!(
        "Run complete: {}/{} successful, {} failed",
        successful, total, failed
    );

    if failed == 0 {
        info(source, None, &message);
    } else if successful == 0 {
        error(source, None, &message);
    } else {
        warn(source, None, &message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warning);
        assert!(LogLevel::Warning < LogLevel::Error);
    }

    #[test]
    fn test_log_level_from_str() {
        assert_eq!("debug".parse::<LogLevel>(), Ok(LogLevel::Debug));
        assert_eq!("WARN".parse::<LogLevel>(), Ok(LogLevel::Warning));
        assert_eq!(" error ".parse::<LogLevel>(), Ok(LogLevel::Error));
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_failure_classification() {
        assert_eq!(
            classify_fetch_failure("break not found: Atlantis"),
            FailureType::Expected
        );
        assert_eq!(classify_fetch_failure("HTTP error: 503"), FailureType::Unexpected);
        assert_eq!(
            classify_fetch_failure("could not scrape page: could not find winds row"),
            FailureType::Unexpected
        );
        assert_eq!(classify_fetch_failure("something odd"), FailureType::Unknown);
    }

    #[test]
    fn test_entry_format_includes_break_and_source() {
        let entry = Logger::format_entry(LogLevel::Warning, &Source::Fetch, Some("Cherating"), "slow");
        assert!(entry.ends_with("WARN FETCH [Cherating]: slow"), "got {}", entry);
    }
}
