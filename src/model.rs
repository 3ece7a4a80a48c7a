/// Core data types for the surf forecast service.
///
/// This module defines the shared domain model imported by all other modules:
/// the typed forecast result produced by `scrape`, the break lookup types
/// produced by the HTTP collaborator, and the error enums of both.
/// It contains no I/O.

use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Forecast types
// ---------------------------------------------------------------------------

/// Everything scraped from one forecast page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastReport {
    /// When the site generated the forecast, in the break's local zone.
    pub issued_at: DateTime<Tz>,
    pub daily: Vec<DailyForecast>,
}

/// One calendar day of hourly forecasts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyForecast {
    pub date: NaiveDate,
    /// Local midnight of `date`.
    pub timestamp: DateTime<Tz>,
    pub hourly: Vec<HourlyForecast>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyForecast {
    pub timestamp: DateTime<Tz>,
    /// 24-hour clock, 0–23.
    pub hour: u32,
    /// Site rating, 0–10.
    pub rating: u8,
    pub swells: Vec<Swell>,
    pub wave_energy_kj: f64,
    pub wind: Wind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Swell {
    pub period_seconds: f64,
    pub direction_degrees: f64,
    pub direction_compass: String,
    pub wave_height_m: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Wind {
    pub speed_kmh: f64,
    /// `None` when the page carries no direction arrow for the hour.
    pub direction_degrees: Option<f64>,
    pub direction_compass: String,
    pub state: String,
}

// ---------------------------------------------------------------------------
// Break types
// ---------------------------------------------------------------------------

/// A surf break as named on its own page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Break {
    pub name: String,
    pub country_name: String,
}

/// One entry from the free-text break search endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreakSearchResult {
    pub name: String,
    pub country_name: String,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Broad class of a scrape failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// An expected row, cell, attribute or node is absent.
    NotFound,
    /// A value was found but failed to parse or is outside its domain.
    Malformed,
    /// Parallel row sequences disagree in length.
    Mismatch,
    /// A timezone abbreviation could not be resolved to a usable zone.
    Lookup,
}

/// Errors raised while extracting a forecast from a parsed page.
///
/// Every variant is fatal for the whole extraction. `Context` layers record
/// where the failure happened ("hours row", "cell 4") without losing the
/// underlying cause.
#[derive(Debug, Clone, PartialEq)]
pub enum ScrapeError {
    NotFound(String),
    Malformed { field: String, value: String, reason: String },
    Mismatch {
        left: String,
        right: String,
        /// Day index for per-day length checks, `None` for day counts.
        day: Option<usize>,
        left_len: usize,
        right_len: usize,
    },
    Lookup { abbreviation: String, reason: String },
    Context { context: String, source: Box<ScrapeError> },
}

impl ScrapeError {
    pub fn not_found(what: impl Into<String>) -> Self {
        ScrapeError::NotFound(what.into())
    }

    pub fn malformed(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        ScrapeError::Malformed {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Wrap this error in a layer naming where it happened.
    pub fn within(self, context: impl Into<String>) -> Self {
        ScrapeError::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Class of the innermost error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScrapeError::NotFound(_) => ErrorKind::NotFound,
            ScrapeError::Malformed { .. } => ErrorKind::Malformed,
            ScrapeError::Mismatch { .. } => ErrorKind::Mismatch,
            ScrapeError::Lookup { .. } => ErrorKind::Lookup,
            ScrapeError::Context { source, .. } => source.kind(),
        }
    }
}

impl std::fmt::Display for ScrapeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScrapeError::NotFound(what) => write!(f, "could not find {}", what),
            ScrapeError::Malformed { field, value, reason } => {
                write!(f, "invalid {} {:?}: {}", field, value, reason)
            }
            ScrapeError::Mismatch { left, right, day, left_len, right_len } => match day {
                Some(day) => write!(
                    f,
                    "{} and {} must have equal number of elements on day {} ({} vs {})",
                    left, right, day, left_len, right_len
                ),
                None => write!(
                    f,
                    "{} and {} must have equal number of elements ({} vs {})",
                    left, right, left_len, right_len
                ),
            },
            ScrapeError::Lookup { abbreviation, reason } => {
                write!(f, "could not resolve timezone {:?}: {}", abbreviation, reason)
            }
            ScrapeError::Context { context, source } => write!(f, "{}: {}", context, source),
        }
    }
}

impl std::error::Error for ScrapeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScrapeError::Context { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// Errors that can arise when fetching pages from the forecast site.
#[derive(Debug)]
pub enum FetchError {
    /// Non-2xx HTTP response other than 404.
    Http(u16),
    /// The site answered 404 for the requested break.
    BreakNotFound(String),
    /// The request could not be sent or the body could not be read.
    Request(reqwest::Error),
    /// The body was not the expected shape (search payload, HTML).
    Parse(String),
    /// The page parsed but the forecast could not be extracted.
    Scrape(ScrapeError),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Http(code) => write!(f, "HTTP error: {}", code),
            FetchError::BreakNotFound(name) => write!(f, "break not found: {}", name),
            FetchError::Request(err) => write!(f, "request failed: {}", err),
            FetchError::Parse(msg) => write!(f, "Parse error: {}", msg),
            FetchError::Scrape(err) => write!(f, "could not scrape page: {}", err),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Request(err) => Some(err),
            FetchError::Scrape(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Request(err)
    }
}

impl From<ScrapeError> for FetchError {
    fn from(err: ScrapeError) -> Self {
        FetchError::Scrape(err)
    }
}
