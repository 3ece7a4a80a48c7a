//! Watchlist Verification Module
//!
//! Fetches every break on the configured watchlist against the live site
//! and records which ones still scrape cleanly. Run it after the site
//! changes its layout, or before adding a break to the watchlist.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::io::{self, Write};

use crate::config::{Config, WatchedBreak};
use crate::ingest::surf_forecast::{self, ForecastSpan};
use crate::logging::{self, Source};
use crate::model::ForecastReport;
use crate::timezones::{ConfiguredZones, ZoneResolver};

// ============================================================================
// Verification Results
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationReport {
    pub timestamp: String,
    pub results: Vec<BreakVerification>,
    pub summary: VerificationSummary,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerificationSummary {
    pub total: usize,
    pub working: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakVerification {
    pub name: String,
    pub status: VerificationStatus,
    pub days_scraped: usize,
    pub hours_scraped: usize,
    pub issued_at: Option<String>,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum VerificationStatus {
    Success,
    Failed,
}

impl BreakVerification {
    fn from_outcome(name: &str, outcome: Result<ForecastReport, String>) -> Self {
        match outcome {
            Ok(report) => {
                let hours_scraped = report.daily.iter().map(|d| d.hourly.len()).sum();
                // An empty table parses but is useless
                let status = if hours_scraped > 0 {
                    VerificationStatus::Success
                } else {
                    VerificationStatus::Failed
                };
                BreakVerification {
                    name: name.to_string(),
                    error_message: (status == VerificationStatus::Failed)
                        .then(|| "forecast table is empty".to_string()),
                    status,
                    days_scraped: report.daily.len(),
                    hours_scraped,
                    issued_at: Some(report.issued_at.to_rfc3339()),
                }
            }
            Err(message) => BreakVerification {
                name: name.to_string(),
                status: VerificationStatus::Failed,
                days_scraped: 0,
                hours_scraped: 0,
                issued_at: None,
                error_message: Some(message),
            },
        }
    }
}

impl VerificationReport {
    pub fn from_results(results: Vec<BreakVerification>) -> Self {
        let working = results
            .iter()
            .filter(|r| r.status == VerificationStatus::Success)
            .count();
        let summary = VerificationSummary {
            total: results.len(),
            working,
            failed: results.len() - working,
        };
        VerificationReport {
            timestamp: Utc::now().to_rfc3339(),
            results,
            summary,
        }
    }

    pub fn success_rate(&self) -> f64 {
        if self.summary.total > 0 {
            (self.summary.working as f64 / self.summary.total as f64) * 100.0
        } else {
            0.0
        }
    }
}

// ============================================================================
// Break Verification
// ============================================================================

pub fn verify_break(
    client: &reqwest::blocking::Client,
    base_url: &str,
    watched: &WatchedBreak,
    zones: &dyn ZoneResolver,
) -> BreakVerification {
    let span = if watched.twelve_days {
        ForecastSpan::TwelveDays
    } else {
        ForecastSpan::EightDays
    };

    let outcome = surf_forecast::fetch_forecast(client, base_url, &watched.name, span, zones)
        .map_err(|e| {
            logging::log_fetch_failure(&watched.name, "forecast", &e);
            e.to_string()
        });

    BreakVerification::from_outcome(&watched.name, outcome)
}

// ============================================================================
// Main Verification Runner
// ============================================================================

/// Write the progress label for a break and flush it, so it shows while the
/// fetch is still running.
fn announce<W: Write>(out: &mut W, name: &str) -> io::Result<()> {
    write!(out, "  {} ... ", name)?;
    out.flush()
}

pub fn run_verification(config: &Config) -> Result<VerificationReport, Box<dyn Error>> {
    let client = surf_forecast::build_http_client(&config.client)?;
    let zones = ConfiguredZones::new(&config.timezones);

    if config.watchlist.is_empty() {
        logging::warn(Source::System, None, "watchlist is empty, nothing to verify");
    }

    println!("\n🔍 Verifying watchlist breaks...");
    let mut results = Vec::with_capacity(config.watchlist.len());
    for watched in &config.watchlist {
        if let Err(e) = announce(&mut io::stdout(), &watched.name) {
            logging::debug(Source::System, Some(&watched.name), &format!("could not write progress: {}", e));
        }
        let result = verify_break(&client, &config.client.base_url, watched, &zones);

        match result.status {
            VerificationStatus::Success => {
                println!("✓ OK ({} days, {} hours)", result.days_scraped, result.hours_scraped);
            }
            VerificationStatus::Failed => {
                println!("✗ FAILED: {}", result.error_message.as_deref().unwrap_or("Unknown"));
            }
        }

        results.push(result);
    }

    let report = VerificationReport::from_results(results);
    logging::log_run_summary(
        Source::System,
        report.summary.total,
        report.summary.working,
        report.summary.failed,
    );
    Ok(report)
}

pub fn print_summary(report: &VerificationReport) {
    println!("\n═══════════════════════════════════════════════════════════");
    println!("📊 VERIFICATION SUMMARY");
    println!("═══════════════════════════════════════════════════════════");
    println!();
    println!(
        "Breaks:    {}/{} working  ({} failed)",
        report.summary.working, report.summary.total, report.summary.failed
    );
    println!();
    println!(
        "Overall Success Rate: {:.1}% ({}/{})",
        report.success_rate(),
        report.summary.working,
        report.summary.total
    );
    println!("═══════════════════════════════════════════════════════════");
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::Asia::Kuala_Lumpur;

    fn report_with_hours(hours: usize) -> ForecastReport {
        let issued_at = Kuala_Lumpur.with_ymd_and_hms(2021, 4, 28, 6, 0, 0).unwrap();
        let daily = if hours == 0 {
            Vec::new()
        } else {
            vec![crate::model::DailyForecast {
                date: issued_at.date_naive(),
                timestamp: issued_at,
                hourly: (0..hours)
                    .map(|h| crate::model::HourlyForecast {
                        timestamp: issued_at,
                        hour: h as u32,
                        rating: 2,
                        swells: Vec::new(),
                        wave_energy_kj: 50.0,
                        wind: crate::model::Wind {
                            speed_kmh: 5.0,
                            direction_degrees: None,
                            direction_compass: "N".to_string(),
                            state: "glass".to_string(),
                        },
                    })
                    .collect(),
            }]
        };
        ForecastReport { issued_at, daily }
    }

    #[test]
    fn test_successful_outcome() {
        let v = BreakVerification::from_outcome("Cherating", Ok(report_with_hours(3)));
        assert_eq!(v.status, VerificationStatus::Success);
        assert_eq!(v.days_scraped, 1);
        assert_eq!(v.hours_scraped, 3);
        assert!(v.issued_at.is_some());
        assert!(v.error_message.is_none());
    }

    #[test]
    fn test_empty_table_counts_as_failure() {
        let v = BreakVerification::from_outcome("Cherating", Ok(report_with_hours(0)));
        assert_eq!(v.status, VerificationStatus::Failed);
        assert!(v.error_message.is_some());
    }

    #[test]
    fn test_summary_counts() {
        let report = VerificationReport::from_results(vec![
            BreakVerification::from_outcome("A", Ok(report_with_hours(2))),
            BreakVerification::from_outcome("B", Err("break not found: B".to_string())),
            BreakVerification::from_outcome("C", Ok(report_with_hours(1))),
        ]);
        assert_eq!(report.summary.total, 3);
        assert_eq!(report.summary.working, 2);
        assert_eq!(report.summary.failed, 1);
        assert!((report.success_rate() - 66.666).abs() < 0.01);
    }

    #[test]
    fn test_report_serializes() {
        let report = VerificationReport::from_results(vec![BreakVerification::from_outcome(
            "B",
            Err("HTTP error: 500".to_string()),
        )]);
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"status\":\"Failed\""));
    }

    #[derive(Default)]
    struct RecordingWriter {
        written: Vec<u8>,
        flushed_len: Option<usize>,
    }

    impl Write for RecordingWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            self.flushed_len = Some(self.written.len());
            Ok(())
        }
    }

    #[test]
    fn test_progress_label_is_flushed_before_fetch() {
        let mut out = RecordingWriter::default();
        announce(&mut out, "Cherating").unwrap();
        assert_eq!(String::from_utf8(out.written.clone()).unwrap(), "  Cherating ... ");
        assert_eq!(out.flushed_len, Some(out.written.len()));
    }
}
