//! Issuance timestamp: "when was this forecast generated".
//!
//! The page header states it as a sentence of twelve space-separated tokens,
//! e.g. `Surf Forecast for Cherating issued at 2 PM 28 Apr 2021 MYT`.

use chrono::{DateTime, Duration, NaiveDate, TimeZone};
use chrono_tz::Tz;
use markup5ever_rcdom::Handle;

use crate::htmlutil;
use crate::model::ScrapeError;
use crate::timezones::ZoneResolver;

use super::cells::{parse_day, parse_meridiem, parse_twelve_clock_hour, to_twenty_four_clock_hour};
use super::CLASS_BREAK_HEADER_ISSUED;

const ISSUED_TOKEN_COUNT: usize = 12;
const TOKEN_HOUR: usize = 6;
const TOKEN_MERIDIEM: usize = 7;
const TOKEN_DAY: usize = 8;
const TOKEN_MONTH: usize = 9;
const TOKEN_YEAR: usize = 10;
const TOKEN_ZONE: usize = 11;

static SHORT_MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Month number (1–12) for a three-letter English month name.
pub fn parse_month_short(s: &str) -> Result<u32, ScrapeError> {
    SHORT_MONTHS
        .iter()
        .position(|m| *m == s)
        .map(|i| i as u32 + 1)
        .ok_or_else(|| ScrapeError::malformed("short month", s, "expected Jan..Dec"))
}

fn parse_year(s: &str) -> Result<i32, ScrapeError> {
    if s.len() != 4 || !s.chars().all(|c| c.is_ascii_digit()) {
        return Err(ScrapeError::malformed("year", s, "expected 4 digits"));
    }
    s.parse::<i32>()
        .map_err(|_| ScrapeError::malformed("year", s, "not integer"))
}

/// Resolve a zone abbreviation to a loadable IANA zone, taking the first
/// candidate the resolver offers.
pub fn resolve_zone(abbreviation: &str, zones: &dyn ZoneResolver) -> Result<Tz, ScrapeError> {
    let candidates = zones.candidates(abbreviation);
    let first = candidates.first().ok_or_else(|| ScrapeError::Lookup {
        abbreviation: abbreviation.to_string(),
        reason: "0 timezones found".to_string(),
    })?;

    first.parse::<Tz>().map_err(|_| ScrapeError::Lookup {
        abbreviation: abbreviation.to_string(),
        reason: format!("could not load time zone {:?}", first),
    })
}

/// Longest DST jump stepped over when a local time does not exist.
const MAX_GAP_HOURS: i64 = 3;

/// Build a zoned timestamp from local calendar fields.
///
/// An ambiguous local time (DST fall-back) takes the earlier instant. A
/// local time skipped by a DST jump moves forward to the first whole hour
/// that exists, so a zone that skips midnight still yields a day start.
pub fn local_timestamp(tz: Tz, date: NaiveDate, hour: u32) -> Result<DateTime<Tz>, ScrapeError> {
    let naive = date
        .and_hms_opt(hour, 0, 0)
        .ok_or_else(|| ScrapeError::malformed("hour", hour.to_string(), "not a valid hour of day"))?;

    (0..=MAX_GAP_HOURS)
        .find_map(|step| tz.from_local_datetime(&(naive + Duration::hours(step))).earliest())
        .ok_or_else(|| {
            ScrapeError::malformed(
                "local time",
                naive.to_string(),
                format!("does not exist in {}", tz.name()),
            )
        })
}

/// Parse the issuance sentence into an absolute, zoned timestamp.
pub fn parse_issued_text(text: &str, zones: &dyn ZoneResolver) -> Result<DateTime<Tz>, ScrapeError> {
    let parts: Vec<&str> = text.split_whitespace().collect();
    if parts.len() != ISSUED_TOKEN_COUNT {
        return Err(ScrapeError::malformed(
            "issue text",
            text.trim(),
            format!("expected {} tokens, got {}", ISSUED_TOKEN_COUNT, parts.len()),
        ));
    }

    let hour = parse_twelve_clock_hour(parts[TOKEN_HOUR])?;
    let meridiem = parse_meridiem(parts[TOKEN_MERIDIEM])?;
    let day = parse_day(parts[TOKEN_DAY])?;
    let month = parse_month_short(parts[TOKEN_MONTH])?;
    let year = parse_year(parts[TOKEN_YEAR])?;
    let tz = resolve_zone(parts[TOKEN_ZONE], zones)?;

    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        ScrapeError::malformed(
            "issue date",
            format!("{} {} {}", parts[TOKEN_DAY], parts[TOKEN_MONTH], parts[TOKEN_YEAR]),
            "not a calendar date",
        )
    })?;

    local_timestamp(tz, date, to_twenty_four_clock_hour(hour, meridiem))
}

/// Find the issuance header in the document and parse it.
pub fn scrape_issued_at(document: &Handle, zones: &dyn ZoneResolver) -> Result<DateTime<Tz>, ScrapeError> {
    let container = htmlutil::find_first(
        document,
        &[htmlutil::with_class_equal(CLASS_BREAK_HEADER_ISSUED)],
    )
    .ok_or_else(|| ScrapeError::not_found("issue container node"))?;

    let text = htmlutil::text_content(&container);
    if text.trim().is_empty() {
        return Err(ScrapeError::not_found("issue text node"));
    }

    parse_issued_text(&text, zones)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ErrorKind;
    use crate::timezones::BuiltinZones;
    use chrono::{Datelike, Timelike};

    struct NoZones;

    impl ZoneResolver for NoZones {
        fn candidates(&self, _abbreviation: &str) -> Vec<String> {
            Vec::new()
        }
    }

    struct BogusZones;

    impl ZoneResolver for BogusZones {
        fn candidates(&self, _abbreviation: &str) -> Vec<String> {
            vec!["Mars/Olympus_Mons".to_string(), "Asia/Tokyo".to_string()]
        }
    }

    const ISSUED: &str = "Surf Forecast for Cherating issued at 2 PM 28 Apr 2021 MYT";

    #[test]
    fn test_parse_issued_text() {
        let issued = parse_issued_text(ISSUED, &BuiltinZones).unwrap();
        assert_eq!(issued.timezone(), chrono_tz::Asia::Kuala_Lumpur);
        assert_eq!((issued.year(), issued.month(), issued.day()), (2021, 4, 28));
        assert_eq!(issued.hour(), 14);
        // Kuala Lumpur is UTC+8 with no DST.
        assert_eq!(issued.naive_utc().hour(), 6);
    }

    #[test]
    fn test_midnight_issue() {
        let text = "Surf Forecast for Cherating issued at 12 AM 1 Jan 2022 MYT";
        let issued = parse_issued_text(text, &BuiltinZones).unwrap();
        assert_eq!(issued.hour(), 0);
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        let text = format!("\n   {}  \n", ISSUED);
        assert!(parse_issued_text(&text, &BuiltinZones).is_ok());
    }

    #[test]
    fn test_token_count_mismatch_is_fatal() {
        let err = parse_issued_text("issued at 2 PM 28 Apr 2021 MYT", &BuiltinZones).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Malformed);
    }

    #[test]
    fn test_bad_fields_are_malformed() {
        for text in [
            "Surf Forecast for Cherating issued at 13 PM 28 Apr 2021 MYT",
            "Surf Forecast for Cherating issued at 2 XM 28 Apr 2021 MYT",
            "Surf Forecast for Cherating issued at 2 PM 28 Apl 2021 MYT",
            "Surf Forecast for Cherating issued at 2 PM 28 Apr 21 MYT",
            "Surf Forecast for Cherating issued at 2 PM 31 Apr 2021 MYT",
        ] {
            let err = parse_issued_text(text, &BuiltinZones).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Malformed, "{}", text);
        }
    }

    #[test]
    fn test_unknown_abbreviation_is_lookup_failure() {
        let err = parse_issued_text(ISSUED, &NoZones).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Lookup);
    }

    #[test]
    fn test_first_candidate_must_load() {
        let err = resolve_zone("XYZ", &BogusZones).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Lookup);
        assert!(err.to_string().contains("Mars/Olympus_Mons"));
    }

    #[test]
    fn test_month_table() {
        assert_eq!(parse_month_short("Jan"), Ok(1));
        assert_eq!(parse_month_short("Dec"), Ok(12));
        assert!(parse_month_short("dec").is_err());
    }

    #[test]
    fn test_local_timestamp_in_dst_gap_moves_forward() {
        use chrono_tz::America::New_York;

        // Clocks in New York jump from 02:00 to 03:00 on 2021-03-14.
        let date = NaiveDate::from_ymd_opt(2021, 3, 14).unwrap();
        let skipped = local_timestamp(New_York, date, 2).unwrap();
        assert_eq!(skipped, New_York.with_ymd_and_hms(2021, 3, 14, 3, 0, 0).unwrap());
        assert_eq!(local_timestamp(New_York, date, 3).unwrap(), skipped);
    }

    #[test]
    fn test_local_timestamp_rejects_hour_outside_day() {
        let date = NaiveDate::from_ymd_opt(2021, 3, 14).unwrap();
        let err = local_timestamp(chrono_tz::Etc::UTC, date, 24).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Malformed);
    }
}
