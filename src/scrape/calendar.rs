//! Infer full calendar dates from a bare day-of-month sequence.
//!
//! The forecast table only shows day numbers. Days within one month are
//! strictly increasing, so a day number that is not greater than its
//! predecessor starts the next month.

use chrono::{Datelike, NaiveDate};

use crate::model::ScrapeError;

fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 { (year + 1, 1) } else { (year, month + 1) }
}

/// Assign a date to each day number, starting from the issuance month.
pub fn reconstruct_dates(issued: NaiveDate, days: &[u32]) -> Result<Vec<NaiveDate>, ScrapeError> {
    let (mut year, mut month) = (issued.year(), issued.month());
    let mut previous: Option<u32> = None;
    let mut dates = Vec::with_capacity(days.len());

    for &day in days {
        if previous.is_some_and(|prev| day <= prev) {
            (year, month) = next_month(year, month);
        }

        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
            ScrapeError::malformed(
                "month day",
                day.to_string(),
                format!("not a day of {}-{:02}", year, month),
            )
        })?;
        dates.push(date);
        previous = Some(day);
    }

    Ok(dates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ErrorKind;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_rollover() {
        let dates = reconstruct_dates(ymd(2021, 4, 27), &[28, 29, 30, 1, 2]).unwrap();
        assert_eq!(
            dates,
            vec![
                ymd(2021, 4, 28),
                ymd(2021, 4, 29),
                ymd(2021, 4, 30),
                ymd(2021, 5, 1),
                ymd(2021, 5, 2),
            ]
        );
    }

    #[test]
    fn test_year_rollover_only_on_december_wrap() {
        let dates = reconstruct_dates(ymd(2020, 12, 30), &[30, 31, 1, 2]).unwrap();
        assert_eq!(dates[1], ymd(2020, 12, 31));
        assert_eq!(dates[2], ymd(2021, 1, 1));
        assert_eq!(dates[3], ymd(2021, 1, 2));
    }

    #[test]
    fn test_repeated_day_advances_month() {
        let dates = reconstruct_dates(ymd(2021, 6, 5), &[5, 5]).unwrap();
        assert_eq!(dates, vec![ymd(2021, 6, 5), ymd(2021, 7, 5)]);
    }

    #[test]
    fn test_first_day_stays_in_issue_month() {
        // Issued late on the 30th, the table still starts two days back
        let dates = reconstruct_dates(ymd(2021, 4, 30), &[28, 29, 30, 1, 2]).unwrap();
        assert_eq!(
            dates,
            vec![
                ymd(2021, 4, 28),
                ymd(2021, 4, 29),
                ymd(2021, 4, 30),
                ymd(2021, 5, 1),
                ymd(2021, 5, 2),
            ]
        );
    }

    #[test]
    fn test_impossible_date_is_malformed() {
        let err = reconstruct_dates(ymd(2021, 4, 29), &[30, 31]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Malformed);
    }

    #[test]
    fn test_empty_sequence() {
        assert!(reconstruct_dates(ymd(2021, 4, 29), &[]).unwrap().is_empty());
    }
}
