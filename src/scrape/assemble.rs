//! Zip the per-row day blocks into typed daily and hourly forecasts.

use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;

use crate::model::{DailyForecast, ForecastReport, HourlyForecast, ScrapeError, Swell, Wind};

use super::issued::local_timestamp;
use super::rows::DayBlocks;

/// Every row of the table, split into day blocks, plus one date per day.
pub struct RawTable {
    pub dates: Vec<NaiveDate>,
    pub hours: DayBlocks<u32>,
    pub ratings: DayBlocks<u8>,
    pub swells: DayBlocks<Vec<Swell>>,
    pub wave_energies: DayBlocks<f64>,
    pub winds: DayBlocks<Wind>,
    pub wind_states: DayBlocks<String>,
}

fn ensure_equal(
    left: &str,
    left_len: usize,
    right: &str,
    right_len: usize,
    day: Option<usize>,
) -> Result<(), ScrapeError> {
    if left_len == right_len {
        return Ok(());
    }
    Err(ScrapeError::Mismatch {
        left: left.to_string(),
        right: right.to_string(),
        day,
        left_len,
        right_len,
    })
}

impl RawTable {
    /// Check that all rows agree on the number of days and, day by day, on
    /// the number of hours.
    pub fn validate(&self) -> Result<(), ScrapeError> {
        let days = self.dates.len();
        ensure_equal("days", days, "hours", self.hours.len(), None)?;
        ensure_equal("days", days, "ratings", self.ratings.len(), None)?;
        ensure_equal("days", days, "swells", self.swells.len(), None)?;
        ensure_equal("days", days, "wave energies", self.wave_energies.len(), None)?;
        ensure_equal("days", days, "winds", self.winds.len(), None)?;
        ensure_equal("days", days, "wind states", self.wind_states.len(), None)?;

        for day in 0..days {
            let hours = self.hours[day].len();
            let d = Some(day);
            ensure_equal("hours", hours, "ratings", self.ratings[day].len(), d)?;
            ensure_equal("hours", hours, "swells", self.swells[day].len(), d)?;
            ensure_equal("hours", hours, "wave energies", self.wave_energies[day].len(), d)?;
            ensure_equal("hours", hours, "winds", self.winds[day].len(), d)?;
            ensure_equal("hours", hours, "wind states", self.wind_states[day].len(), d)?;
        }

        Ok(())
    }
}

/// Validate and zip the raw table into a report.
pub fn assemble(issued_at: DateTime<Tz>, table: RawTable) -> Result<ForecastReport, ScrapeError> {
    table.validate()?;

    let tz = issued_at.timezone();
    let RawTable { dates, hours, ratings, swells, wave_energies, winds, wind_states } = table;

    let mut daily = Vec::with_capacity(dates.len());
    let rows = dates
        .into_iter()
        .zip(hours)
        .zip(ratings)
        .zip(swells)
        .zip(wave_energies)
        .zip(winds)
        .zip(wind_states);

    for (day, ((((((date, hours), ratings), swells), energies), winds), states)) in rows.enumerate() {
        let mut hourly = Vec::with_capacity(hours.len());
        let cells = hours
            .into_iter()
            .zip(ratings)
            .zip(swells)
            .zip(energies)
            .zip(winds)
            .zip(states);

        for (((((hour, rating), swells), energy), mut wind), state) in cells {
            wind.state = state;
            hourly.push(HourlyForecast {
                timestamp: local_timestamp(tz, date, hour)
                    .map_err(|e| e.within(format!("day {}", day)))?,
                hour,
                rating,
                swells,
                wave_energy_kj: energy,
                wind,
            });
        }

        daily.push(DailyForecast {
            date,
            timestamp: local_timestamp(tz, date, 0).map_err(|e| e.within(format!("day {}", day)))?,
            hourly,
        });
    }

    Ok(ForecastReport { issued_at, daily })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ErrorKind;
    use chrono::TimeZone;
    use chrono_tz::Asia::Kuala_Lumpur;

    fn wind(state: &str) -> Wind {
        Wind {
            speed_kmh: 10.0,
            direction_degrees: Some(90.0),
            direction_compass: "W".to_string(),
            state: state.to_string(),
        }
    }

    fn table(hours: Vec<Vec<u32>>) -> RawTable {
        let shape: Vec<usize> = hours.iter().map(Vec::len).collect();
        let block = |n: usize| -> Vec<u8> { vec![3; n] };
        RawTable {
            dates: (0..hours.len())
                .map(|i| NaiveDate::from_ymd_opt(2021, 4, 28 + i as u32).unwrap())
                .collect(),
            ratings: shape.iter().map(|&n| block(n)).collect(),
            swells: shape.iter().map(|&n| vec![Vec::new(); n]).collect(),
            wave_energies: shape.iter().map(|&n| vec![100.0; n]).collect(),
            winds: shape.iter().map(|&n| vec![wind(""); n]).collect(),
            wind_states: shape.iter().map(|&n| vec!["offshore".to_string(); n]).collect(),
            hours,
        }
    }

    fn issued() -> DateTime<Tz> {
        Kuala_Lumpur.with_ymd_and_hms(2021, 4, 28, 6, 0, 0).unwrap()
    }

    #[test]
    fn test_assemble_zips_rows() {
        let report = assemble(issued(), table(vec![vec![0, 12], vec![3, 6, 9]])).unwrap();
        assert_eq!(report.daily.len(), 2);
        assert_eq!(report.daily[0].hourly.len(), 2);
        assert_eq!(report.daily[1].hourly.len(), 3);

        let last = &report.daily[1].hourly[2];
        assert_eq!(last.hour, 9);
        assert_eq!(last.timestamp, Kuala_Lumpur.with_ymd_and_hms(2021, 4, 29, 9, 0, 0).unwrap());
        assert_eq!(last.wind.state, "offshore");
        assert_eq!(
            report.daily[1].timestamp,
            Kuala_Lumpur.with_ymd_and_hms(2021, 4, 29, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_day_count_mismatch() {
        let mut t = table(vec![vec![0], vec![3]]);
        t.winds.pop();
        let err = assemble(issued(), t).unwrap_err();
        assert_eq!(
            err,
            ScrapeError::Mismatch {
                left: "days".to_string(),
                right: "winds".to_string(),
                day: None,
                left_len: 2,
                right_len: 1,
            }
        );
    }

    #[test]
    fn test_hour_count_mismatch_names_pair_and_day() {
        let mut t = table(vec![vec![0, 3], vec![3, 6]]);
        t.wave_energies[1].pop();
        let err = assemble(issued(), t).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Mismatch);
        let msg = err.to_string();
        assert!(msg.contains("hours and wave energies"), "got {}", msg);
        assert!(msg.contains("day 1"), "got {}", msg);
    }

    #[test]
    fn test_day_whose_midnight_is_skipped_still_assembles() {
        use chrono_tz::America::Sao_Paulo;

        // Sao Paulo went from 00:00 straight to 01:00 on 2018-11-04
        let date = NaiveDate::from_ymd_opt(2018, 11, 4).unwrap();
        let mut t = table(vec![vec![2, 5]]);
        t.dates = vec![date];
        let issued_at = Sao_Paulo.with_ymd_and_hms(2018, 11, 3, 18, 0, 0).unwrap();

        let report = assemble(issued_at, t).unwrap();
        let day = &report.daily[0];
        assert_eq!(day.timestamp, Sao_Paulo.with_ymd_and_hms(2018, 11, 4, 1, 0, 0).unwrap());
        assert_eq!(day.hourly[0].timestamp, Sao_Paulo.with_ymd_and_hms(2018, 11, 4, 2, 0, 0).unwrap());
        assert_eq!(day.hourly[1].hour, 5);
    }
}
