/// Forecast table extraction.
///
/// Turns a parsed forecast page into a `ForecastReport`:
///   1. `issued` reads the "issued at" header into a zoned timestamp.
///   2. `rows` finds each table row and splits its cells into day blocks,
///      using `cells` to read and validate each value.
///   3. `calendar` turns the bare day numbers into dates.
///   4. `assemble` checks that every row agrees on shape and zips them.
///
/// Extraction is all-or-nothing: any missing node or bad value fails the
/// whole call with a `ScrapeError` naming the row and cell.

pub mod assemble;
pub mod breaks;
pub mod calendar;
pub mod cells;
pub mod issued;
pub mod rows;

use markup5ever_rcdom::Handle;

use crate::htmlutil;
use crate::logging::{self, Source};
use crate::model::{ForecastReport, ScrapeError};
use crate::timezones::ZoneResolver;

use assemble::RawTable;

// ---------------------------------------------------------------------------
// Page vocabulary
// ---------------------------------------------------------------------------

pub const CLASS_BREAK_HEADER_ISSUED: &str = "break-header__issued";
pub const CLASS_FORECAST_TABLE_BASIC: &str = "forecast-table__basic";
pub const CLASS_FORECAST_TABLE_ROW: &str = "forecast-table__row";
pub const CLASS_FORECAST_TABLE_CELL: &str = "forecast-table__cell";
pub const CLASS_FORECAST_TABLE_TIME: &str = "forecast-table-time";
pub const CLASS_FORECAST_TABLE_DAYS: &str = "forecast-table-days";
pub const CLASS_FORECAST_TABLE_RATING: &str = "forecast-table-rating";
pub const CLASS_IS_DAY_END: &str = "is-day-end";

pub const ATTRIBUTE_DATA_ROW_NAME: &str = "data-row-name";
pub const ATTRIBUTE_DATA_SWELL_STATE: &str = "data-swell-state";
pub const ATTRIBUTE_DATA_SPEED: &str = "data-speed";
pub const ATTRIBUTE_ALTERNATE_IMAGE_TEXT: &str = "alt";
pub const ATTRIBUTE_TRANSFORM: &str = "transform";

pub const ROW_NAME_DAYS: &str = "days";
pub const ROW_NAME_TIME: &str = "time";
pub const ROW_NAME_RATING: &str = "rating";
pub const ROW_NAME_WAVE_HEIGHT: &str = "wave-height";
pub const ROW_NAME_ENERGY: &str = "energy";
pub const ROW_NAME_WIND: &str = "wind";
pub const ROW_NAME_WIND_STATE: &str = "wind-state";

pub const TRANSFORM_ROTATE_PREFIX: &str = "rotate(";
pub const TRANSFORM_ROTATE_SUFFIX: &str = ")";

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Extract the full forecast from a parsed page.
pub fn scrape_forecast(
    document: &Handle,
    zones: &dyn ZoneResolver,
) -> Result<ForecastReport, ScrapeError> {
    let issued_at = issued::scrape_issued_at(document, zones)
        .map_err(|e| e.within("could not scrape issue date"))?;

    let table = htmlutil::find_first(
        document,
        &[htmlutil::with_class_equal(CLASS_FORECAST_TABLE_BASIC)],
    )
    .ok_or_else(|| ScrapeError::not_found("table node"))?;

    let days = rows::scrape_days(&table)?;
    let dates = calendar::reconstruct_dates(issued_at.date_naive(), &days)
        .map_err(|e| e.within("could not resolve dates"))?;

    let raw = RawTable {
        dates,
        hours: rows::scrape_row(&table, &rows::hours_row())?,
        ratings: rows::scrape_row(&table, &rows::ratings_row())?,
        swells: rows::scrape_row(&table, &rows::swells_row())?,
        wave_energies: rows::scrape_row(&table, &rows::wave_energies_row())?,
        winds: rows::scrape_row(&table, &rows::winds_row())?,
        wind_states: rows::scrape_row(&table, &rows::wind_states_row())?,
    };

    let report = assemble::assemble(issued_at, raw)?;

    let hours: usize = report.daily.iter().map(|d| d.hourly.len()).sum();
    logging::debug(
        Source::Scrape,
        None,
        &format!(
            "scraped {} days / {} hours issued at {}",
            report.daily.len(),
            hours,
            report.issued_at.to_rfc3339()
        ),
    );

    Ok(report)
}

/// Parse raw page bytes and extract the forecast.
pub fn scrape_forecast_html(
    bytes: &[u8],
    zones: &dyn ZoneResolver,
) -> Result<ForecastReport, ScrapeError> {
    let dom = htmlutil::parse_html(bytes)
        .map_err(|e| ScrapeError::malformed("document", "", e.to_string()))?;
    scrape_forecast(&dom.document, zones)
}
