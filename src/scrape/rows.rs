//! Row scrapers: find one table row and turn its cells into day blocks.

use markup5ever_rcdom::Handle;

use crate::htmlutil::{self, Condition, Visit};
use crate::model::{ScrapeError, Swell, Wind};

use super::cells;
use super::{
    ATTRIBUTE_DATA_ROW_NAME, CLASS_FORECAST_TABLE_CELL, CLASS_FORECAST_TABLE_DAYS,
    CLASS_FORECAST_TABLE_RATING, CLASS_FORECAST_TABLE_ROW, CLASS_FORECAST_TABLE_TIME,
    CLASS_IS_DAY_END, ROW_NAME_DAYS, ROW_NAME_ENERGY, ROW_NAME_RATING, ROW_NAME_TIME,
    ROW_NAME_WAVE_HEIGHT, ROW_NAME_WIND, ROW_NAME_WIND_STATE,
};

/// Values of one row, split into one block per forecast day.
pub type DayBlocks<T> = Vec<Vec<T>>;

/// How to find a row and read its cells.
pub struct RowSpec<T> {
    /// Used in error messages, e.g. "hours".
    pub label: &'static str,
    pub conditions: Vec<Condition>,
    pub extract: fn(&Handle) -> Result<T, ScrapeError>,
}

fn row_conditions(classes: &[&str], exact_class: bool, row_name: &str) -> Vec<Condition> {
    let class_condition = if exact_class {
        htmlutil::with_class_equal(classes[0])
    } else {
        htmlutil::with_class_containing(classes)
    };
    vec![
        class_condition,
        htmlutil::with_attribute_equal(ATTRIBUTE_DATA_ROW_NAME, row_name),
    ]
}

fn is_cell(node: &Handle) -> bool {
    htmlutil::class_contains(node, &[CLASS_FORECAST_TABLE_CELL])
}

fn is_day_end(node: &Handle) -> bool {
    htmlutil::class_contains(node, &[CLASS_IS_DAY_END])
}

fn find_row(table: &Handle, label: &str, conditions: &[Condition]) -> Result<Handle, ScrapeError> {
    htmlutil::find_first(table, conditions)
        .ok_or_else(|| ScrapeError::not_found(format!("{} row", label)))
}

/// Read every cell of the row into day blocks.
///
/// A block closes on each cell marked as the end of a day. Cells after the
/// last marker would form a partial day; that is an error rather than
/// silently dropped data.
pub fn scrape_row<T>(table: &Handle, spec: &RowSpec<T>) -> Result<DayBlocks<T>, ScrapeError> {
    let row = find_row(table, spec.label, &spec.conditions)?;

    let mut blocks: DayBlocks<T> = Vec::new();
    let mut current: Vec<T> = Vec::new();
    let mut index = 0usize;

    htmlutil::walk(&row, |node| {
        if !is_cell(node) {
            return Visit::Continue;
        }

        match (spec.extract)(node) {
            Ok(value) => current.push(value),
            Err(err) => return Visit::Abort(err.within(format!("cell {}", index))),
        }
        index += 1;

        if is_day_end(node) {
            blocks.push(std::mem::take(&mut current));
        }
        Visit::Continue
    })
    .map_err(|err| err.within(format!("{} row", spec.label)))?;

    if !current.is_empty() {
        return Err(ScrapeError::malformed(
            format!("{} row", spec.label),
            format!("{} trailing cells", current.len()),
            "last cell is not marked as the end of a day",
        ));
    }

    Ok(blocks)
}

/// Day-of-month numbers, one per day cell. The days row has no per-hour
/// cells, so it is not split into blocks.
pub fn scrape_days(table: &Handle) -> Result<Vec<u32>, ScrapeError> {
    let conditions = row_conditions(
        &[CLASS_FORECAST_TABLE_ROW, CLASS_FORECAST_TABLE_DAYS],
        false,
        ROW_NAME_DAYS,
    );
    let row = find_row(table, "days", &conditions)?;

    let mut days = Vec::new();
    htmlutil::walk(&row, |node| {
        if !is_cell(node) {
            return Visit::Continue;
        }
        match cells::extract_day(node) {
            Ok(day) => {
                days.push(day);
                Visit::Continue
            }
            Err(err) => Visit::Abort(err.within(format!("cell {}", days.len()))),
        }
    })
    .map_err(|err| err.within("days row"))?;

    Ok(days)
}

pub fn hours_row() -> RowSpec<u32> {
    RowSpec {
        label: "hours",
        conditions: row_conditions(
            &[CLASS_FORECAST_TABLE_ROW, CLASS_FORECAST_TABLE_TIME],
            false,
            ROW_NAME_TIME,
        ),
        extract: cells::extract_hour,
    }
}

pub fn ratings_row() -> RowSpec<u8> {
    RowSpec {
        label: "ratings",
        conditions: row_conditions(
            &[CLASS_FORECAST_TABLE_ROW, CLASS_FORECAST_TABLE_RATING],
            false,
            ROW_NAME_RATING,
        ),
        extract: cells::extract_rating,
    }
}

pub fn swells_row() -> RowSpec<Vec<Swell>> {
    RowSpec {
        label: "swells",
        conditions: row_conditions(&[CLASS_FORECAST_TABLE_ROW], true, ROW_NAME_WAVE_HEIGHT),
        extract: cells::extract_swells,
    }
}

pub fn wave_energies_row() -> RowSpec<f64> {
    RowSpec {
        label: "wave energies",
        conditions: row_conditions(&[CLASS_FORECAST_TABLE_ROW], true, ROW_NAME_ENERGY),
        extract: cells::extract_wave_energy,
    }
}

pub fn winds_row() -> RowSpec<Wind> {
    RowSpec {
        label: "winds",
        conditions: row_conditions(&[CLASS_FORECAST_TABLE_ROW], true, ROW_NAME_WIND),
        extract: cells::extract_wind,
    }
}

pub fn wind_states_row() -> RowSpec<String> {
    RowSpec {
        label: "wind states",
        conditions: row_conditions(&[CLASS_FORECAST_TABLE_ROW], true, ROW_NAME_WIND_STATE),
        extract: cells::extract_wind_state,
    }
}
