//! Per-cell value extraction and the parsers behind it.
//!
//! Each `extract_*` function reads one raw value out of one table cell and
//! validates it. Cells are navigated by element children, so whitespace
//! between tags does not shift positions.

use markup5ever_rcdom::Handle;
use serde::Deserialize;

use crate::htmlutil;
use crate::model::{ScrapeError, Swell, Wind};

use super::{
    ATTRIBUTE_ALTERNATE_IMAGE_TEXT, ATTRIBUTE_DATA_SPEED, ATTRIBUTE_DATA_SWELL_STATE,
    ATTRIBUTE_TRANSFORM, TRANSFORM_ROTATE_PREFIX, TRANSFORM_ROTATE_SUFFIX,
};

// ---------------------------------------------------------------------------
// Navigation helpers
// ---------------------------------------------------------------------------

fn first_child(node: &Handle, what: &str) -> Result<Handle, ScrapeError> {
    htmlutil::first_element_child(node).ok_or_else(|| ScrapeError::not_found(what))
}

fn last_child(node: &Handle, what: &str) -> Result<Handle, ScrapeError> {
    htmlutil::last_element_child(node).ok_or_else(|| ScrapeError::not_found(what))
}

fn attribute(node: &Handle, key: &str) -> Result<String, ScrapeError> {
    htmlutil::attribute(node, key)
        .ok_or_else(|| ScrapeError::not_found(format!("{} attribute", key)))
}

fn trimmed_text(node: &Handle) -> String {
    htmlutil::text_content(node).trim().to_string()
}

// ---------------------------------------------------------------------------
// Numbers
// ---------------------------------------------------------------------------

fn parse_integer(field: &str, s: &str) -> Result<i64, ScrapeError> {
    s.trim()
        .parse::<i64>()
        .map_err(|_| ScrapeError::malformed(field, s, "not integer"))
}

/// Finite float; `NaN` and `inf` parse in Rust but are never valid here.
fn parse_finite(field: &str, s: &str) -> Result<f64, ScrapeError> {
    match s.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ScrapeError::malformed(field, s, "not float")),
    }
}

fn parse_non_negative(field: &str, s: &str) -> Result<f64, ScrapeError> {
    let v = parse_finite(field, s)?;
    if v < 0.0 {
        return Err(ScrapeError::malformed(field, s, "must not be negative"));
    }
    Ok(v)
}

fn check_degrees(field: &str, raw: &str, degrees: f64) -> Result<f64, ScrapeError> {
    if !(0.0..=360.0).contains(&degrees) {
        return Err(ScrapeError::malformed(field, raw, "out of range 0-360"));
    }
    Ok(degrees)
}

// ---------------------------------------------------------------------------
// Day of month
// ---------------------------------------------------------------------------

pub fn parse_day(s: &str) -> Result<u32, ScrapeError> {
    let day = parse_integer("month day", s)?;
    if !(1..=31).contains(&day) {
        return Err(ScrapeError::malformed("month day", s, "out of range 1-31"));
    }
    Ok(day as u32)
}

/// Day cells hold a weekday name and a day number; the number is the last
/// element of the cell's last element.
pub fn extract_day(cell: &Handle) -> Result<u32, ScrapeError> {
    let container = last_child(cell, "day container node")?;
    let month_day = last_child(&container, "month day node")?;
    parse_day(&trimmed_text(&month_day))
}

// ---------------------------------------------------------------------------
// Hour
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Meridiem {
    BeforeMidday,
    AfterMidday,
}

static MERIDIEMS: &[(&str, Meridiem)] = &[
    ("AM", Meridiem::BeforeMidday),
    ("PM", Meridiem::AfterMidday),
];

pub fn parse_meridiem(s: &str) -> Result<Meridiem, ScrapeError> {
    let s = s.trim();
    MERIDIEMS
        .iter()
        .find(|(label, _)| label.eq_ignore_ascii_case(s))
        .map(|(_, m)| *m)
        .ok_or_else(|| ScrapeError::malformed("clock period", s, "expected AM or PM"))
}

pub fn parse_twelve_clock_hour(s: &str) -> Result<u32, ScrapeError> {
    let hour = parse_integer("hour", s)?;
    if !(1..=12).contains(&hour) {
        return Err(ScrapeError::malformed("hour", s, "not a 12 clock hour"));
    }
    Ok(hour as u32)
}

/// 12 AM is midnight and 12 PM is noon.
pub fn to_twenty_four_clock_hour(hour: u32, meridiem: Meridiem) -> u32 {
    match (meridiem, hour) {
        (Meridiem::BeforeMidday, 12) => 0,
        (Meridiem::BeforeMidday, h) => h,
        (Meridiem::AfterMidday, 12) => 12,
        (Meridiem::AfterMidday, h) => h + 12,
    }
}

pub fn extract_hour(cell: &Handle) -> Result<u32, ScrapeError> {
    let hour_node = first_child(cell, "hour node")?;
    let hour = parse_twelve_clock_hour(&trimmed_text(&hour_node))?;

    let period_node = last_child(cell, "clock period node")?;
    if std::rc::Rc::ptr_eq(&hour_node, &period_node) {
        return Err(ScrapeError::not_found("clock period node"));
    }
    let meridiem = parse_meridiem(&trimmed_text(&period_node))?;

    Ok(to_twenty_four_clock_hour(hour, meridiem))
}

// ---------------------------------------------------------------------------
// Rating
// ---------------------------------------------------------------------------

pub fn parse_rating(s: &str) -> Result<u8, ScrapeError> {
    let rating = parse_integer("rating", s)?;
    if !(0..=10).contains(&rating) {
        return Err(ScrapeError::malformed("rating", s, "out of range 0-10"));
    }
    Ok(rating as u8)
}

/// The rating is the alt text of the star image inside the cell.
pub fn extract_rating(cell: &Handle) -> Result<u8, ScrapeError> {
    let image = first_child(cell, "rating image node")?;
    parse_rating(&attribute(&image, ATTRIBUTE_ALTERNATE_IMAGE_TEXT)?)
}

// ---------------------------------------------------------------------------
// Swells
// ---------------------------------------------------------------------------

/// A number the site may write either bare or quoted.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
enum Lenient {
    Number(f64),
    Text(LenientText),
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct LenientText(f64);

impl<'de> Deserialize<'de> for LenientText {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.trim()
            .parse::<f64>()
            .map(LenientText)
            .map_err(|_| serde::de::Error::custom(format!("not a number: {:?}", s)))
    }
}

impl Lenient {
    fn value(self) -> f64 {
        match self {
            Lenient::Number(v) => v,
            Lenient::Text(LenientText(v)) => v,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SwellPayload {
    Record {
        period: Lenient,
        angle: Lenient,
        letters: String,
        height: Lenient,
    },
    Tuple(Lenient, Lenient, String, Lenient),
}

impl SwellPayload {
    fn into_swell(self) -> Result<Swell, ScrapeError> {
        let (period, angle, letters, height) = match self {
            SwellPayload::Record { period, angle, letters, height } => {
                (period.value(), angle.value(), letters, height.value())
            }
            SwellPayload::Tuple(period, angle, letters, height) => {
                (period.value(), angle.value(), letters, height.value())
            }
        };

        if !period.is_finite() || period <= 0.0 {
            return Err(ScrapeError::malformed("swell period", period.to_string(), "must be positive"));
        }
        check_degrees("swell direction", &angle.to_string(), angle)?;
        if !height.is_finite() || height < 0.0 {
            return Err(ScrapeError::malformed("swell height", height.to_string(), "must not be negative"));
        }

        Ok(Swell {
            period_seconds: period,
            direction_degrees: angle,
            direction_compass: letters.trim().to_string(),
            wave_height_m: height,
        })
    }
}

/// Decode a swell payload as published in the page.
///
/// The payload is a JSON-like array written with single quotes, e.g.
/// `[{'period':12.5,'angle':90,'letters':'E','height':1.2},null]`.
/// `null` entries are skipped.
pub fn decode_swells(raw: &str) -> Result<Vec<Swell>, ScrapeError> {
    let normalized = raw.replace('\'', "\"");
    let payload: Vec<Option<SwellPayload>> = serde_json::from_str(&normalized)
        .map_err(|e| ScrapeError::malformed("swell payload", raw, e.to_string()))?;

    payload
        .into_iter()
        .flatten()
        .map(SwellPayload::into_swell)
        .collect()
}

pub fn extract_swells(cell: &Handle) -> Result<Vec<Swell>, ScrapeError> {
    decode_swells(&attribute(cell, ATTRIBUTE_DATA_SWELL_STATE)?)
}

// ---------------------------------------------------------------------------
// Wave energy
// ---------------------------------------------------------------------------

pub fn parse_wave_energy(s: &str) -> Result<f64, ScrapeError> {
    parse_non_negative("wave energy", s)
}

pub fn extract_wave_energy(cell: &Handle) -> Result<f64, ScrapeError> {
    let container = first_child(cell, "wave energy node")?;
    parse_wave_energy(&trimmed_text(&container))
}

// ---------------------------------------------------------------------------
// Wind
// ---------------------------------------------------------------------------

pub fn parse_wind_speed(s: &str) -> Result<f64, ScrapeError> {
    parse_non_negative("wind speed", s)
}

/// Parse a transform of the exact shape `rotate(<degrees>)`.
pub fn parse_rotate_degrees(transform: &str) -> Result<f64, ScrapeError> {
    let inner = transform
        .trim()
        .strip_prefix(TRANSFORM_ROTATE_PREFIX)
        .and_then(|s| s.strip_suffix(TRANSFORM_ROTATE_SUFFIX))
        .ok_or_else(|| {
            ScrapeError::malformed("wind direction transform", transform, "expected rotate(<degrees>)")
        })?;
    let degrees = parse_finite("wind direction degrees", inner)?;
    check_degrees("wind direction degrees", inner, degrees)
}

/// The wind container holds an arrow graphic (circle, then arrow) followed
/// by the compass label. Pages without the graphic have no degrees.
fn extract_wind_degrees(container: &Handle) -> Result<Option<f64>, ScrapeError> {
    let children = htmlutil::element_children(container);
    if children.len() < 2 {
        return Ok(None);
    }
    let graphic = &children[0];
    let arrow = htmlutil::nth_element_child(graphic, 1)
        .ok_or_else(|| ScrapeError::not_found("wind direction arrow node"))?;
    let transform = attribute(&arrow, ATTRIBUTE_TRANSFORM)?;
    parse_rotate_degrees(&transform).map(Some)
}

/// Speed, direction and compass label; the state comes from its own row.
pub fn extract_wind(cell: &Handle) -> Result<Wind, ScrapeError> {
    let container = first_child(cell, "wind container node")?;
    let speed = parse_wind_speed(&attribute(&container, ATTRIBUTE_DATA_SPEED)?)?;
    let direction_degrees = extract_wind_degrees(&container)?;

    let compass = last_child(&container, "wind direction compass node")?;
    let direction_compass = trimmed_text(&compass);
    if direction_compass.is_empty() {
        return Err(ScrapeError::malformed("wind direction compass", "", "empty"));
    }

    Ok(Wind {
        speed_kmh: speed,
        direction_degrees,
        direction_compass,
        state: String::new(),
    })
}

pub fn extract_wind_state(cell: &Handle) -> Result<String, ScrapeError> {
    let state = trimmed_text(cell);
    if state.is_empty() {
        return Err(ScrapeError::malformed("wind state", state, "invalid wind state"));
    }
    Ok(state)
}
