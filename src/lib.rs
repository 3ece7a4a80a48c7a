//! Surf forecast extraction for surf-forecast.com break pages.
//!
//! `scrape` turns a forecast page into a typed `ForecastReport`;
//! `ingest::surf_forecast` fetches pages and runs break searches.

pub mod config;
pub mod htmlutil;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod scrape;
pub mod timezones;
pub mod verify;

pub use model::{
    Break, BreakSearchResult, DailyForecast, ErrorKind, FetchError, ForecastReport,
    HourlyForecast, ScrapeError, Swell, Wind,
};
pub use scrape::{scrape_forecast, scrape_forecast_html};
