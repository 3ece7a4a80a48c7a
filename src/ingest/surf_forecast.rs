/// surf-forecast.com client
///
/// Fetches break forecast pages, break pages, and the break-name search
/// endpoint, and hands the bodies to the `scrape` module.
///
/// Forecast pages: https://www.surf-forecast.com/breaks/{break}/forecasts/latest
/// Search:         https://www.surf-forecast.com/breaks/ac_location_name?query={text}

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::StatusCode;
use std::time::Duration;

use crate::config::ClientConfig;
use crate::htmlutil;
use crate::logging::{self, Source};
use crate::model::{Break, BreakSearchResult, FetchError, ForecastReport};
use crate::scrape;
use crate::timezones::ZoneResolver;

/// Characters escaped when a break name is placed in a URL path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

const SEARCH_PATH: &str = "/breaks/ac_location_name";
const SEARCH_QUERY_KEY: &str = "query";

// ============================================================================
// URL Building
// ============================================================================

/// How far ahead the requested forecast page reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ForecastSpan {
    #[default]
    EightDays,
    TwelveDays,
}

impl ForecastSpan {
    fn path_suffix(self) -> &'static str {
        match self {
            ForecastSpan::EightDays => "/forecasts/latest",
            ForecastSpan::TwelveDays => "/forecasts/latest/six_days",
        }
    }
}

fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

fn trimmed_base(base_url: &str) -> &str {
    base_url.trim_end_matches('/')
}

/// Build the URL of a break's own page.
pub fn build_break_url(base_url: &str, break_name: &str) -> String {
    format!("{}/breaks/{}", trimmed_base(base_url), encode_segment(break_name))
}

/// Build the URL of a break's forecast page.
///
/// # Example
/// ```ignore
/// let url = build_forecast_url("https://www.surf-forecast.com", "Cherating", ForecastSpan::EightDays);
/// // https://www.surf-forecast.com/breaks/Cherating/forecasts/latest
/// ```
pub fn build_forecast_url(base_url: &str, break_name: &str, span: ForecastSpan) -> String {
    format!("{}{}", build_break_url(base_url, break_name), span.path_suffix())
}

pub fn build_search_url(base_url: &str) -> String {
    format!("{}{}", trimmed_base(base_url), SEARCH_PATH)
}

// ============================================================================
// API Client Functions
// ============================================================================

/// Build the blocking HTTP client shared by all requests.
pub fn build_http_client(config: &ClientConfig) -> Result<reqwest::blocking::Client, FetchError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .user_agent(config.user_agent.clone())
        .build()?;
    Ok(client)
}

/// GET a page, mapping 404 to `BreakNotFound` and other failures to `Http`.
fn get_page(
    client: &reqwest::blocking::Client,
    url: &str,
    break_name: &str,
) -> Result<Vec<u8>, FetchError> {
    logging::debug(Source::Fetch, Some(break_name), &format!("GET {}", url));

    let response = client.get(url).send()?;
    let status = response.status();

    if status == StatusCode::NOT_FOUND {
        return Err(FetchError::BreakNotFound(break_name.to_string()));
    }
    if !status.is_success() {
        return Err(FetchError::Http(status.as_u16()));
    }

    Ok(response.bytes()?.to_vec())
}

/// Fetch and extract a break's forecast.
pub fn fetch_forecast(
    client: &reqwest::blocking::Client,
    base_url: &str,
    break_name: &str,
    span: ForecastSpan,
    zones: &dyn ZoneResolver,
) -> Result<ForecastReport, FetchError> {
    let url = build_forecast_url(base_url, break_name, span);
    let body = get_page(client, &url, break_name)?;

    let report = scrape::scrape_forecast_html(&body, zones)?;

    logging::info(
        Source::Fetch,
        Some(break_name),
        &format!("forecast issued {} covers {} days", report.issued_at.to_rfc3339(), report.daily.len()),
    );
    Ok(report)
}

/// Look up breaks whose names match free text.
pub fn search_breaks(
    client: &reqwest::blocking::Client,
    base_url: &str,
    query: &str,
) -> Result<Vec<BreakSearchResult>, FetchError> {
    let url = build_search_url(base_url);
    logging::debug(Source::Search, None, &format!("GET {}?{}={}", url, SEARCH_QUERY_KEY, query));

    let response = client
        .get(&url)
        .query(&[(SEARCH_QUERY_KEY, query)])
        .send()?;

    if !response.status().is_success() {
        return Err(FetchError::Http(response.status().as_u16()));
    }

    let body = response.text()?;
    let results = scrape::breaks::parse_search_results(&body)
        .map_err(|e| FetchError::Parse(e.to_string()))?;

    logging::info(
        Source::Search,
        None,
        &format!("{} breaks match {:?}", results.len(), query),
    );
    Ok(results)
}

/// Fetch a break's page and read its canonical name and country.
pub fn fetch_break(
    client: &reqwest::blocking::Client,
    base_url: &str,
    break_name: &str,
) -> Result<Break, FetchError> {
    let url = build_break_url(base_url, break_name);
    let body = get_page(client, &url, break_name)?;

    let dom = htmlutil::parse_html(&body).map_err(|e| FetchError::Parse(e.to_string()))?;
    let found = scrape::breaks::scrape_break(&dom.document)?;
    Ok(found)
}
