/// Live tests against surf-forecast.com
///
/// These make real HTTP requests and depend on the site's current layout,
/// so they are ignored by default.
///
/// Run with: cargo test --test live_site -- --ignored --test-threads=1

use surfcast_service::config::ClientConfig;
use surfcast_service::ingest::surf_forecast::{self, ForecastSpan};
use surfcast_service::model::FetchError;
use surfcast_service::timezones::BuiltinZones;

fn client() -> (reqwest::blocking::Client, String) {
    let config = ClientConfig::default();
    let client = surf_forecast::build_http_client(&config).expect("client should build");
    (client, config.base_url)
}

#[test]
#[ignore]
fn test_live_forecast_for_cherating() {
    let (client, base) = client();
    let report =
        surf_forecast::fetch_forecast(&client, &base, "Cherating", ForecastSpan::EightDays, &BuiltinZones)
            .expect("Cherating forecast should scrape");

    assert!(!report.daily.is_empty());
    for day in &report.daily {
        assert!(!day.hourly.is_empty(), "day {} has no hours", day.date);
        for hour in &day.hourly {
            assert!(hour.rating <= 10);
            assert!(hour.hour < 24);
        }
    }
}

#[test]
#[ignore]
fn test_live_twelve_day_forecast_is_longer() {
    let (client, base) = client();
    let eight =
        surf_forecast::fetch_forecast(&client, &base, "Cherating", ForecastSpan::EightDays, &BuiltinZones)
            .expect("eight-day page should scrape");
    let twelve =
        surf_forecast::fetch_forecast(&client, &base, "Cherating", ForecastSpan::TwelveDays, &BuiltinZones)
            .expect("twelve-day page should scrape");
    assert!(twelve.daily.len() >= eight.daily.len());
}

#[test]
#[ignore]
fn test_live_unknown_break_is_not_found() {
    let (client, base) = client();
    let err = surf_forecast::fetch_forecast(
        &client,
        &base,
        "Definitely-Not-A-Real-Break-42",
        ForecastSpan::EightDays,
        &BuiltinZones,
    )
    .unwrap_err();
    assert!(matches!(err, FetchError::BreakNotFound(_)), "got {}", err);
}

#[test]
#[ignore]
fn test_live_search_and_break_page() {
    let (client, base) = client();
    let results = surf_forecast::search_breaks(&client, &base, "cherat").expect("search should work");
    assert!(results.iter().any(|r| r.name == "Cherating"), "got {:?}", results);

    let found = surf_forecast::fetch_break(&client, &base, "Cherating").expect("break page should scrape");
    assert_eq!(found.country_name, "Malaysia");
}
