//! surfcast - surf-forecast.com forecast extraction

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use surfcast_service::config::{Config, DEFAULT_CONFIG_PATH};
use surfcast_service::ingest::surf_forecast::{self, ForecastSpan};
use surfcast_service::logging::{self, Source};
use surfcast_service::model::ForecastReport;
use surfcast_service::scrape;
use surfcast_service::timezones::ConfiguredZones;
use surfcast_service::verify;

#[derive(Parser)]
#[command(name = "surfcast")]
#[command(version, about = "Surf forecast extraction for surf-forecast.com", long_about = None)]
#[command(after_help = "EXAMPLES:
    surfcast forecast Cherating          Eight-day forecast as a table
    surfcast forecast Cherating --json   Same, as JSON
    surfcast parse saved_page.html       Extract from a saved page
    surfcast search cherat               Find break names")]
struct Cli {
    /// Configuration file
    #[arg(short, long, value_name = "PATH", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch and extract a break's forecast
    Forecast {
        /// Break name as used in the site's URLs (e.g. "Cherating")
        #[arg(value_name = "BREAK")]
        name: String,

        /// Fetch the twelve-day page instead of the eight-day one
        #[arg(long)]
        twelve_days: bool,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Extract a forecast from a saved page
    Parse {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[arg(long)]
        json: bool,
    },
    /// Search break names
    Search {
        #[arg(value_name = "QUERY")]
        query: String,
    },
    /// Show a break's canonical name and country
    Break {
        #[arg(value_name = "NAME")]
        name: String,
    },
    /// Check every watchlist break against the live site
    Verify,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match run(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            logging::error(Source::System, None, &e);
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: &Path) -> Result<Config, String> {
    let config = Config::load(path).map_err(|e| e.to_string())?;
    let level = config.logging.min_level().map_err(|e| e.to_string())?;
    logging::init_logger(level, config.logging.file.as_deref(), config.logging.timestamps);
    logging::debug(
        Source::Config,
        None,
        &format!("loaded {} (base url {})", path.display(), config.client.base_url),
    );
    Ok(config)
}

fn run(command: Command, config: &Config) -> Result<(), String> {
    let zones = ConfiguredZones::new(&config.timezones);
    let base_url = config.client.base_url.as_str();

    match command {
        Command::Forecast { name, twelve_days, json } => {
            let client = surf_forecast::build_http_client(&config.client).map_err(|e| e.to_string())?;
            let span = if twelve_days {
                ForecastSpan::TwelveDays
            } else {
                ForecastSpan::EightDays
            };
            let report = surf_forecast::fetch_forecast(&client, base_url, &name, span, &zones)
                .map_err(|e| e.to_string())?;
            print_report(&report, json)
        }
        Command::Parse { file, json } => {
            let bytes = std::fs::read(&file).map_err(|e| format!("{}: {}", file.display(), e))?;
            let report = scrape::scrape_forecast_html(&bytes, &zones).map_err(|e| e.to_string())?;
            print_report(&report, json)
        }
        Command::Search { query } => {
            let client = surf_forecast::build_http_client(&config.client).map_err(|e| e.to_string())?;
            let results = surf_forecast::search_breaks(&client, base_url, &query)
                .map_err(|e| e.to_string())?;
            if results.is_empty() {
                println!("No breaks match {query:?}");
            }
            for result in results {
                println!("{} ({})", result.name, result.country_name);
            }
            Ok(())
        }
        Command::Break { name } => {
            let client = surf_forecast::build_http_client(&config.client).map_err(|e| e.to_string())?;
            let found = surf_forecast::fetch_break(&client, base_url, &name).map_err(|e| e.to_string())?;
            println!("Break: {}", found.name);
            println!("Country: {}", found.country_name);
            Ok(())
        }
        Command::Verify => {
            let report = verify::run_verification(config).map_err(|e| e.to_string())?;
            verify::print_summary(&report);
            if report.summary.failed > 0 {
                return Err(format!("{} watchlist breaks failed", report.summary.failed));
            }
            Ok(())
        }
    }
}

fn print_report(report: &ForecastReport, json: bool) -> Result<(), String> {
    if json {
        let text = serde_json::to_string_pretty(report).map_err(|e| e.to_string())?;
        println!("{text}");
        return Ok(());
    }

    println!("Issued: {}", report.issued_at.format("%Y-%m-%d %H:%M %Z"));
    for day in &report.daily {
        println!();
        println!("{}", day.date.format("%A %d %B %Y"));
        println!("  hour  rating  energy(kJ)  wind(km/h)  dir  state       swells");
        for hour in &day.hourly {
            let swells: Vec<String> = hour
                .swells
                .iter()
                .map(|s| format!("{:.1}m@{:.0}s {}", s.wave_height_m, s.period_seconds, s.direction_compass))
                .collect();
            println!(
                "  {:>4}  {:>6}  {:>10.0}  {:>10.0}  {:>3}  {:<10}  {}",
                hour.hour,
                hour.rating,
                hour.wave_energy_kj,
                hour.wind.speed_kmh,
                hour.wind.direction_compass,
                hour.wind.state,
                swells.join(", ")
            );
        }
    }
    Ok(())
}
