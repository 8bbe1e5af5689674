use std::{io::IsTerminal, path::PathBuf};

use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use forecast_core::{Config, CsvStore, Pipeline, WeatherFetcher, provider::fetcher_from_config};
use inquire::{Password, PasswordDisplayMode, Select, Text};
use tracing::{info, warn};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "forecast", version, about = "Daily weather statistics CLI")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure the API key and the list of cities.
    Configure,

    /// List configured cities.
    Cities,

    /// Fetch weather for a city, save it as CSV and show daily statistics.
    Show {
        /// City name; if absent, pick one interactively or use the default.
        city: Option<String>,

        /// Directory for the CSV files (overrides config).
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Do not write CSV files.
        #[arg(long)]
        no_save: bool,
    },

    /// Show previously saved daily statistics without fetching.
    Report {
        /// Directory holding daily_weather_stats.csv (overrides config).
        #[arg(long)]
        input_dir: Option<PathBuf>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Cities => {
                let config = Config::load()?;
                print!("{}", render::cities(&config));
                Ok(())
            }
            Command::Show {
                city,
                output_dir,
                no_save,
            } => {
                let config = Config::load()?;
                let city = resolve_city(&config, city)?;
                let fetcher = fetcher_from_config(&config)?;
                let store = (!no_save)
                    .then(|| CsvStore::new(output_dir.unwrap_or_else(|| config.output_dir())));

                show(&config, fetcher.as_ref(), store.as_ref(), &city).await
            }
            Command::Report { input_dir } => {
                let config = Config::load()?;
                let store = CsvStore::new(input_dir.unwrap_or_else(|| config.output_dir()));
                let daily = store.load_daily()?;

                let pipeline = Pipeline::new(config.thresholds, config.malformed_records);
                let days = pipeline.classify_days(daily);

                print!("{}", render::daily_table(&days));
                print!("{}", render::temperature_chart(&days));
                Ok(())
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    if !api_key.trim().is_empty() {
        config.set_api_key(api_key.trim().to_string());
    }

    let cities = Text::new("Cities (comma separated):")
        .with_default(&config.cities.join(", "))
        .prompt()
        .context("Failed to read city list")?;
    config.cities.clear();
    config.default_city = None;
    for city in cities.split(',') {
        config.add_city(city);
    }

    if config.cities.len() > 1 {
        let default = Select::new("Default city:", config.cities.clone())
            .prompt()
            .context("Failed to read default city")?;
        config.set_default_city(&default);
    }

    config.save()?;
    println!(
        "Configuration saved to {}",
        Config::config_file_path()?.display()
    );
    Ok(())
}

/// Explicit argument first, then the interactive selector, then the default.
fn resolve_city(config: &Config, city: Option<String>) -> anyhow::Result<String> {
    if let Some(city) = city {
        return Ok(city);
    }

    let default = config.default_city()?.to_string();
    if !std::io::stdin().is_terminal() || config.cities.len() < 2 {
        return Ok(default);
    }

    let cursor = config
        .cities
        .iter()
        .position(|c| c == &default)
        .unwrap_or(0);

    Select::new("City:", config.cities.clone())
        .with_starting_cursor(cursor)
        .prompt()
        .context("Failed to select a city")
}

/// One "update" of the dashboard: fetch, run the pipeline, persist, print.
async fn show(
    config: &Config,
    fetcher: &dyn WeatherFetcher,
    store: Option<&CsvStore>,
    city: &str,
) -> anyhow::Result<()> {
    info!(city, "updating weather");

    let (current, forecast) = tokio::join!(fetcher.current(city), fetcher.forecast(city));
    let current = current
        .inspect_err(|e| warn!("current weather unavailable: {e:#}"))
        .ok();
    let forecast = forecast
        .inspect_err(|e| warn!("forecast unavailable: {e:#}"))
        .ok();

    if current.is_none() && forecast.is_none() {
        return Err(anyhow!("No weather data could be fetched for {city}"));
    }

    let pipeline = Pipeline::new(config.thresholds, config.malformed_records);
    let report = pipeline.run(current.as_ref(), forecast.as_deref());

    println!("Weather for {city}");

    match report.current {
        Ok(Some(current)) => {
            print!("{}", render::current(&current));
            if let Some(store) = store {
                store.save_current(Some(&current))?;
            }
        }
        Ok(None) => println!("Current weather: unavailable"),
        Err(e) => eprintln!("Current weather skipped: {e}"),
    }

    let output = report
        .forecast
        .context("Failed to process forecast")?
        .ok_or_else(|| anyhow!("Forecast unavailable for {city}"))?;

    if output.skipped > 0 {
        eprintln!("Skipped {} malformed forecast entries", output.skipped);
    }

    if let Some(store) = store {
        store.save_hourly(Some(output.hourly.as_slice()))?;
        store.save_daily(Some(output.daily_stats().as_slice()))?;
        println!("Saved CSV files to {}", store.dir().display());
    }

    print!("{}", render::daily_table(&output.daily));
    print!("{}", render::temperature_chart(&output.daily));

    Ok(())
}
