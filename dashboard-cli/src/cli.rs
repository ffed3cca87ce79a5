use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dashboard_core::{
    ApiClient, CityId, Config, Direction, Gateway, TemperatureUnit, WeatherSource,
    view::{ActivityEvent, ActivityState, DashboardEvent, DashboardState, activity, dashboard},
};
use inquire::{CustomType, InquireError, Select, Text};
use std::path::PathBuf;
use tracing::debug;

use crate::render::{self, Sparkline};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-dashboard", version, about = "Weather dashboard in the terminal")]
pub struct Cli {
    /// Config file to use instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of a running dashboard server, e.g. "http://127.0.0.1:3000".
    /// Without it the forecast provider is queried directly.
    #[arg(long, global = true)]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Choose the default city, temperature unit and page size.
    Configure,

    /// Show current conditions and forecast charts for a city.
    Show {
        /// City id, e.g. "berlin" or "newyork". Defaults to the configured city.
        city: Option<CityId>,

        /// "celsius" or "fahrenheit"; overrides the configured unit.
        #[arg(long)]
        unit: Option<TemperatureUnit>,

        /// Keep the dashboard open and switch units without refetching.
        #[arg(long)]
        interactive: bool,
    },

    /// List which of the next 24 hours are good for outdoor activity.
    Activity {
        /// City id, e.g. "london".
        city: String,

        /// Page to open.
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Page through the results with Previous/Next prompts.
        #[arg(long)]
        interactive: bool,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };

        match self.command {
            Command::Configure => configure(config, self.config),
            Command::Show { city, unit, interactive } => {
                let source = weather_source(self.server.as_deref(), &config)?;
                let city = city.unwrap_or(config.dashboard.default_city);
                let unit = unit.unwrap_or(config.dashboard.unit);

                let state = DashboardState::new(city, unit);
                let state = dashboard::load(source.as_ref(), state, city).await;

                print!("{}", render::dashboard(&state, &Sparkline));

                if interactive {
                    toggle_units(state)?;
                }
                Ok(())
            }
            Command::Activity { city, page, interactive } => {
                let source = weather_source(self.server.as_deref(), &config)?;

                let state = ActivityState::new(config.dashboard.items_per_page);
                let state = activity::load(source.as_ref(), state, &city).await;
                let state = state.reduce(ActivityEvent::PageSelected(page));

                print!("{}", render::activity(&state));

                if interactive {
                    navigate(state)?;
                }
                Ok(())
            }
        }
    }
}

fn weather_source(server: Option<&str>, config: &Config) -> Result<Box<dyn WeatherSource>> {
    match server.or(config.dashboard.api_url.as_deref()) {
        Some(url) => {
            debug!(url, "using dashboard server");
            Ok(Box::new(ApiClient::new(url)?))
        }
        None => {
            debug!(upstream = %config.upstream.base_url, "querying forecast provider directly");
            Ok(Box::new(Gateway::from_config(config)?))
        }
    }
}

fn navigate(mut state: ActivityState) -> Result<()> {
    if state.series().ready().is_none() {
        return Ok(());
    }

    loop {
        let page = state.page();
        let mut options = Vec::new();
        if page.has_prev() {
            options.push("Previous");
        }
        if page.has_next() {
            options.push("Next");
        }
        options.push("Quit");

        let choice = match Select::new("Navigate:", options).prompt() {
            Ok(choice) => choice,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err).context("Failed to read page selection"),
        };

        let Ok(direction) = choice.parse::<Direction>() else {
            break;
        };

        state = state.reduce(ActivityEvent::PageChanged(direction));
        print!("{}", render::activity(&state));
    }

    Ok(())
}

fn toggle_units(mut state: DashboardState) -> Result<()> {
    loop {
        let toggle = render::unit_toggle_label(state.unit());
        let choice = match Select::new("Dashboard:", vec![toggle.as_str(), "Quit"]).prompt() {
            Ok(choice) => choice,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err).context("Failed to read dashboard action"),
        };

        if choice != toggle {
            break;
        }

        state = state.reduce(DashboardEvent::UnitToggled);
        print!("{}", render::dashboard(&state, &Sparkline));
    }

    Ok(())
}

fn configure(mut config: Config, path: Option<PathBuf>) -> Result<()> {
    let cities = CityId::all().to_vec();
    let cursor = cities.iter().position(|c| *c == config.dashboard.default_city).unwrap_or(0);
    config.dashboard.default_city = Select::new("Default city:", cities)
        .with_starting_cursor(cursor)
        .prompt()
        .context("Failed to read default city")?;

    let units = vec![TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit];
    let cursor = units.iter().position(|u| *u == config.dashboard.unit).unwrap_or(0);
    config.dashboard.unit = Select::new("Temperature unit:", units)
        .with_starting_cursor(cursor)
        .prompt()
        .context("Failed to read temperature unit")?;

    config.dashboard.items_per_page = CustomType::<usize>::new("Hours per page:")
        .with_default(config.dashboard.items_per_page)
        .with_error_message("Please enter a whole number")
        .prompt()
        .context("Failed to read page size")?
        .max(1);

    let current = config.dashboard.api_url.clone().unwrap_or_default();
    let api_url = Text::new("Dashboard server URL (leave empty to query Open-Meteo directly):")
        .with_default(&current)
        .prompt()
        .context("Failed to read server URL")?;
    config.dashboard.api_url = Some(api_url.trim().to_string()).filter(|u| !u.is_empty());

    let saved_to = match path {
        Some(path) => {
            config.save_to(&path)?;
            path
        }
        None => config.save()?,
    };

    println!("Configuration saved to {}", saved_to.display());
    Ok(())
}
