use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

use weathercast::config::WeatherCastConfig;
use weathercast::dashboard::{DashboardSettings, DashboardView, WeatherDashboard};
use weathercast::favorites::FavoritesStore;
use weathercast::location_resolver::LocationResolver;
use weathercast::models::{LocationInput, LocationParser, Units};
use weathercast::openweather::OpenWeatherClient;
use weathercast::{WeatherCastError, logging};

#[derive(Parser, Debug)]
#[command(name = "weathercast", version, about = "City weather with a 7-day outlook")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Unit system: metric, imperial or standard
    #[arg(short, long, global = true)]
    units: Option<Units>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Current conditions and daily forecast for a city or "lat,lon"
    Forecast {
        /// City name or coordinates; defaults to the configured city
        location: Option<String>,
    },
    /// Current conditions only
    Current { location: Option<String> },
    /// Autocomplete suggestions for a partial city name
    Suggest { prefix: String },
    /// Manage favorite cities
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
}

#[derive(Subcommand, Debug)]
enum FavoritesAction {
    Add { city: String },
    Remove { city: String },
    /// List favorites with their current temperature
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = WeatherCastConfig::load_from_path(cli.config.clone())?;
    logging::init(&config.logging)?;
    debug!("Loaded configuration: {:?}", config.defaults);

    let units = cli.units.unwrap_or(config.defaults.units);
    let client = OpenWeatherClient::new(&config.api)?;
    let dashboard = WeatherDashboard::new(
        LocationResolver::new(client.clone())
            .with_suggestion_limit(config.defaults.suggestion_limit),
        client,
        DashboardSettings::from_config(&config),
    );

    match cli.command {
        Command::Forecast { location } => {
            let view = load(&dashboard, &config, location, units).await?;
            print_current(&view);
            print_forecast(&view);
        }
        Command::Current { location } => {
            let view = load(&dashboard, &config, location, units).await?;
            print_current(&view);
        }
        Command::Suggest { prefix } => {
            let suggestions = dashboard
                .resolver()
                .suggest(&prefix, config.country_bias())
                .await
                .map_err(user_error)?;
            if suggestions.is_empty() {
                println!("No suggestions.");
            }
            for candidate in suggestions {
                println!("{}", candidate.display_name());
            }
        }
        Command::Favorites { action } => {
            let store = FavoritesStore::new(config.favorites_path());
            match action {
                FavoritesAction::Add { city } => {
                    store.add(&city).map_err(user_error)?;
                    println!("Added {city} to favorites.");
                }
                FavoritesAction::Remove { city } => {
                    if store.remove(&city)? {
                        println!("Removed {city} from favorites.");
                    } else {
                        println!("{city} is not a favorite.");
                    }
                }
                FavoritesAction::List => {
                    let favorites = store.list()?;
                    if favorites.is_empty() {
                        println!("No favorite cities yet.");
                    }
                    for city in favorites {
                        let temperature = match dashboard.quick_temperature(&city, units).await {
                            Ok(Some(t)) => format!("{:.0}{}", t.round(), units.symbol()),
                            Ok(None) | Err(_) => "--".to_string(),
                        };
                        println!("{city:<24} {temperature}");
                    }
                }
            }
        }
    }

    Ok(())
}

async fn load(
    dashboard: &WeatherDashboard<OpenWeatherClient, OpenWeatherClient>,
    config: &WeatherCastConfig,
    location: Option<String>,
    units: Units,
) -> Result<DashboardView> {
    let location = location.unwrap_or_else(|| config.defaults.default_city.clone());
    let view = match LocationParser::parse(&location).map_err(user_error)? {
        LocationInput::Coordinates(lat, lon) => dashboard.load_coordinates(lat, lon, units).await,
        LocationInput::Name(name) => dashboard.load_city(&name, units).await,
    };
    view.map_err(user_error)
        .with_context(|| format!("Could not load weather for '{location}'"))
}

fn user_error(error: WeatherCastError) -> anyhow::Error {
    let message = error.user_message();
    anyhow::Error::new(error).context(message)
}

fn print_current(view: &DashboardView) {
    let current = &view.current;
    if view.simulated {
        println!(
            "Showing simulated data: {}",
            view.fallback_reason.as_deref().unwrap_or("lookup failed")
        );
    }
    println!("{}", current.display_name());
    println!(
        "  {}  {} (feels like {:.0}{})",
        current.format_temperature(view.units),
        current.condition.description,
        current.feels_like.round(),
        view.units.symbol()
    );
    println!(
        "  Humidity {}%  Wind {}  Pressure {}  Visibility {}",
        current.humidity,
        current.format_wind(),
        current.format_pressure(),
        current.format_visibility()
    );
}

fn print_forecast(view: &DashboardView) {
    println!();
    for day in &view.forecast {
        let (weekday, date) = day.day_labels();
        let marker = if day.is_simulated() { "*" } else { " " };
        println!(
            "{marker}{weekday:<4} {date:<7} {:<12} {:<20} {}",
            day.format_temperature_range(),
            day.representative_condition.description,
            day.format_wind()
        );
    }
    if view.forecast.iter().any(|d| d.is_simulated()) {
        println!("(* simulated)");
    }
}
