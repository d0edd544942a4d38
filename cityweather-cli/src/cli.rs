use anyhow::Context;
use clap::{Parser, Subcommand};
use cityweather_core::{
    Config, OpenDataSoftCatalog, OpenWeatherProvider, Route, WeatherDetail, config::API_KEY_ENV,
};
use inquire::{CustomType, Password, PasswordDisplayMode};

use crate::{browse, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "cityweather", version, about = "Browse cities and their weather")]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Browse the city directory interactively (default).
    Browse,

    /// Show current weather and the daily forecast for a place.
    Show {
        /// Place name, e.g. "Paris" or "New York".
        place: String,
    },

    /// Open a route: `/` for the directory, `/weather/<place>` for a place.
    Open {
        path: String,
    },

    /// Store the OpenWeather API key and paging settings.
    Configure,
}

/// Clients built from the loaded configuration.
#[derive(Debug)]
pub struct App {
    pub catalog: OpenDataSoftCatalog,
    pub provider: OpenWeatherProvider,
    pub page_size: usize,
}

impl App {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let http = config.http_client()?;
        Ok(Self {
            catalog: OpenDataSoftCatalog::new(config.catalog_url.clone(), http.clone()),
            provider: OpenWeatherProvider::new(
                config.api_key().map(String::from),
                config.weather_url.clone(),
                http,
            ),
            page_size: config.page_size,
        })
    }

    pub async fn open(&self, route: Route) -> anyhow::Result<()> {
        tracing::debug!(%route, "navigating");
        match route {
            Route::Directory => browse::run(self).await,
            Route::Weather { place } => {
                self.show(&place).await;
                Ok(())
            }
        }
    }

    pub async fn show(&self, place: &str) {
        if !self.provider.has_api_key() {
            eprintln!(
                "No OpenWeather API key configured.\n\
                 Hint: run `cityweather configure` or set {API_KEY_ENV}."
            );
        }

        let mut detail = WeatherDetail::new();
        println!("{}", render::loading());
        detail.fetch(&self.provider, place).await;

        let today = chrono::Local::now().date_naive();
        print!("{}", render::weather_card(place, detail.current(), today));
        print!("{}", render::forecast(detail.forecast()));
        detail.leave();
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let command = self.command.unwrap_or(Command::Browse);

        if let Command::Configure = command {
            return configure();
        }

        let config = Config::load()?;
        let app = App::from_config(&config)?;

        match command {
            Command::Browse => app.open(Route::Directory).await,
            Command::Show { place } => app.open(Route::weather(place)).await,
            Command::Open { path } => {
                let route = Route::parse(&path).with_context(|| {
                    format!("Unknown route '{path}'. Use `/` or `/weather/<place>`.")
                })?;
                app.open(route).await
            }
            Command::Configure => Ok(()),
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let path = Config::config_file_path()?;
    let mut config = Config::load_from(&path)?;

    let key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Leave empty to remove the stored key")
        .prompt()?;
    config.set_api_key(key);

    config.page_size = CustomType::<usize>::new("Cities per page:")
        .with_default(config.page_size)
        .with_error_message("Please type a whole number")
        .prompt()?;

    config.save_to(&path)?;
    println!("Saved configuration to {}", path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_browse() {
        let cli = Cli::try_parse_from(["cityweather"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn show_takes_a_place() {
        let cli = Cli::try_parse_from(["cityweather", "-vv", "show", "New York"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Some(Command::Show { place }) if place == "New York"));
    }

    #[test]
    fn app_builds_without_api_key() {
        let app = App::from_config(&Config::default()).unwrap();
        assert!(!app.provider.has_api_key());
        assert_eq!(app.page_size, cityweather_core::loader::DEFAULT_PAGE_SIZE);
    }
}
