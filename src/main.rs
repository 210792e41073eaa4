//! weather-page command line
//!
//! `serve` runs the web page; `show` runs one flow and prints the regions.

#![allow(clippy::print_stdout)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;

use weather_page::telemetry::init_tracing;
use weather_page::{
    AppConfig, Coordinate, FixedGeolocator, HtmlPage, PageController, Region, ReportedPosition,
    Units, web,
};

#[derive(Parser)]
#[command(name = "weather-page")]
#[command(author, version, about = "Current weather for where you are", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to a TOML configuration file
    #[arg(short, long, env = "WEATHER_PAGE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the weather page over HTTP
    Serve {
        /// Port to listen on (overrides server.port)
        #[arg(short, long)]
        port: Option<u16>,

        /// Address to bind (overrides server.host)
        #[arg(long)]
        host: Option<String>,
    },

    /// Fetch the weather once and print the page regions
    ///
    /// Example: weather-page show --city "new york"
    /// Example: weather-page show --lat 52.52 --lon 13.405 --units imperial
    Show {
        /// City to search for instead of the current location
        #[arg(long, conflicts_with_all = ["lat", "lon"])]
        city: Option<String>,

        /// Latitude of the position to show
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,

        /// Longitude of the position to show
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,

        /// metric or imperial (overrides providers.units)
        #[arg(short, long)]
        units: Option<Units>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config =
        AppConfig::load_from_path(cli.config.clone()).context("Failed to load configuration")?;
    init_tracing(&config.logging, cli.verbose).context("Failed to initialise logging")?;
    debug!("Configuration loaded");

    match cli.command {
        Commands::Serve { port, host } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(host) = host {
                config.server.host = host;
            }
            web::run(&config).await.context("Web server failed")?;
        }
        Commands::Show {
            city,
            lat,
            lon,
            units,
        } => {
            if let Some(units) = units {
                config.providers.units = units;
            }
            show(&config, city, lat.zip(lon)).await?;
        }
    }

    Ok(())
}

async fn show(config: &AppConfig, city: Option<String>, position: Option<(f64, f64)>) -> Result<()> {
    let controller = PageController::from_config(config, HtmlPage::new())
        .context("Failed to set up providers")?;
    controller.init().await;

    let result = match (city, position) {
        (Some(city), _) => {
            controller
                .with_view(|page| page.set_search_input(city))
                .await;
            controller.submit_search().await
        }
        (None, Some((lat, lon))) => {
            let coordinate = Coordinate::checked(lat, lon)?;
            controller
                .load_current_location(&FixedGeolocator(coordinate))
                .await
        }
        (None, None) => {
            let position = ReportedPosition {
                denial: Some("no --lat/--lon given and no location configured".to_string()),
                fallback: config.fallback_location(),
                ..Default::default()
            };
            controller.load_current_location(&position).await
        }
    };

    controller.with_view(|page| print_page(page)).await;
    result.context("Could not show the weather")?;
    Ok(())
}

fn print_page(page: &HtmlPage) {
    let notice = page.label(Region::Notice);
    if !notice.is_empty() {
        println!("! {notice}");
    }
    println!("{}", page.label(Region::Place));
    println!("{}", page.label(Region::Timestamp));
    println!();
    println!("{}", page.region_text(Region::Conditions).join("  "));
    for pair in page.region_text(Region::Stats).chunks(2) {
        println!("  {}", pair.join(": "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_show_accepts_negative_coordinates() {
        let cli = Cli::try_parse_from(["weather-page", "-vv", "show", "--lat", "-33.87", "--lon", "151.21"])
            .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Show { lat, lon, city, .. } => {
                assert_eq!(lat, Some(-33.87));
                assert_eq!(lon, Some(151.21));
                assert!(city.is_none());
            }
            Commands::Serve { .. } => panic!("expected show"),
        }
    }

    #[test]
    fn test_show_rejects_city_with_coordinates() {
        let result = Cli::try_parse_from([
            "weather-page", "show", "--city", "paris", "--lat", "1", "--lon", "2",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_units_parse() {
        let cli = Cli::try_parse_from(["weather-page", "show", "--units", "imperial"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Show {
                units: Some(Units::Imperial),
                ..
            }
        ));
    }
}
