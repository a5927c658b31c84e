use anyhow::Context;
use clap::{Parser, Subcommand};
use forecast_core::{Config, ForecastService, WeatherQuery};
use tracing::info;

use crate::{interactive, server};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "forecast", version, about = "Weather forecasts with plain-language AI summaries")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve `GET /weather` over HTTP.
    Serve {
        /// Address to bind; overrides the config file.
        #[arg(long)]
        host: Option<String>,

        /// Port to bind; overrides the config file.
        #[arg(long)]
        port: Option<u16>,
    },

    /// Ask for a city, unit and day count, then print a summary.
    Ask,

    /// Show the summary for one city.
    Show {
        /// City name or any location the weather provider understands.
        city: String,

        /// "C" or "F"; Celsius if omitted.
        #[arg(long, short)]
        unit: Option<String>,

        /// Days to forecast, 1 to 10; 3 if omitted.
        #[arg(long, short)]
        days: Option<String>,

        /// Print the full weather data as JSON instead of just the summary.
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        // Credentials are checked here, before anything is served or prompted.
        let config = Config::load().context("Configuration error")?;
        let service = ForecastService::from_config(&config)?;

        match self.command {
            Command::Serve { host, port } => {
                let host = host.unwrap_or_else(|| config.settings.server.host.clone());
                let port = port.unwrap_or(config.settings.server.port);
                server::serve(service, &format!("{host}:{port}")).await
            }
            Command::Ask => interactive::run(&service).await,
            Command::Show { city, unit, days, json } => {
                let query = WeatherQuery::parse(Some(city.as_str()), unit.as_deref(), days.as_deref())?;
                info!(city = %query.city(), unit = %query.unit(), days = query.days(), "looking up");

                let report = service.report(&query).await?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                } else {
                    println!("{}", report.summary);
                }
                Ok(())
            }
        }
    }
}
