//! Stock screener command-line dashboard

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use common::ValueRange;
use market_connector::MarketDataGateway;
use screener::{DEFAULT_LOG_DIRECTIVES, Dashboard, FilterCriteria, Universe, load_config, render};
use services_common::{ScreenerConfig, init_tracing};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "screener")]
#[command(about = "Screen stocks and compare return and risk metrics")]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Read market data from prices.csv and attributes.csv in DIR
    #[arg(long, global = true, value_name = "DIR")]
    offline: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the stocks passing the filters
    Screen {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Compare metrics and cumulative change of selected labels
    Compare {
        #[command(flatten)]
        filters: FilterArgs,

        /// Ticker or index label to compare; repeat for several (default: the index labels)
        #[arg(long = "select", value_name = "LABEL")]
        select: Vec<String>,

        /// Write the chart as JSON
        #[arg(long, value_name = "FILE")]
        chart_json: Option<PathBuf>,

        /// Write the chart as CSV, one column per label
        #[arg(long, value_name = "FILE")]
        chart_csv: Option<PathBuf>,
    },
    /// Print the configured tickers and index labels
    Universe,
}

/// Filter overrides; anything unset keeps the configured default
#[derive(Args)]
struct FilterArgs {
    /// Minimum market cap in billions
    #[arg(long)]
    min_cap: Option<f64>,
    /// Maximum market cap in billions
    #[arg(long)]
    max_cap: Option<f64>,
    /// Minimum price-to-book ratio
    #[arg(long)]
    min_pb: Option<f64>,
    /// Maximum price-to-book ratio
    #[arg(long)]
    max_pb: Option<f64>,
    /// Minimum dividend yield in percent
    #[arg(long)]
    min_yield: Option<f64>,
    /// Maximum dividend yield in percent
    #[arg(long)]
    max_yield: Option<f64>,
    /// Sector to keep; repeat for several, or `All`
    #[arg(long = "sector", value_name = "SECTOR")]
    sectors: Vec<String>,
}

impl FilterArgs {
    fn criteria(&self, config: &ScreenerConfig) -> FilterCriteria {
        let defaults = FilterCriteria::from(&config.filters);
        let range = |min: Option<f64>, max: Option<f64>, default: ValueRange| {
            ValueRange::new(min.unwrap_or(default.min), max.unwrap_or(default.max))
        };

        FilterCriteria {
            market_cap_billions: range(self.min_cap, self.max_cap, defaults.market_cap_billions),
            price_to_book: range(self.min_pb, self.max_pb, defaults.price_to_book),
            dividend_yield_pct: range(self.min_yield, self.max_yield, defaults.dividend_yield_pct),
            sectors: if self.sectors.is_empty() {
                defaults.sectors
            } else {
                self.sectors.clone()
            },
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(DEFAULT_LOG_DIRECTIVES)?;

    let config =
        load_config(cli.config.as_deref(), cli.offline).context("Failed to load configuration")?;

    if matches!(cli.command, Commands::Universe) {
        print!("{}", render::render_universe(&Universe::from(&config.universe)));
        return Ok(());
    }

    let gateway = market_connector::connect(&config.gateway)
        .context("Failed to open market data source")?;
    let dashboard = Dashboard::new(gateway, &config);
    info!(
        equities = dashboard.universe().equities().len(),
        indices = dashboard.universe().indices().len(),
        lookback = %config.universe.lookback,
        "Session started"
    );

    let outcome = run(&dashboard, &config, cli.command).await;
    dashboard.end_session();
    outcome
}

async fn run<G: MarketDataGateway>(
    dashboard: &Dashboard<G>,
    config: &ScreenerConfig,
    command: Commands,
) -> Result<()> {
    match command {
        Commands::Screen { filters } => {
            let screening = dashboard.screen(&filters.criteria(config)).await;
            print!("{}", render::render_summary(&screening));
        }
        Commands::Compare {
            filters,
            select,
            chart_json,
            chart_csv,
        } => {
            let criteria = filters.criteria(config);
            let comparison = dashboard.compare(&criteria, &select).await?;
            print!("{}", render::render_metrics(&comparison.report));
            comparison.export(chart_json.as_deref(), chart_csv.as_deref())?;
        }
        Commands::Universe => {
            print!("{}", render::render_universe(dashboard.universe()));
        }
    }
    Ok(())
}
