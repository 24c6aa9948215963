//! countylens CLI - County health indicator dashboard backend.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use countylens::engine::{DEFAULT_BOTTOM_N, DEFAULT_TOP_N, RankedRegion};
use countylens::{CATEGORIES, Config, Dashboard, Dataset, DatasetStatus, QueryResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

const DEFAULT_CONFIG: &str = "countylens.toml";

#[derive(Parser)]
#[command(name = "countylens")]
#[command(version)]
#[command(about = "County health indicator dashboard: choropleth and ranked charts per indicator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to configuration file (defaults apply if countylens.toml is absent)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the dataset and serve the dashboard API
    Serve {
        /// Interface to bind (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (overrides config and PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Run one indicator query against the dataset and print it
    Query {
        /// Indicator name, exactly as listed by `catalog`
        indicator: String,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// List categories and their indicators
    Catalog,

    /// Validate configuration and dataset
    Validate,

    /// Show example configuration
    Example,
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("warning: a global tracing subscriber was already installed");
    }
}

fn print_example_config() {
    let example = r#"# countylens configuration file

[data]
# County boundaries with indicator columns; ${VAR} is expanded
path = "merged_nc.geojson"

[server]
host = "0.0.0.0"
# The PORT environment variable takes precedence
port = 8050
"#;
    println!("{example}");
}

fn load_config(path: Option<&Path>) -> countylens::Result<Config> {
    let (path, required) = match path {
        Some(p) => (p, true),
        None => (Path::new(DEFAULT_CONFIG), false),
    };
    let config = Config::load(path, required)?.resolve_env()?;
    Ok(config)
}

fn print_ranking(title: &str, regions: &[RankedRegion]) {
    println!("\n{title}");
    for (rank, region) in regions.iter().enumerate() {
        let marker = if region.imputed { " (imputed)" } else { "" };
        println!("  {:>2}. {:<24} {:>12.2}{marker}", rank + 1, region.county, region.value);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Commands::Example => {
            print_example_config();
        }

        Commands::Catalog => {
            for category in CATEGORIES {
                println!("{}", category.name);
                for indicator in category.indicators {
                    println!("  - {indicator}");
                }
            }
        }

        Commands::Validate => {
            let config = load_config(cli.config.as_deref()).context("Invalid configuration")?;
            info!("Configuration is valid");
            info!("  Data:   {}", config.data.path.display());
            info!("  Listen: {}", config.server.bind_addr());

            let dataset = Dataset::load(&config.data.path).context("Dataset is not usable")?;
            if let DatasetStatus::Ready {
                regions,
                indicators,
                key_scheme,
                ..
            } = dataset.status()
            {
                info!("  Regions:    {regions}");
                info!("  Indicators: {indicators}");
                info!("  Key scheme: {}", key_scheme.feature_id_key());
            }
        }

        Commands::Query { indicator, json } => {
            let config = load_config(cli.config.as_deref()).context("Invalid configuration")?;
            let dataset = Arc::new(Dataset::load_or_empty(&config.data.path));
            let dashboard = Dashboard::new(dataset);
            let result = dashboard.query(&indicator);

            if json {
                let out = serde_json::to_string_pretty(&result)
                    .context("Failed to serialize query result")?;
                println!("{out}");
                return Ok(());
            }

            match &result {
                QueryResult::Ready(q) => {
                    println!("=== {} ===", q.indicator);
                    println!("Regions:  {}", q.full_set.len());
                    println!("Imputed:  {} (median {:.2})", q.imputed, q.median);
                    println!("Range:    {:.2} .. {:.2}", q.value_range.min, q.value_range.max);
                    print_ranking(&format!("Top {DEFAULT_TOP_N}"), &q.top_set);
                    print_ranking(&format!("Bottom {DEFAULT_BOTTOM_N}"), &q.bottom_set);
                }
                QueryResult::NotFound { indicator } => {
                    println!("Indicator '{indicator}' not found in the data.");
                }
                QueryResult::InsufficientData { indicator } => {
                    println!("No values recorded for '{indicator}'.");
                }
            }
        }

        Commands::Serve { host, port } => {
            let mut config = load_config(cli.config.as_deref()).context("Invalid configuration")?;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }

            // Load completes before the listener binds; never reloaded.
            let dataset = Arc::new(Dataset::load_or_empty(&config.data.path));
            let dashboard = Arc::new(Dashboard::new(dataset));

            countylens::server::serve(dashboard, &config.server)
                .await
                .context("Dashboard server failed")?;
        }
    }

    Ok(())
}
