use clap::{Parser, Subcommand};

use adscope_adlibrary::{AdLibraryClient, ClientConfig};
use adscope_core::AppConfig;
use adscope_db::PgAdStore;
use adscope_pipeline::{run_collection, ClassifierConfig, RunOptions};

#[derive(Debug, Parser)]
#[command(name = "adscope-cli")]
#[command(about = "adscope command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one collection pass against the ad library.
    Run {
        /// Free-text search terms for the sweep.
        #[arg(long)]
        search_terms: Option<String>,
        /// Comma-separated country codes; defaults to the broad sweep preset.
        #[arg(long, value_delimiter = ',')]
        countries: Option<Vec<String>>,
        /// Override the configured page cap for this run.
        #[arg(long)]
        max_pages: Option<u32>,
    },
    /// Print stored-ad tier metrics.
    Metrics,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            search_terms,
            countries,
            max_pages,
        } => run(search_terms, countries, max_pages).await,
        Commands::Metrics => metrics().await,
    }
}

async fn run(
    search_terms: Option<String>,
    countries: Option<Vec<String>>,
    max_pages: Option<u32>,
) -> anyhow::Result<()> {
    let config = adscope_core::load_app_config()?;
    let pool = connect(&config).await?;

    let client = AdLibraryClient::new(&ClientConfig {
        base_url: config.adlib_base_url.clone(),
        access_token: config.adlib_access_token.clone(),
        timeout_secs: config.request_timeout_secs,
        requests_per_hour: config.requests_per_hour,
        request_delay_ms: config.request_delay_ms,
        min_days_running: config.min_days_running,
    })?;
    let store = PgAdStore::new(pool);

    let options = RunOptions {
        search_terms,
        countries,
        max_pages: max_pages.unwrap_or(config.max_pages_per_run),
        page_size: config.page_size,
    };

    let result = run_collection(
        &client,
        &store,
        &ClassifierConfig::from_app_config(&config),
        &options,
    )
    .await;

    println!("{}", serde_json::to_string_pretty(&result)?);
    if !result.success {
        anyhow::bail!("collection run failed");
    }
    Ok(())
}

async fn metrics() -> anyhow::Result<()> {
    let config = adscope_core::load_app_config()?;
    let pool = connect(&config).await?;

    let metrics = adscope_db::tier_metrics(&pool).await?;
    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "total_ads": metrics.total_ads,
            "gold_ads": metrics.gold_ads,
            "silver_ads": metrics.silver_ads,
            "bronze_ads": metrics.bronze_ads,
        }))?
    );
    Ok(())
}

async fn connect(config: &AppConfig) -> anyhow::Result<sqlx::PgPool> {
    let pool_config = adscope_db::PoolConfig::from_app_config(config);
    let pool = adscope_db::connect_pool(&config.database_url, pool_config).await?;
    adscope_db::run_migrations(&pool).await?;
    Ok(pool)
}
