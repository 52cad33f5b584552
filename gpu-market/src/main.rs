use clap::{Parser, Subcommand};
use gpu_market::{
    presentation, Dashboard, Enricher, EnrichmentConfig, FetchConfig, FilterCriteria, MockExtractor, ProviderId,
    RssFeedSource, StaticPriceSource,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "gpu-market", version, about = "GPU cloud pricing and provider news dashboard")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Print the page as JSON instead of text
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    /// Timeout for each feed request, in seconds
    #[arg(long, global = true, default_value_t = 30)]
    feed_timeout: u64,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// GPU price comparison table
    Prices,

    /// Price table and latest provider news with keyword tags
    News {
        /// Articles per provider
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },

    /// LLM-enriched news with filters and frequency charts
    Structured {
        /// Articles per provider
        #[arg(long, default_value_t = 10)]
        limit: usize,

        /// Keep articles from these providers (key or name, repeatable)
        #[arg(long = "provider")]
        providers: Vec<String>,

        /// Keep articles carrying any of these tags
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// Keep articles located in any of these places
        #[arg(long = "location")]
        locations: Vec<String>,

        /// Keep articles mentioning any of these actors
        #[arg(long = "actor")]
        actors: Vec<String>,

        /// Maximum extraction calls in flight
        #[arg(long, default_value_t = 4)]
        concurrency: usize,

        /// Timeout for each extraction call, in seconds
        #[arg(long, default_value_t = 60)]
        extraction_timeout: u64,

        /// Use the offline heuristic extractor instead of the API
        #[arg(long, default_value_t = false)]
        mock: bool,
    },
}

fn print_page<T: Serialize>(page: &T, json: bool, text: impl FnOnce(&T) -> String) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(page)?);
    } else {
        print!("{}", text(page));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loads variables from .env if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let fetch_config = FetchConfig {
        timeout_seconds: cli.feed_timeout,
        ..FetchConfig::default()
    };

    let prices = Arc::new(StaticPriceSource);
    let feeds = Arc::new(RssFeedSource::new(fetch_config)?);
    let dashboard = Dashboard::new(prices, feeds);

    match cli.command {
        Command::Prices => {
            let view = presentation::price_table_view(&dashboard.price_table());
            print_page(&view, cli.json, presentation::render_price_table_text)?;
        }
        Command::News { limit } => {
            info!("Rendering overview with up to {} articles per provider", limit);
            let page = dashboard.overview(limit).await;
            print_page(&page, cli.json, presentation::render_overview_text)?;
        }
        Command::Structured {
            limit,
            providers,
            tags,
            locations,
            actors,
            concurrency,
            extraction_timeout,
            mock,
        } => {
            let config = EnrichmentConfig {
                max_in_flight: concurrency,
                call_timeout_seconds: extraction_timeout,
            };

            // Missing credentials stop here, before any feed is read
            let enricher = if mock {
                Enricher::new(Arc::new(MockExtractor::new("offline".to_string())), config)
            } else {
                Enricher::from_env(config).map_err(|e| {
                    error!("Structured news needs extraction credentials; set OPENAI_API_KEY or pass --mock");
                    e
                })?
            };
            info!("Using extractor: {}", enricher.extractor_name());

            // Accept provider keys as well as display names
            let providers = providers
                .into_iter()
                .map(|p| ProviderId::from_key(&p).map(|id| id.display_name().to_string()).unwrap_or(p));

            let criteria = FilterCriteria::new()
                .with_providers(providers)
                .with_tags(tags)
                .with_locations(locations)
                .with_actors(actors);

            let page = dashboard.with_enricher(enricher).structured_news(limit, &criteria).await?;
            print_page(&page, cli.json, presentation::render_structured_text)?;
        }
    }

    Ok(())
}
