use anyhow::Context;
use lotusx_liqui::core::config::ExchangeConfig;
use lotusx_liqui::core::traits::MarketDataSource;
use lotusx_liqui::ExchangeRegistry;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let exchange_id = std::env::args().nth(1).unwrap_or_else(|| "wex".to_string());
    let registry = ExchangeRegistry::with_defaults();

    // Credentials are optional; public endpoints work without them
    let config =
        ExchangeConfig::from_env(&exchange_id).unwrap_or_else(|_| ExchangeConfig::read_only());
    let connector = registry
        .build_connector(&exchange_id, &config)
        .with_context(|| format!("building {} connector", exchange_id))?;

    info!("Fetching markets...");
    let markets = connector.fetch_markets().await.context("fetching markets")?;
    info!("Found {} markets", markets.len());

    for market in markets.iter().filter(|m| m.active).take(5) {
        match connector.fetch_ticker(market).await {
            Ok(ticker) => info!(
                "{}: last={:?} bid={:?} ask={:?} volume={:?}",
                market.symbol, ticker.last, ticker.bid, ticker.ask, ticker.base_volume
            ),
            Err(e) => warn!("Error fetching {} ticker: {}", market.symbol, e),
        }
    }

    Ok(())
}
