use crate::core::errors::{ErrorKind, ExchangeError};
use crate::core::kernel::{Params, RestClient};
use crate::core::traits::MarketDataSource;
use crate::core::types::{Market, OrderBook, Ticker, Trade};
use crate::exchanges::liqui::rest::LiquiRest;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use tracing::instrument;

/// Longest `pair` path segment the public API accepts
const MAX_PAIRS_LENGTH: usize = 2048;

/// Liqui-family market data implementation
pub struct MarketData<R: RestClient> {
    rest: LiquiRest<R>,
}

impl<R: RestClient + Clone> MarketData<R> {
    pub fn new(rest: &LiquiRest<R>) -> Self {
        Self { rest: rest.clone() }
    }
}

fn pair_params(market: &Market, limit: Option<u32>) -> Params {
    let mut params = Params::new();
    params.insert("pair".to_string(), json!(market.id));
    if let Some(limit) = limit {
        params.insert("limit".to_string(), json!(limit));
    }
    params
}

#[async_trait]
impl<R: RestClient> MarketDataSource for MarketData<R> {
    #[instrument(skip(self), fields(exchange = %self.rest.id()))]
    async fn fetch_markets(&self) -> Result<Vec<Market>, ExchangeError> {
        let info = self.rest.public_get("info", Params::new()).await?;
        self.rest.exchange().parse_markets(&info)
    }

    #[instrument(skip(self, market), fields(exchange = %self.rest.id(), symbol = %market.symbol))]
    async fn fetch_ticker(&self, market: &Market) -> Result<Ticker, ExchangeError> {
        let response = self
            .rest
            .public_get("ticker/{pair}", pair_params(market, None))
            .await?;
        let raw = self.rest.member(&response, &market.id)?;
        self.rest.exchange().parse_ticker(raw, Some(market))
    }

    #[instrument(skip(self, markets), fields(exchange = %self.rest.id(), count = markets.len()))]
    async fn fetch_tickers(
        &self,
        markets: &[Market],
    ) -> Result<BTreeMap<String, Ticker>, ExchangeError> {
        self.rest.require("fetchTickers")?;
        if markets.is_empty() {
            return Err(ExchangeError::InvalidParameters(
                "fetch_tickers needs at least one market".to_string(),
            ));
        }

        let ids = markets
            .iter()
            .map(|m| m.id.as_str())
            .collect::<Vec<_>>()
            .join("-");
        if ids.len() > MAX_PAIRS_LENGTH {
            return Err(ExchangeError::classified(
                ErrorKind::ExchangeError,
                format!(
                    "{} has {} symbols exceeding max URL length, request a smaller list of markets",
                    self.rest.id(),
                    markets.len()
                ),
            ));
        }

        let mut params = Params::new();
        params.insert("pair".to_string(), Value::String(ids));
        let response = self.rest.public_get("ticker/{pair}", params).await?;

        let mut tickers = BTreeMap::new();
        for market in markets {
            let raw = self.rest.member(&response, &market.id)?;
            let ticker = self.rest.exchange().parse_ticker(raw, Some(market))?;
            tickers.insert(market.symbol.clone(), ticker);
        }
        Ok(tickers)
    }

    #[instrument(skip(self, market), fields(exchange = %self.rest.id(), symbol = %market.symbol))]
    async fn fetch_order_book(
        &self,
        market: &Market,
        limit: Option<u32>,
    ) -> Result<OrderBook, ExchangeError> {
        let response = self
            .rest
            .public_get("depth/{pair}", pair_params(market, limit))
            .await?;
        let raw = response.get(&market.id).ok_or_else(|| {
            ExchangeError::classified(
                ErrorKind::ExchangeError,
                format!(
                    "{} {} order book is empty or not available",
                    self.rest.id(),
                    market.symbol
                ),
            )
        })?;
        self.rest.exchange().parse_order_book(raw, Some(market))
    }

    #[instrument(skip(self, market), fields(exchange = %self.rest.id(), symbol = %market.symbol))]
    async fn fetch_trades(
        &self,
        market: &Market,
        limit: Option<u32>,
    ) -> Result<Vec<Trade>, ExchangeError> {
        let response = self
            .rest
            .public_get("trades/{pair}", pair_params(market, limit))
            .await?;
        // an empty list instead of a mapping when the pair has no trades
        if response.as_array().is_some_and(Vec::is_empty) {
            return Ok(Vec::new());
        }

        let raw = self.rest.member(&response, &market.id)?;
        raw.as_array()
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(|trade| self.rest.exchange().parse_trade(trade, Some(market)))
            .collect()
    }
}
