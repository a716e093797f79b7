use crate::core::{
    classifier::{ErrorCheck, RawResponse},
    descriptor::{Descriptor, Tier},
    errors::ExchangeError,
    kernel::{HttpRequest, Params, PreparedRequest, RequestBuilder},
    types::{
        Balances, DepositAddress, Market, Order, OrderBook, OrderSide, OrderType, Ticker, Trade,
        Withdrawal,
    },
};
use async_trait::async_trait;
use reqwest::Method;
use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::BTreeMap;

/// Descriptor-driven behaviour of one exchange.
///
/// Implementations are plain values. A child exchange wraps its parent and
/// forwards everything it does not override.
pub trait Exchange: Send + Sync {
    /// The fully merged descriptor
    fn describe(&self) -> &Descriptor;

    fn id(&self) -> &str {
        self.describe().id().unwrap_or("exchange")
    }

    /// Resolve a logical call and sign it when the tier requires it
    fn build_request(
        &self,
        tier: Tier,
        method: Method,
        endpoint: &str,
        params: Params,
    ) -> Result<HttpRequest, ExchangeError> {
        let prepared =
            RequestBuilder::new(self.describe()).prepare(tier, method, endpoint, params)?;
        self.sign(prepared)
    }

    /// Turn a prepared call into wire form: URL, headers and body
    fn sign(&self, prepared: PreparedRequest) -> Result<HttpRequest, ExchangeError>;

    fn parse_ticker(&self, raw: &Value, market: Option<&Market>) -> Result<Ticker, ExchangeError>;

    fn parse_order_book(
        &self,
        raw: &Value,
        market: Option<&Market>,
    ) -> Result<OrderBook, ExchangeError>;

    fn parse_trade(&self, raw: &Value, market: Option<&Market>) -> Result<Trade, ExchangeError>;

    fn parse_balance(&self, raw: &Value) -> Result<Balances, ExchangeError>;

    fn parse_order(
        &self,
        id: &str,
        raw: &Value,
        market: Option<&Market>,
    ) -> Result<Order, ExchangeError>;

    fn parse_markets(&self, raw: &Value) -> Result<Vec<Market>, ExchangeError>;

    /// Inspect a completed response before its body is parsed.
    ///
    /// `Ok(Deferred)` hands the response to the default handler.
    fn handle_errors(&self, response: &RawResponse) -> Result<ErrorCheck, ExchangeError>;
}

#[async_trait]
pub trait MarketDataSource {
    /// Get all available markets/trading pairs
    async fn fetch_markets(&self) -> Result<Vec<Market>, ExchangeError>;

    async fn fetch_ticker(&self, market: &Market) -> Result<Ticker, ExchangeError>;

    /// Tickers for several markets in one request, keyed by symbol
    async fn fetch_tickers(
        &self,
        markets: &[Market],
    ) -> Result<BTreeMap<String, Ticker>, ExchangeError>;

    async fn fetch_order_book(
        &self,
        market: &Market,
        limit: Option<u32>,
    ) -> Result<OrderBook, ExchangeError>;

    async fn fetch_trades(
        &self,
        market: &Market,
        limit: Option<u32>,
    ) -> Result<Vec<Trade>, ExchangeError>;
}

#[async_trait]
pub trait OrderPlacer {
    /// Place a new order
    async fn create_order(
        &self,
        market: &Market,
        order_type: OrderType,
        side: OrderSide,
        amount: Decimal,
        price: Option<Decimal>,
    ) -> Result<Order, ExchangeError>;

    async fn cancel_order(&self, id: &str) -> Result<Value, ExchangeError>;
}

#[async_trait]
pub trait AccountInfo {
    async fn fetch_balance(&self) -> Result<Balances, ExchangeError>;

    async fn fetch_order(&self, id: &str, market: Option<&Market>)
        -> Result<Order, ExchangeError>;

    async fn fetch_open_orders(&self, market: Option<&Market>) -> Result<Vec<Order>, ExchangeError>;

    async fn fetch_my_trades(
        &self,
        market: Option<&Market>,
        limit: Option<u32>,
    ) -> Result<Vec<Trade>, ExchangeError>;

    async fn fetch_deposit_address(&self, code: &str) -> Result<DepositAddress, ExchangeError>;

    async fn withdraw(
        &self,
        code: &str,
        amount: Decimal,
        address: &str,
    ) -> Result<Withdrawal, ExchangeError>;
}

// Composite trait for callers that need everything
#[async_trait]
pub trait ExchangeConnector: MarketDataSource + OrderPlacer + AccountInfo {}
