use chrono::{DateTime, SecondsFormat};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// ISO8601 string with millisecond precision, e.g. `2017-07-14T02:40:00.000Z`
pub fn iso8601(timestamp_ms: i64) -> Option<String> {
    DateTime::from_timestamp_millis(timestamp_ms)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Precision {
    pub amount: Option<u32>,
    pub price: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MinMax {
    pub min: Option<Decimal>,
    pub max: Option<Decimal>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Limits {
    pub amount: MinMax,
    pub price: MinMax,
    pub cost: MinMax,
}

/// A trading pair as listed by an exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Market {
    /// Exchange-native id, e.g. `btc_usd`
    pub id: String,
    /// Unified symbol, e.g. `BTC/USD`
    pub symbol: String,
    pub base: String,
    pub quote: String,
    pub active: bool,
    pub precision: Precision,
    pub limits: Limits,
    pub maker: Option<Decimal>,
    pub taker: Option<Decimal>,
    pub info: Value,
}

impl Market {
    /// Minimal market, mostly useful for callers that already know the pair
    pub fn new(id: impl Into<String>, base: impl Into<String>, quote: impl Into<String>) -> Self {
        let base = base.into();
        let quote = quote.into();
        Self {
            id: id.into(),
            symbol: format!("{}/{}", base, quote),
            base,
            quote,
            active: true,
            precision: Precision::default(),
            limits: Limits::default(),
            maker: None,
            taker: None,
            info: Value::Null,
        }
    }
}

/// Markets indexed both by unified symbol and by exchange id.
///
/// Owned by the caller; the core never caches markets itself.
#[derive(Debug, Clone, Default)]
pub struct MarketIndex {
    by_symbol: BTreeMap<String, Market>,
    id_to_symbol: HashMap<String, String>,
}

impl MarketIndex {
    pub fn new(markets: Vec<Market>) -> Self {
        let mut index = Self::default();
        for market in markets {
            index.id_to_symbol.insert(market.id.clone(), market.symbol.clone());
            index.by_symbol.insert(market.symbol.clone(), market);
        }
        index
    }

    pub fn by_symbol(&self, symbol: &str) -> Option<&Market> {
        self.by_symbol.get(symbol)
    }

    pub fn by_id(&self, id: &str) -> Option<&Market> {
        self.id_to_symbol
            .get(id)
            .and_then(|symbol| self.by_symbol.get(symbol))
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.by_symbol.keys().map(String::as_str)
    }

    pub fn markets(&self) -> impl Iterator<Item = &Market> {
        self.by_symbol.values()
    }

    pub fn len(&self) -> usize {
        self.by_symbol.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_symbol.is_empty()
    }
}

/// Point-in-time market summary, identical in shape across exchanges.
///
/// Fields the exchange does not report are `None`, never zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticker {
    pub symbol: Option<String>,
    pub timestamp: i64,
    pub datetime: Option<String>,
    pub high: Option<Decimal>,
    pub low: Option<Decimal>,
    pub bid: Option<Decimal>,
    pub ask: Option<Decimal>,
    pub vwap: Option<Decimal>,
    pub open: Option<Decimal>,
    pub close: Option<Decimal>,
    pub first: Option<Decimal>,
    pub last: Option<Decimal>,
    pub change: Option<Decimal>,
    pub percentage: Option<Decimal>,
    pub average: Option<Decimal>,
    pub base_volume: Option<Decimal>,
    pub quote_volume: Option<Decimal>,
    pub info: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBookEntry {
    pub price: Decimal,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBook {
    pub symbol: Option<String>,
    /// Best (highest) bid first
    pub bids: Vec<OrderBookEntry>,
    /// Best (lowest) ask first
    pub asks: Vec<OrderBookEntry>,
    pub timestamp: Option<i64>,
    pub datetime: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Market,
    Limit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Open,
    Closed,
    Canceled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: Option<String>,
    pub order: Option<String>,
    pub timestamp: i64,
    pub datetime: Option<String>,
    pub symbol: Option<String>,
    pub order_type: Option<OrderType>,
    pub side: Option<OrderSide>,
    pub price: Option<Decimal>,
    pub amount: Option<Decimal>,
    pub cost: Option<Decimal>,
    pub info: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub symbol: Option<String>,
    pub timestamp: Option<i64>,
    pub datetime: Option<String>,
    pub order_type: OrderType,
    pub side: Option<OrderSide>,
    pub status: Option<OrderStatus>,
    pub price: Option<Decimal>,
    pub amount: Option<Decimal>,
    pub filled: Option<Decimal>,
    pub remaining: Option<Decimal>,
    pub cost: Option<Decimal>,
    pub info: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    pub free: Option<Decimal>,
    pub used: Option<Decimal>,
    pub total: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balances {
    /// Keyed by common currency code
    pub currencies: BTreeMap<String, Balance>,
    pub info: Value,
}

impl Balances {
    pub fn get(&self, code: &str) -> Option<&Balance> {
        self.currencies.get(code)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepositAddress {
    pub currency: String,
    pub address: String,
    pub info: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Withdrawal {
    pub id: Option<String>,
    pub info: Value,
}
