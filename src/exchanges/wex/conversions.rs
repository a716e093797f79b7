use crate::core::errors::ExchangeError;
use crate::core::types::{iso8601, Market, Ticker};
use crate::exchanges::liqui::conversions::ticker_timestamp;
use crate::utils::safe::safe_decimal;
use serde_json::Value;

/// Wex swaps liqui's sides: `sell` is the best bid and `buy` the best ask.
/// Close is not reported separately from last.
pub fn parse_ticker(
    exchange_id: &str,
    raw: &Value,
    market: Option<&Market>,
) -> Result<Ticker, ExchangeError> {
    let timestamp = ticker_timestamp(exchange_id, raw)?;

    Ok(Ticker {
        symbol: market.map(|m| m.symbol.clone()),
        timestamp,
        datetime: iso8601(timestamp),
        high: safe_decimal(raw, "high"),
        low: safe_decimal(raw, "low"),
        bid: safe_decimal(raw, "sell"),
        ask: safe_decimal(raw, "buy"),
        vwap: None,
        open: None,
        close: None,
        first: None,
        last: safe_decimal(raw, "last"),
        change: None,
        percentage: None,
        average: safe_decimal(raw, "avg"),
        base_volume: safe_decimal(raw, "vol_cur"),
        quote_volume: safe_decimal(raw, "vol"),
        info: raw.clone(),
    })
}
