use crate::core::descriptor::Descriptor;
use crate::core::errors::ExchangeError;
use crate::core::types::{
    iso8601, Balance, Balances, DepositAddress, Limits, Market, MinMax, Order, OrderBook,
    OrderBookEntry, OrderSide, OrderStatus, OrderType, Precision, Ticker, Trade, Withdrawal,
};
use crate::utils::safe::{
    safe_decimal, safe_decimal2, safe_integer, safe_string, safe_string2, value_to_decimal,
};
use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::BTreeMap;

fn malformed(exchange_id: &str, what: &str, raw: &Value) -> ExchangeError {
    ExchangeError::DeserializationError(format!("{} {}: {}", exchange_id, what, raw))
}

/// Seconds-since-epoch field scaled to milliseconds.
///
/// Only JSON numbers are accepted; the wall clock is never substituted.
/// Values that do not fit in milliseconds are treated as absent.
pub fn seconds_to_millis(raw: &Value, key: &str) -> Option<i64> {
    raw.get(key)
        .filter(|value| value.is_number())
        .and_then(value_to_decimal)
        .and_then(|seconds| seconds.checked_mul(Decimal::from(1000)))
        .and_then(|millis| millis.to_i64())
}

/// `updated * 1000`, failing when the field is absent or not a number
pub fn ticker_timestamp(exchange_id: &str, raw: &Value) -> Result<i64, ExchangeError> {
    seconds_to_millis(raw, "updated")
        .ok_or_else(|| malformed(exchange_id, "ticker has no numeric 'updated' field", raw))
}

/// Liqui reports the best bid under `buy` and the best ask under `sell`
pub fn parse_ticker(
    exchange_id: &str,
    raw: &Value,
    market: Option<&Market>,
) -> Result<Ticker, ExchangeError> {
    let timestamp = ticker_timestamp(exchange_id, raw)?;
    let last = safe_decimal(raw, "last");

    Ok(Ticker {
        symbol: market.map(|m| m.symbol.clone()),
        timestamp,
        datetime: iso8601(timestamp),
        high: safe_decimal(raw, "high"),
        low: safe_decimal(raw, "low"),
        bid: safe_decimal(raw, "buy"),
        ask: safe_decimal(raw, "sell"),
        vwap: None,
        open: None,
        close: last,
        first: None,
        last,
        change: None,
        percentage: None,
        average: safe_decimal(raw, "avg"),
        base_volume: safe_decimal(raw, "vol_cur"),
        quote_volume: safe_decimal(raw, "vol"),
        info: raw.clone(),
    })
}

/// Markets from the `info` endpoint's `pairs` mapping
pub fn parse_markets(descriptor: &Descriptor, raw: &Value) -> Result<Vec<Market>, ExchangeError> {
    let exchange_id = descriptor.id()?;
    let pairs = raw
        .get("pairs")
        .and_then(Value::as_object)
        .ok_or_else(|| malformed(exchange_id, "info response has no 'pairs' mapping", raw))?;
    let fees = descriptor.trading_fees();

    pairs
        .iter()
        .map(|(id, details)| {
            let (base_id, quote_id) = id
                .split_once('_')
                .ok_or_else(|| malformed(exchange_id, "pair id is not base_quote", details))?;
            let base = descriptor.common_currency(&base_id.to_uppercase());
            let quote = descriptor.common_currency(&quote_id.to_uppercase());
            let decimals =
                safe_integer(details, "decimal_places").and_then(|d| u32::try_from(d).ok());

            Ok(Market {
                id: id.clone(),
                symbol: format!("{}/{}", base, quote),
                base,
                quote,
                active: safe_integer(details, "hidden") == Some(0),
                precision: Precision {
                    amount: decimals,
                    price: decimals,
                },
                limits: Limits {
                    amount: MinMax {
                        min: safe_decimal(details, "min_amount"),
                        max: safe_decimal(details, "max_amount"),
                    },
                    price: MinMax {
                        min: safe_decimal(details, "min_price"),
                        max: safe_decimal(details, "max_price"),
                    },
                    cost: MinMax {
                        min: safe_decimal(details, "min_total"),
                        max: None,
                    },
                },
                maker: fees.maker,
                taker: safe_decimal(details, "fee")
                    .map(|percent| percent / Decimal::from(100))
                    .or(fees.taker),
                info: details.clone(),
            })
        })
        .collect()
}

fn parse_book_side(
    exchange_id: &str,
    side: Option<&Value>,
) -> Result<Vec<OrderBookEntry>, ExchangeError> {
    let Some(levels) = side else {
        return Ok(Vec::new());
    };
    let levels = levels
        .as_array()
        .ok_or_else(|| malformed(exchange_id, "order book side is not a list", levels))?;

    levels
        .iter()
        .map(|level| match level.as_array().map(Vec::as_slice) {
            Some([price, amount, ..]) => Ok(OrderBookEntry {
                price: value_to_decimal(price)
                    .ok_or_else(|| malformed(exchange_id, "order book price", level))?,
                amount: value_to_decimal(amount)
                    .ok_or_else(|| malformed(exchange_id, "order book amount", level))?,
            }),
            _ => Err(malformed(exchange_id, "order book level", level)),
        })
        .collect()
}

/// Depth for a single pair; bids best-first (descending), asks ascending
pub fn parse_order_book(
    exchange_id: &str,
    raw: &Value,
    market: Option<&Market>,
) -> Result<OrderBook, ExchangeError> {
    let mut bids = parse_book_side(exchange_id, raw.get("bids"))?;
    let mut asks = parse_book_side(exchange_id, raw.get("asks"))?;
    bids.sort_by(|a, b| b.price.cmp(&a.price));
    asks.sort_by(|a, b| a.price.cmp(&b.price));

    Ok(OrderBook {
        symbol: market.map(|m| m.symbol.clone()),
        bids,
        asks,
        timestamp: None,
        datetime: None,
    })
}

fn parse_side(raw: &Value) -> Option<OrderSide> {
    match safe_string(raw, "type").as_deref() {
        Some("ask" | "sell") => Some(OrderSide::Sell),
        Some("bid" | "buy") => Some(OrderSide::Buy),
        _ => None,
    }
}

/// Public trades and private trade history share this shape
pub fn parse_trade(
    exchange_id: &str,
    raw: &Value,
    market: Option<&Market>,
) -> Result<Trade, ExchangeError> {
    let timestamp = seconds_to_millis(raw, "timestamp")
        .or_else(|| safe_integer(raw, "timestamp").and_then(|seconds| seconds.checked_mul(1000)))
        .ok_or_else(|| malformed(exchange_id, "trade has no timestamp", raw))?;
    let price = safe_decimal2(raw, "rate", "price");
    let amount = safe_decimal(raw, "amount");

    Ok(Trade {
        id: safe_string2(raw, "trade_id", "tid"),
        order: safe_string(raw, "order_id"),
        timestamp,
        datetime: iso8601(timestamp),
        symbol: market.map(|m| m.symbol.clone()),
        order_type: Some(OrderType::Limit),
        side: parse_side(raw),
        price,
        amount,
        cost: price.zip(amount).and_then(|(p, a)| p.checked_mul(a)),
        info: raw.clone(),
    })
}

/// Balances from the `getInfo` payload (already unwrapped from `return`).
///
/// Used and total are only known when the account has no open orders.
pub fn parse_balance(descriptor: &Descriptor, raw: &Value) -> Result<Balances, ExchangeError> {
    let exchange_id = descriptor.id()?;
    let funds = raw
        .get("funds")
        .and_then(Value::as_object)
        .ok_or_else(|| malformed(exchange_id, "balance has no 'funds' mapping", raw))?;
    let settled = safe_integer(raw, "open_orders") == Some(0);

    let currencies = funds
        .iter()
        .map(|(currency, amount)| {
            let free = value_to_decimal(amount);
            let balance = if settled {
                Balance {
                    free,
                    used: Some(Decimal::ZERO),
                    total: free,
                }
            } else {
                Balance {
                    free,
                    used: None,
                    total: None,
                }
            };
            (descriptor.common_currency(&currency.to_uppercase()), balance)
        })
        .collect::<BTreeMap<_, _>>();

    Ok(Balances {
        currencies,
        info: raw.clone(),
    })
}

pub fn parse_order_status(status: &str) -> Option<OrderStatus> {
    match status {
        "0" => Some(OrderStatus::Open),
        "1" => Some(OrderStatus::Closed),
        // 3: partially filled, then canceled
        "2" | "3" => Some(OrderStatus::Canceled),
        _ => None,
    }
}

/// An order from `OrderInfo` or `ActiveOrders`, keyed by `id` in the response
pub fn parse_order(id: &str, raw: &Value, market: Option<&Market>) -> Order {
    let timestamp = seconds_to_millis(raw, "timestamp_created")
        .or_else(|| {
            safe_integer(raw, "timestamp_created").and_then(|seconds| seconds.checked_mul(1000))
        });
    let price = safe_decimal(raw, "rate");
    let (amount, remaining) = match safe_decimal(raw, "start_amount") {
        Some(start) => (Some(start), safe_decimal(raw, "amount")),
        None => (None, safe_decimal(raw, "amount")),
    };
    let filled = amount.zip(remaining).and_then(|(a, r)| a.checked_sub(r));

    Order {
        id: id.to_string(),
        symbol: market.map(|m| m.symbol.clone()),
        timestamp,
        datetime: timestamp.and_then(iso8601),
        order_type: OrderType::Limit,
        side: parse_side(raw),
        status: safe_string(raw, "status").as_deref().and_then(parse_order_status),
        price,
        amount,
        filled,
        remaining,
        cost: price.zip(filled).and_then(|(p, f)| p.checked_mul(f)),
        info: raw.clone(),
    }
}

/// Result of a `Trade` call. An `order_id` of 0 means the order filled
/// immediately and `init_order_id` carries the real id.
pub fn parse_created_order(
    exchange_id: &str,
    raw: &Value,
    market: &Market,
    side: OrderSide,
    amount: Decimal,
    price: Decimal,
    timestamp: i64,
) -> Result<Order, ExchangeError> {
    let order_id = safe_string(raw, "order_id")
        .ok_or_else(|| malformed(exchange_id, "trade response has no order_id", raw))?;

    let (id, status, filled, remaining) = if order_id == "0" {
        let id = safe_string(raw, "init_order_id")
            .ok_or_else(|| malformed(exchange_id, "filled order has no init_order_id", raw))?;
        let filled = safe_decimal(raw, "received").unwrap_or(Decimal::ZERO);
        let remaining = safe_decimal(raw, "remains").unwrap_or(amount);
        (id, OrderStatus::Closed, filled, remaining)
    } else {
        (order_id, OrderStatus::Open, Decimal::ZERO, amount)
    };

    Ok(Order {
        id,
        symbol: Some(market.symbol.clone()),
        timestamp: Some(timestamp),
        datetime: iso8601(timestamp),
        order_type: OrderType::Limit,
        side: Some(side),
        status: Some(status),
        price: Some(price),
        amount: Some(amount),
        filled: Some(filled),
        remaining: Some(remaining),
        cost: price.checked_mul(filled),
        info: raw.clone(),
    })
}

pub fn parse_deposit_address(
    exchange_id: &str,
    code: &str,
    raw: &Value,
) -> Result<DepositAddress, ExchangeError> {
    let address = safe_string(raw, "address")
        .ok_or_else(|| malformed(exchange_id, "deposit address response has no address", raw))?;
    Ok(DepositAddress {
        currency: code.to_string(),
        address,
        info: raw.clone(),
    })
}

pub fn parse_withdrawal(raw: &Value) -> Withdrawal {
    Withdrawal {
        id: safe_string(raw, "tId"),
        info: raw.clone(),
    }
}
