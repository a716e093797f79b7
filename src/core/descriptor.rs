//! Declarative exchange descriptors.
//!
//! A descriptor is a plain JSON tree. Exchanges inherit from each other by
//! folding [`deep_extend`] over their ancestor chain once at construction
//! time; the result is immutable and shared behind an `Arc`.
//!
//! Nothing is validated while merging. Typed accessors below return
//! [`ExchangeError::ConfigurationError`] when the part of the tree they read is
//! missing or has the wrong shape.

use crate::core::errors::ExchangeError;
use reqwest::Method;
use rust_decimal::Decimal;
use serde_json::{json, Map, Value};
use std::fmt;

use crate::utils::safe::value_to_decimal;

/// Access class of an endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Public,
    Private,
}

impl Tier {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value of a `has` flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Supported,
    Emulated,
    Unsupported,
}

impl Capability {
    pub const fn is_available(&self) -> bool {
        !matches!(self, Self::Unsupported)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradingFees {
    pub maker: Option<Decimal>,
    pub taker: Option<Decimal>,
}

/// Recursively merge `overrides` over `base`.
///
/// Mappings present on both sides are merged key by key; any other pair of
/// values is resolved in favour of `overrides`. Keys only in `base` survive.
pub fn deep_extend(base: &Value, overrides: &Value) -> Value {
    match (base, overrides) {
        (Value::Object(base_map), Value::Object(override_map)) => {
            let mut merged = base_map.clone();
            for (key, override_value) in override_map {
                let value = match merged.get(key) {
                    Some(base_value) => deep_extend(base_value, override_value),
                    None => override_value.clone(),
                };
                merged.insert(key.clone(), value);
            }
            Value::Object(merged)
        }
        (_, other) => other.clone(),
    }
}

/// Fold [`deep_extend`] left to right over `layers`, root ancestor first
pub fn deep_extend_all<'a, I>(layers: I) -> Value
where
    I: IntoIterator<Item = &'a Value>,
{
    layers
        .into_iter()
        .fold(Value::Object(Map::new()), |acc, layer| deep_extend(&acc, layer))
}

/// Defaults every exchange descriptor starts from
pub fn base_descriptor() -> Value {
    json!({
        "id": null,
        "name": null,
        "countries": [],
        "version": null,
        "rateLimit": 2000,
        "has": {
            "CORS": false,
            "publicAPI": true,
            "privateAPI": true,
            "cancelOrder": true,
            "createOrder": true,
            "createMarketOrder": true,
            "fetchBalance": true,
            "fetchMarkets": true,
            "fetchTicker": true,
            "fetchTickers": false,
            "fetchOrderBook": true,
            "fetchOrderBooks": false,
            "fetchTrades": true,
            "fetchOrder": false,
            "fetchOrders": false,
            "fetchOpenOrders": false,
            "fetchClosedOrders": false,
            "fetchMyTrades": false,
            "fetchDepositAddress": false,
            "withdraw": false
        },
        "urls": {},
        "api": {},
        "fees": {
            "trading": {
                "tierBased": false,
                "percentage": true
            },
            "funding": {
                "tierBased": false,
                "percentage": false,
                "withdraw": {},
                "deposit": {}
            }
        },
        "commonCurrencies": {
            "XBT": "BTC",
            "BCC": "BCH",
            "DRK": "DASH"
        },
        "exceptions": {
            "messages": {},
            "codes": {},
            "broad": []
        }
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct Descriptor {
    tree: Value,
}

impl Descriptor {
    pub fn new(tree: Value) -> Self {
        Self { tree }
    }

    /// Build a descriptor by folding layers over the ancestor chain
    pub fn from_layers<'a, I>(layers: I) -> Self
    where
        I: IntoIterator<Item = &'a Value>,
    {
        Self::new(deep_extend_all(layers))
    }

    /// A new descriptor with `overrides` deep-merged on top of this one
    #[must_use]
    pub fn extend(&self, overrides: &Value) -> Self {
        Self::new(deep_extend(&self.tree, overrides))
    }

    pub fn tree(&self) -> &Value {
        &self.tree
    }

    /// Look up a dotted path such as `urls.api.public`
    pub fn get(&self, path: &str) -> Option<&Value> {
        path.split('.')
            .try_fold(&self.tree, |node, segment| node.get(segment))
    }

    fn require_str(&self, path: &str) -> Result<&str, ExchangeError> {
        self.get(path).and_then(Value::as_str).ok_or_else(|| {
            ExchangeError::ConfigurationError(format!(
                "descriptor is missing string value '{}'",
                path
            ))
        })
    }

    pub fn id(&self) -> Result<&str, ExchangeError> {
        self.require_str("id")
    }

    pub fn name(&self) -> Result<&str, ExchangeError> {
        self.require_str("name")
    }

    pub fn version(&self) -> Result<&str, ExchangeError> {
        self.require_str("version")
    }

    /// Countries accept either a single code or a list of codes
    pub fn countries(&self) -> Vec<String> {
        match self.get("countries") {
            Some(Value::String(code)) => vec![code.clone()],
            Some(Value::Array(codes)) => codes
                .iter()
                .filter_map(|code| code.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Minimum milliseconds between requests the exchange asks for
    pub fn rate_limit(&self) -> Option<u64> {
        self.get("rateLimit").and_then(Value::as_u64)
    }

    pub fn capability(&self, name: &str) -> Capability {
        match self.get("has").and_then(|has| has.get(name)) {
            Some(Value::Bool(true)) => Capability::Supported,
            Some(Value::String(s)) if s == "emulated" => Capability::Emulated,
            _ => Capability::Unsupported,
        }
    }

    pub fn api_base(&self, tier: Tier) -> Result<&str, ExchangeError> {
        self.urls_api()?
            .get(tier.as_str())
            .and_then(Value::as_str)
            .ok_or_else(|| {
                ExchangeError::ConfigurationError(format!(
                    "descriptor has no base url for the {} tier",
                    tier
                ))
            })
    }

    fn urls_api(&self) -> Result<&Value, ExchangeError> {
        self.get("urls.api").ok_or_else(|| {
            ExchangeError::ConfigurationError("descriptor is missing urls.api".to_string())
        })
    }

    /// Endpoint templates registered for `tier` and `method`
    pub fn endpoints(&self, tier: Tier, method: &Method) -> Result<Vec<&str>, ExchangeError> {
        let verb = method.as_str().to_lowercase();
        let Some(node) = self
            .tree
            .get("api")
            .and_then(|api| api.get(tier.as_str()))
            .and_then(|per_tier| per_tier.get(verb.as_str()))
        else {
            return Ok(Vec::new());
        };

        let list = node.as_array().ok_or_else(|| {
            ExchangeError::ConfigurationError(format!(
                "api.{}.{} must be a list of endpoint templates",
                tier, verb
            ))
        })?;

        list.iter()
            .map(|entry| {
                entry.as_str().ok_or_else(|| {
                    ExchangeError::ConfigurationError(format!(
                        "api.{}.{} contains a non-string entry: {}",
                        tier, verb, entry
                    ))
                })
            })
            .collect()
    }

    pub fn has_endpoint(&self, tier: Tier, method: &Method, endpoint: &str) -> bool {
        self.endpoints(tier, method)
            .map(|list| list.contains(&endpoint))
            .unwrap_or(false)
    }

    pub fn trading_fees(&self) -> TradingFees {
        TradingFees {
            maker: self.get("fees.trading.maker").and_then(value_to_decimal),
            taker: self.get("fees.trading.taker").and_then(value_to_decimal),
        }
    }

    pub fn withdraw_fee(&self, code: &str) -> Option<Decimal> {
        self.get("fees.funding.withdraw")
            .and_then(|table| table.get(code))
            .and_then(value_to_decimal)
    }

    /// Map an exchange currency code onto its common code (`DSH` -> `DASH`)
    pub fn common_currency(&self, code: &str) -> String {
        self.get("commonCurrencies")
            .and_then(|table| table.get(code))
            .and_then(Value::as_str)
            .map_or_else(|| code.to_string(), str::to_string)
    }
}
