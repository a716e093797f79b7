use crate::core::classifier::{ErrorCheck, RawResponse};
use crate::core::config::ExchangeConfig;
use crate::core::descriptor::Descriptor;
use crate::core::errors::{ErrorKind, ExchangeError};
use crate::core::kernel::{HttpRequest, PreparedRequest};
use crate::core::traits::Exchange;
use crate::core::types::{Balances, Market, Order, OrderBook, Ticker, Trade};
use crate::exchanges::liqui::{liqui_descriptor, Liqui};
use crate::exchanges::wex::{conversions, descriptor::wex_descriptor};
use crate::utils::safe::{is_truthy, safe_string};
use serde_json::Value;
use tracing::debug;

/// Reply to `ActiveOrders` when nothing is open
const NO_ORDERS: &str = "no orders";

/// WEX: liqui's protocol with its own ticker layout and error payloads
#[derive(Debug, Clone)]
pub struct Wex {
    parent: Liqui,
}

impl Wex {
    pub fn new(config: &ExchangeConfig) -> Result<Self, ExchangeError> {
        Ok(Self {
            parent: Liqui::with_layers(&[liqui_descriptor(), wex_descriptor()], config)?,
        })
    }

    pub fn public() -> Result<Self, ExchangeError> {
        Self::new(&ExchangeConfig::read_only())
    }

    pub fn has_credentials(&self) -> bool {
        self.parent.has_credentials()
    }
}

impl Exchange for Wex {
    fn describe(&self) -> &Descriptor {
        self.parent.describe()
    }

    fn sign(&self, prepared: PreparedRequest) -> Result<HttpRequest, ExchangeError> {
        self.parent.sign(prepared)
    }

    fn parse_ticker(&self, raw: &Value, market: Option<&Market>) -> Result<Ticker, ExchangeError> {
        conversions::parse_ticker(self.id(), raw, market)
    }

    fn parse_order_book(
        &self,
        raw: &Value,
        market: Option<&Market>,
    ) -> Result<OrderBook, ExchangeError> {
        self.parent.parse_order_book(raw, market)
    }

    fn parse_trade(&self, raw: &Value, market: Option<&Market>) -> Result<Trade, ExchangeError> {
        self.parent.parse_trade(raw, market)
    }

    fn parse_balance(&self, raw: &Value) -> Result<Balances, ExchangeError> {
        self.parent.parse_balance(raw)
    }

    fn parse_order(
        &self,
        id: &str,
        raw: &Value,
        market: Option<&Market>,
    ) -> Result<Order, ExchangeError> {
        self.parent.parse_order(id, raw, market)
    }

    fn parse_markets(&self, raw: &Value) -> Result<Vec<Market>, ExchangeError> {
        self.parent.parse_markets(raw)
    }

    /// Only 200 responses with a JSON object body are classified here; the
    /// rest goes to the default handler. Exact messages win over substring
    /// rules, and "no orders" is not an error at all.
    fn handle_errors(&self, response: &RawResponse) -> Result<ErrorCheck, ExchangeError> {
        if response.status != 200 {
            return Ok(ErrorCheck::Deferred);
        }
        if !response.body.starts_with('{') {
            return Ok(ErrorCheck::Deferred);
        }
        let Ok(payload) = serde_json::from_str::<Value>(&response.body) else {
            return Ok(ErrorCheck::Deferred);
        };
        let Some(success) = payload.get("success") else {
            return Ok(ErrorCheck::Passed);
        };
        if is_truthy(success) {
            return Ok(ErrorCheck::Passed);
        }

        let error = match safe_string(&payload, "error") {
            Some(error) if !error.is_empty() => error,
            _ => {
                return Err(ExchangeError::MalformedResponse {
                    exchange: self.id().to_string(),
                    body: response.body.clone(),
                })
            }
        };
        if error == NO_ORDERS {
            return Ok(ErrorCheck::Passed);
        }

        let policy = self.parent.policy();
        let kind = policy
            .match_exact(&error)
            .or_else(|| policy.match_broad(&error))
            .unwrap_or(ErrorKind::ExchangeError);

        debug!(exchange = %self.id(), %kind, error = %error, "classified error payload");
        Err(ExchangeError::classified(
            kind,
            format!("{} {}", self.id(), payload),
        ))
    }
}
