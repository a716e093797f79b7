use crate::core::classifier::{ErrorCheck, ErrorPolicy, RawResponse};
use crate::core::config::ExchangeConfig;
use crate::core::descriptor::{base_descriptor, Descriptor};
use crate::core::errors::{ErrorKind, ExchangeError};
use crate::core::kernel::{HttpRequest, PreparedRequest, RequestBuilder};
use crate::core::traits::Exchange;
use crate::core::types::{Balances, Market, Order, OrderBook, Ticker, Trade};
use crate::exchanges::liqui::{conversions, descriptor::liqui_descriptor, signer::LiquiSigner};
use crate::utils::safe::{is_truthy, safe_string};
use secrecy::Secret;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// The liqui protocol family's parent exchange
#[derive(Debug, Clone)]
pub struct Liqui {
    descriptor: Arc<Descriptor>,
    policy: Arc<ErrorPolicy>,
    signer: Option<Arc<LiquiSigner>>,
}

impl Liqui {
    pub fn new(config: &ExchangeConfig) -> Result<Self, ExchangeError> {
        Self::with_layers(&[liqui_descriptor()], config)
    }

    /// Client for public endpoints only
    pub fn public() -> Result<Self, ExchangeError> {
        Self::new(&ExchangeConfig::read_only())
    }

    /// Build a family member from its descriptor layers, root-most first.
    ///
    /// The base defaults go underneath and the per-instance overrides from
    /// `config` on top.
    pub fn with_layers(layers: &[Value], config: &ExchangeConfig) -> Result<Self, ExchangeError> {
        let base = base_descriptor();
        let descriptor = Descriptor::from_layers(
            std::iter::once(&base)
                .chain(layers)
                .chain(config.descriptor_overrides.as_ref()),
        );
        let policy = ErrorPolicy::from_descriptor(&descriptor)?;
        let signer = config.has_credentials().then(|| {
            Arc::new(LiquiSigner::new(
                config.api_key().to_string(),
                Secret::new(config.secret_key().to_string()),
            ))
        });

        Ok(Self {
            descriptor: Arc::new(descriptor),
            policy: Arc::new(policy),
            signer,
        })
    }

    pub fn policy(&self) -> &ErrorPolicy {
        &self.policy
    }

    pub fn has_credentials(&self) -> bool {
        self.signer.is_some()
    }

    fn feedback(&self, payload: &Value) -> String {
        format!("{} {}", self.id(), payload)
    }

    /// `success` as the trade API means it: "true"/"1" strings are truthy,
    /// other strings are not
    fn succeeded(success: &Value) -> bool {
        match success {
            Value::String(s) => s == "true" || s == "1",
            other => is_truthy(other),
        }
    }
}

impl Exchange for Liqui {
    fn describe(&self) -> &Descriptor {
        &self.descriptor
    }

    fn sign(&self, prepared: PreparedRequest) -> Result<HttpRequest, ExchangeError> {
        if !prepared.requires_auth {
            let url = RequestBuilder::new(&self.descriptor).versioned_url(&prepared)?;
            return Ok(HttpRequest {
                method: prepared.method,
                url,
                headers: HashMap::new(),
                body: None,
            });
        }

        let signer = self.signer.as_ref().ok_or_else(|| {
            ExchangeError::AuthError(format!(
                "{} requires apiKey and secret for {}",
                self.id(),
                prepared.endpoint
            ))
        })?;
        let url = self.descriptor.api_base(prepared.tier)?;
        signer.sign(&prepared, url)
    }

    fn parse_ticker(&self, raw: &Value, market: Option<&Market>) -> Result<Ticker, ExchangeError> {
        conversions::parse_ticker(self.id(), raw, market)
    }

    fn parse_order_book(
        &self,
        raw: &Value,
        market: Option<&Market>,
    ) -> Result<OrderBook, ExchangeError> {
        conversions::parse_order_book(self.id(), raw, market)
    }

    fn parse_trade(&self, raw: &Value, market: Option<&Market>) -> Result<Trade, ExchangeError> {
        conversions::parse_trade(self.id(), raw, market)
    }

    fn parse_balance(&self, raw: &Value) -> Result<Balances, ExchangeError> {
        conversions::parse_balance(&self.descriptor, raw)
    }

    fn parse_order(
        &self,
        id: &str,
        raw: &Value,
        market: Option<&Market>,
    ) -> Result<Order, ExchangeError> {
        Ok(conversions::parse_order(id, raw, market))
    }

    fn parse_markets(&self, raw: &Value) -> Result<Vec<Market>, ExchangeError> {
        conversions::parse_markets(&self.descriptor, raw)
    }

    /// Classify `{"success": 0, ...}` payloads by code, exact message, then
    /// substring. The HTTP status is left to the default handler.
    fn handle_errors(&self, response: &RawResponse) -> Result<ErrorCheck, ExchangeError> {
        let body = response.body.as_str();
        if body.len() < 2 || !(body.starts_with('{') || body.starts_with('[')) {
            return Ok(ErrorCheck::Deferred);
        }
        let Ok(payload) = serde_json::from_str::<Value>(body) else {
            return Ok(ErrorCheck::Deferred);
        };
        let Some(success) = payload.get("success") else {
            return Ok(ErrorCheck::Passed);
        };
        if Self::succeeded(success) {
            return Ok(ErrorCheck::Passed);
        }

        let feedback = self.feedback(&payload);
        let kind = safe_string(&payload, "code")
            .and_then(|code| self.policy.match_code(&code))
            .or_else(|| {
                let message = safe_string(&payload, "error")?;
                self.policy
                    .match_exact(&message)
                    .or_else(|| self.policy.match_broad(&message))
            })
            .unwrap_or(ErrorKind::ExchangeError);

        debug!(exchange = %self.id(), %kind, "classified error payload");
        Err(ExchangeError::classified(kind, feedback))
    }
}
