use crate::core::classifier::{default_error_handler, ErrorCheck};
use crate::core::descriptor::Tier;
use crate::core::errors::{ErrorKind, ExchangeError};
use crate::core::kernel::{Params, RestClient};
use crate::core::traits::Exchange;
use reqwest::Method;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Runs one logical call end to end: build, send, classify, decode.
///
/// Shared by every member of the liqui family; the `Exchange` value decides
/// descriptor, signing and classification.
pub struct LiquiRest<R: RestClient> {
    exchange: Arc<dyn Exchange>,
    rest_client: R,
}

impl<R: RestClient + Clone> Clone for LiquiRest<R> {
    fn clone(&self) -> Self {
        Self {
            exchange: Arc::clone(&self.exchange),
            rest_client: self.rest_client.clone(),
        }
    }
}

impl<R: RestClient> LiquiRest<R> {
    pub fn new(exchange: Arc<dyn Exchange>, rest_client: R) -> Self {
        Self {
            exchange,
            rest_client,
        }
    }

    pub fn exchange(&self) -> &dyn Exchange {
        self.exchange.as_ref()
    }

    pub fn id(&self) -> &str {
        self.exchange.id()
    }

    /// Fail with `NotSupported` unless the descriptor advertises `capability`
    pub fn require(&self, capability: &str) -> Result<(), ExchangeError> {
        if self.exchange.describe().capability(capability).is_available() {
            Ok(())
        } else {
            Err(ExchangeError::NotSupported(format!(
                "{} does not support {}",
                self.id(),
                capability
            )))
        }
    }

    #[instrument(skip_all, fields(exchange = %self.id(), tier = %tier, endpoint = %endpoint))]
    pub async fn request(
        &self,
        tier: Tier,
        method: Method,
        endpoint: &str,
        params: Params,
    ) -> Result<Value, ExchangeError> {
        let request = self.exchange.build_request(tier, method, endpoint, params)?;
        let response = self.rest_client.execute(&request).await?;

        match self.exchange.handle_errors(&response)? {
            ErrorCheck::Deferred => {
                debug!(status = response.status, "response left to the default handler");
                return Err(default_error_handler(self.id(), &response));
            }
            ErrorCheck::Passed if !(200..300).contains(&response.status) => {
                return Err(default_error_handler(self.id(), &response));
            }
            ErrorCheck::Passed => {}
        }

        serde_json::from_str(&response.body).map_err(|_| ExchangeError::BadResponse {
            exchange: self.id().to_string(),
            body: response.body.clone(),
        })
    }

    pub async fn public_get(&self, endpoint: &str, params: Params) -> Result<Value, ExchangeError> {
        self.request(Tier::Public, Method::GET, endpoint, params).await
    }

    /// Trade-API call; yields the `return` member, or `Null` when the reply
    /// carries none (an empty `ActiveOrders`, for one)
    pub async fn private_post(
        &self,
        endpoint: &str,
        params: Params,
    ) -> Result<Value, ExchangeError> {
        let mut payload = self
            .request(Tier::Private, Method::POST, endpoint, params)
            .await?;
        Ok(payload
            .get_mut("return")
            .map(Value::take)
            .unwrap_or(Value::Null))
    }

    /// `payload[key]`, or an error naming what was expected
    pub fn member<'a>(&self, payload: &'a Value, key: &str) -> Result<&'a Value, ExchangeError> {
        payload.get(key).ok_or_else(|| {
            ExchangeError::classified(
                ErrorKind::ExchangeError,
                format!("{} response has no '{}' entry: {}", self.id(), key, payload),
            )
        })
    }
}
