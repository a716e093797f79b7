use crate::core::config::ExchangeConfig;
use crate::core::errors::ExchangeError;
use crate::core::kernel::{ReqwestRest, RestClientBuilder, RestClientConfig};
use crate::core::traits::Exchange;
use crate::exchanges::liqui::{connector::LiquiConnector, Liqui};
use crate::utils::throttle::Throttled;
use std::sync::Arc;

/// Transport sized from the config's timeout and retry knobs
pub fn build_rest_client(
    exchange: &dyn Exchange,
    config: &ExchangeConfig,
) -> Result<ReqwestRest, ExchangeError> {
    let rest_config = RestClientConfig::new(exchange.id().to_string())
        .with_timeout(config.timeout_seconds)
        .with_max_retries(config.max_retries);
    RestClientBuilder::new(rest_config).build()
}

/// Connector for any liqui-family exchange value
pub fn build_connector_for(
    exchange: Arc<dyn Exchange>,
    config: &ExchangeConfig,
) -> Result<LiquiConnector<ReqwestRest>, ExchangeError> {
    let rest = build_rest_client(exchange.as_ref(), config)?;
    Ok(LiquiConnector::new(exchange, rest))
}

/// Same, with requests spaced out by the descriptor's `rateLimit`
pub fn build_throttled_connector_for(
    exchange: Arc<dyn Exchange>,
    config: &ExchangeConfig,
) -> Result<LiquiConnector<Throttled<ReqwestRest>>, ExchangeError> {
    let rest = build_rest_client(exchange.as_ref(), config)?;
    let throttled = Throttled::from_descriptor(rest, exchange.describe());
    Ok(LiquiConnector::new(exchange, throttled))
}

pub fn build_connector(
    config: &ExchangeConfig,
) -> Result<LiquiConnector<ReqwestRest>, ExchangeError> {
    build_connector_for(Arc::new(Liqui::new(config)?), config)
}
