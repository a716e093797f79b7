use crate::core::config::ExchangeConfig;
use crate::core::errors::ExchangeError;
use crate::core::kernel::ReqwestRest;
use crate::exchanges::liqui::{build_connector_for, build_throttled_connector_for, LiquiConnector};
use crate::exchanges::wex::Wex;
use crate::utils::throttle::Throttled;
use std::sync::Arc;

/// Wex speaks the liqui protocol, so it runs on the liqui connector
pub type WexConnector<R> = LiquiConnector<R>;

pub fn build_connector(
    config: &ExchangeConfig,
) -> Result<WexConnector<ReqwestRest>, ExchangeError> {
    build_connector_for(Arc::new(Wex::new(config)?), config)
}

pub fn build_throttled_connector(
    config: &ExchangeConfig,
) -> Result<WexConnector<Throttled<ReqwestRest>>, ExchangeError> {
    build_throttled_connector_for(Arc::new(Wex::new(config)?), config)
}
