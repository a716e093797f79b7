use crate::core::config::ExchangeConfig;
use crate::core::errors::ExchangeError;
use crate::core::kernel::ReqwestRest;
use crate::core::traits::Exchange;
use crate::exchanges::liqui::{build_connector_for, Liqui, LiquiConnector};
use crate::exchanges::wex::Wex;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Builds an exchange value from per-instance configuration
pub type ExchangeConstructor = fn(&ExchangeConfig) -> Result<Arc<dyn Exchange>, ExchangeError>;

fn liqui(config: &ExchangeConfig) -> Result<Arc<dyn Exchange>, ExchangeError> {
    Ok(Arc::new(Liqui::new(config)?))
}

fn wex(config: &ExchangeConfig) -> Result<Arc<dyn Exchange>, ExchangeError> {
    Ok(Arc::new(Wex::new(config)?))
}

/// Exchange id -> constructor.
///
/// Built once at startup and handed to whoever needs to create clients;
/// there is no process-wide instance.
#[derive(Clone, Default)]
pub struct ExchangeRegistry {
    constructors: BTreeMap<String, ExchangeConstructor>,
}

impl ExchangeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every exchange this crate ships
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("liqui", liqui);
        registry.register("wex", wex);
        registry
    }

    /// Add or replace the constructor for `id`
    pub fn register(&mut self, id: &str, constructor: ExchangeConstructor) -> &mut Self {
        self.constructors.insert(id.to_string(), constructor);
        self
    }

    pub fn contains(&self, id: &str) -> bool {
        self.constructors.contains_key(id)
    }

    /// Registered ids in sorted order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().map(String::as_str)
    }

    pub fn create(
        &self,
        id: &str,
        config: &ExchangeConfig,
    ) -> Result<Arc<dyn Exchange>, ExchangeError> {
        let constructor = self.constructors.get(id).ok_or_else(|| {
            ExchangeError::ConfigurationError(format!("Unknown exchange: {}", id))
        })?;
        constructor(config)
    }

    /// Connector over the default transport for a liqui-family exchange
    pub fn build_connector(
        &self,
        id: &str,
        config: &ExchangeConfig,
    ) -> Result<LiquiConnector<ReqwestRest>, ExchangeError> {
        build_connector_for(self.create(id, config)?, config)
    }
}
