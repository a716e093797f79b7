pub mod core;
pub mod exchanges;
pub mod utils;

pub use core::{
    classifier::{ErrorCheck, RawResponse},
    config::ExchangeConfig,
    descriptor::{Descriptor, Tier},
    errors::{ErrorKind, ExchangeError},
    traits::{AccountInfo, Exchange, ExchangeConnector, MarketDataSource, OrderPlacer},
    types::*,
};
pub use exchanges::liqui::{Liqui, LiquiConnector};
pub use exchanges::wex::{Wex, WexConnector};
pub use utils::exchange_factory::ExchangeRegistry;
