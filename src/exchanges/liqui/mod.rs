pub mod builder;
pub mod connector;
pub mod conversions;
pub mod descriptor;
pub mod exchange;
pub mod rest;
pub mod signer;

pub use builder::{build_connector, build_connector_for, build_throttled_connector_for};
pub use connector::{Account, LiquiConnector, MarketData, Trading};
pub use descriptor::liqui_descriptor;
pub use exchange::Liqui;
pub use rest::LiquiRest;
pub use signer::LiquiSigner;
