pub mod builder;
pub mod conversions;
pub mod descriptor;
pub mod exchange;

pub use builder::{build_connector, build_throttled_connector, WexConnector};
pub use descriptor::wex_descriptor;
pub use exchange::Wex;
