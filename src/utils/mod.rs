pub mod exchange_factory;
pub mod safe;
pub mod throttle;
