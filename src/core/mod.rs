pub mod classifier;
pub mod config;
pub mod descriptor;
pub mod errors;
pub mod kernel;
pub mod traits;
pub mod types;
