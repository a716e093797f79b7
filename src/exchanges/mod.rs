pub mod liqui;
pub mod wex;
