pub mod config;
pub mod engine;
pub mod grid;
pub mod metrics;
pub mod overlay;
pub mod sweep;
pub mod trajectory;
