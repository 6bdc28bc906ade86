// crates/typed-results-server/src/lib.rs - reference server for typed results
pub mod app;
pub mod config;
pub mod handlers;

pub use app::{endpoint_registry, router, AppState, Respond, TypedHandler, TypedRouter};
pub use config::Config;
