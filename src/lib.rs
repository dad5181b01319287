pub mod cache;
pub mod config;
pub mod context;
mod error;

pub use cache::Cache;
pub use config::{
    Bind, BindError, ConfigError, Environment, LoadReport, PhaseOutcome, Resolver, Schema,
};
pub use context::AppContext;
pub use error::Error;
