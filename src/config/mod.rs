//! Configuration loading, resolution, and binding.

mod bind;
mod env;
mod error;
mod flatten;
mod loader;
mod resolver;

pub use bind::{bind, Bind, BindError, CoerceError, FieldOptions, FromConfigStr, Lookup, Schema};
pub use env::Environment;
pub use error::ConfigError;
pub use flatten::{flatten, FlatMap, Flattened, SkipReason, Skipped, Value};
pub use loader::{loader_for, EnvFileLoader, FormatLoader, JsonLoader, LoadOutcome, YamlLoader};
pub use resolver::{
    LoadReport, PhaseOutcome, Resolver, ResolverBuilder, DEFAULT_BASE_PATH, DEFAULT_ENV_NAME,
    ENV_NAME_VAR,
};
