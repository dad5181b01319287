//! Configuration resolution: file discovery, loading, and lookup.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::cache::Cache;

use super::bind::{bind, Bind, BindError, Lookup};
use super::env::Environment;
use super::flatten::Skipped;
use super::loader::{loader_for, LoadOutcome};
use super::ConfigError;

/// Environment variable that selects the active environment name.
pub const ENV_NAME_VAR: &str = "APP_ENV";

/// Environment name used when the selector variable is unset or empty.
pub const DEFAULT_ENV_NAME: &str = "local";

/// Directory loaded by [`Resolver::with_defaults`].
pub const DEFAULT_BASE_PATH: &str = "./configs";

/// Resolves configuration from a directory of files into a cache and an
/// environment overlay, and answers lookups against both.
///
/// Discovery runs in two phases, each loading the **first existing** file
/// among its candidates:
///
/// 1. the base files `.env`, `.json`, `.yaml`, in that order;
/// 2. `<env>.env`, `<env>.json`, `<env>.yaml`, where `<env>` comes from
///    the selector variable (default `"local"`).
///
/// Both phases always run; keys from the second overwrite the first, so
/// environment-specific files take precedence. A file that exists but
/// fails to load still ends its phase — the failure is logged and recorded
/// in the [`LoadReport`], never escalated.
///
/// ## Example
///
/// ```no_run
/// use layerconf::Resolver;
///
/// let mut resolver = Resolver::new();
/// resolver.load_configs("./configs")?;
///
/// let port = resolver.get_config_or("PORT", "8080");
/// # Ok::<(), layerconf::ConfigError>(())
/// ```
#[derive(Debug)]
pub struct Resolver {
    cache: Cache,
    env: Environment,
    env_name_var: String,
}

impl Resolver {
    /// Creates a resolver over a snapshot of the process environment,
    /// with nothing loaded yet.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Creates a new resolver builder.
    pub fn builder() -> ResolverBuilder {
        ResolverBuilder::new()
    }

    /// Creates a resolver and loads [`DEFAULT_BASE_PATH`], logging (not
    /// returning) any failure. The resolver is usable either way, answering
    /// lookups from whatever was loaded plus the environment snapshot.
    pub fn with_defaults() -> Self {
        let mut resolver = Self::new();
        if let Err(error) = resolver.load_configs(DEFAULT_BASE_PATH) {
            warn!(%error, "failed to load configuration from the default directory");
        }
        resolver
    }

    /// Runs both discovery phases against `base_path`.
    ///
    /// Returns a [`LoadReport`] describing what each phase did. The only
    /// error is an empty `base_path`; per-file failures are recorded in the
    /// report instead.
    pub fn load_configs(&mut self, base_path: impl AsRef<Path>) -> Result<LoadReport, ConfigError> {
        let base = base_path.as_ref();
        if base.as_os_str().is_empty() {
            return Err(ConfigError::EmptyBasePath);
        }

        let base_outcome = self.load_first_available(base, &[".env", ".json", ".yaml"]);

        // Read through the environment overlay, so a base file that sets
        // the selector variable steers the second phase.
        let env_name = match self.env.get(&self.env_name_var) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => DEFAULT_ENV_NAME.to_string(),
        };

        let candidates = [
            format!("{env_name}.env"),
            format!("{env_name}.json"),
            format!("{env_name}.yaml"),
        ];
        let candidates: Vec<&str> = candidates.iter().map(String::as_str).collect();
        let environment_outcome = self.load_first_available(base, &candidates);

        Ok(LoadReport {
            base: base_outcome,
            environment: environment_outcome,
            env_name,
        })
    }

    /// Loads a single file through its format loader and writes every
    /// resulting key into both the cache and the environment overlay.
    ///
    /// Unlike discovery, direct calls propagate all errors.
    pub fn load_file(&mut self, path: &Path) -> Result<LoadOutcome, ConfigError> {
        let loader = loader_for(path)?;
        let outcome = loader.load(path)?;

        for (key, value) in &outcome.entries {
            self.cache.set(key.clone(), value.clone());
            self.env.set(key.clone(), value.clone());
        }

        Ok(outcome)
    }

    fn load_first_available(&mut self, base: &Path, candidates: &[&str]) -> PhaseOutcome {
        for name in candidates {
            let path = base.join(name);
            if !path.exists() {
                continue;
            }

            // Existence, not load success, ends the phase.
            return match self.load_file(&path) {
                Ok(outcome) => {
                    info!(path = %path.display(), keys = outcome.entries.len(), "loaded configuration file");
                    PhaseOutcome::Loaded {
                        path,
                        keys: outcome.entries.len(),
                        skipped: outcome.skipped,
                    }
                }
                Err(error) => {
                    warn!(path = %path.display(), %error, "failed to load configuration file");
                    PhaseOutcome::Failed { path, error }
                }
            };
        }

        PhaseOutcome::NotFound
    }

    /// Looks up a key in the cache, falling back to the environment.
    pub fn get(&self, key: &str) -> Option<String> {
        self.cache
            .get(key)
            .or_else(|| self.env.get(key).map(str::to_string))
    }

    /// Like [`get`](Self::get), but a total miss is an empty string.
    /// Absent configuration is a valid state at this layer; defaulting
    /// policy lives in [`get_config_or`](Self::get_config_or) and the
    /// binder.
    pub fn get_config(&self, key: &str) -> String {
        self.get(key).unwrap_or_default()
    }

    /// Like [`get`](Self::get), but a total miss yields `default`.
    pub fn get_config_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    /// Binds this resolver's values onto `target` per its registered
    /// schema. See [`Bind`].
    pub fn bind<T: Bind + 'static>(&self, target: &mut T) -> Result<(), BindError> {
        bind(target, self)
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Lookup for Resolver {
    fn get(&self, key: &str) -> Option<String> {
        Resolver::get(self, key)
    }
}

/// Builder for a [`Resolver`].
///
/// The environment defaults to a process snapshot and the selector
/// variable to [`ENV_NAME_VAR`]; both can be overridden, which keeps tests
/// hermetic without touching process globals.
#[derive(Debug)]
#[must_use = "builders do nothing until .build() is called"]
pub struct ResolverBuilder {
    environment: Option<Environment>,
    env_name_var: String,
}

impl ResolverBuilder {
    fn new() -> Self {
        Self {
            environment: None,
            env_name_var: ENV_NAME_VAR.to_string(),
        }
    }

    /// Replaces the process-environment snapshot with an explicit one.
    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Overrides which variable selects the environment name.
    pub fn env_name_var(mut self, var: impl Into<String>) -> Self {
        self.env_name_var = var.into();
        self
    }

    pub fn build(self) -> Resolver {
        Resolver {
            cache: Cache::new(),
            env: self.environment.unwrap_or_else(Environment::from_process),
            env_name_var: self.env_name_var,
        }
    }
}

/// What one discovery phase did.
#[derive(Debug)]
pub enum PhaseOutcome {
    /// The first existing candidate loaded successfully.
    Loaded {
        path: PathBuf,
        keys: usize,
        skipped: Vec<Skipped>,
    },
    /// The first existing candidate failed to load; the phase still ended.
    Failed { path: PathBuf, error: ConfigError },
    /// No candidate existed.
    NotFound,
}

impl PhaseOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, PhaseOutcome::Loaded { .. })
    }
}

/// Report of one [`Resolver::load_configs`] run.
#[derive(Debug)]
pub struct LoadReport {
    pub base: PhaseOutcome,
    pub environment: PhaseOutcome,
    /// The environment name that drove the second phase.
    pub env_name: String,
}
