//! Application context for managing shared configuration state.

use crate::config::{Bind, Resolver};
use crate::Error;

/// Central application context holding the resolver and the typed
/// configuration bound from it.
///
/// Generic over the configuration type `C`, which is bound once at build
/// time. Collaborators receive the context instead of reading process
/// globals; access the typed configuration via [`config()`](Self::config)
/// and raw lookups via [`resolver()`](Self::resolver).
///
/// ## Example
///
/// ```no_run
/// use layerconf::{AppContext, Bind, Resolver, Schema};
///
/// #[derive(Default)]
/// struct MyConfig {
///     name: String,
///     port: u16,
/// }
///
/// impl Bind for MyConfig {
///     fn schema(fields: &mut Schema<Self>) {
///         fields.field("name", |c| &mut c.name).default("app");
///         fields.field("port", |c| &mut c.port).default("8080");
///     }
/// }
///
/// let mut resolver = Resolver::new();
/// resolver.load_configs("./configs")?;
///
/// let ctx: AppContext<MyConfig> = AppContext::builder()
///     .with_resolver(resolver)
///     .build()?;
///
/// let config = ctx.config();  // &MyConfig, zero-cost
/// # Ok::<(), layerconf::Error>(())
/// ```
#[derive(Debug)]
pub struct AppContext<C> {
    resolver: Resolver,
    config: C,
}

impl AppContext<()> {
    /// Creates a new builder for constructing an `AppContext`.
    pub fn builder() -> AppContextBuilder {
        AppContextBuilder { resolver: None }
    }
}

impl<C> AppContext<C> {
    /// Returns a reference to the bound configuration.
    ///
    /// This is a zero-cost operation since binding happened at build time.
    pub fn config(&self) -> &C {
        &self.config
    }

    /// Returns the underlying resolver for raw key lookups.
    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }
}

/// Builder for constructing an [`AppContext`].
#[derive(Debug)]
#[must_use = "builders do nothing until .build() is called"]
pub struct AppContextBuilder {
    resolver: Option<Resolver>,
}

impl AppContextBuilder {
    /// Attaches a resolver, usually with its configuration already loaded.
    pub fn with_resolver(mut self, resolver: Resolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Builds the context by binding `C` from the resolver's values.
    ///
    /// Returns an error if no resolver was provided or the bind fails.
    pub fn build<C: Bind + Default + 'static>(self) -> Result<AppContext<C>, Error> {
        let resolver = self.resolver.ok_or(Error::MissingResolver)?;
        let mut config = C::default();
        resolver.bind(&mut config)?;
        Ok(AppContext { resolver, config })
    }
}
