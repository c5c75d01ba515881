//! Application context holding the loaded configuration.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::{Loader, Store};
use crate::Error;

/// Read-only configuration shared across an application.
///
/// The context is built once, explicitly, from one or more documents. After
/// that the store is frozen behind an [`Arc`]; cloning the context is cheap
/// and clones can be sent to other threads.
///
/// ## Example
///
/// ```no_run
/// use dragon_ini::AppContext;
///
/// let ctx = AppContext::builder()
///     .with_file("config/default.ini")
///     .with_file("config/local.ini")
///     .build()?;
///
/// let host = ctx.config().default_string("server.host", "127.0.0.1");
/// # Ok::<(), dragon_ini::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct AppContext {
    config: Arc<Store>,
}

impl AppContext {
    /// Creates a new builder for constructing an `AppContext`.
    pub fn builder() -> AppContextBuilder {
        AppContextBuilder::default()
    }

    /// Wraps an already loaded store.
    pub fn from_store(store: Store) -> Self {
        Self {
            config: Arc::new(store),
        }
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &Store {
        &self.config
    }
}

/// Builder for constructing an [`AppContext`].
#[derive(Debug, Default)]
#[must_use = "builders do nothing until .build() is called"]
pub struct AppContextBuilder {
    loader: Option<Loader>,
    store: Option<Store>,
    files: Vec<PathBuf>,
}

impl AppContextBuilder {
    /// Uses `loader` instead of [`Loader::new`].
    pub fn with_loader(mut self, loader: Loader) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Parses documents into `store` instead of an empty one, e.g. to supply a
    /// custom environment fallback.
    pub fn with_store(mut self, store: Store) -> Self {
        self.store = Some(store);
        self
    }

    /// Adds a document to parse. Files are parsed in registration order into
    /// one store, so later files override earlier ones.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        self.files.push(path.as_ref().to_path_buf());
        self
    }

    /// Parses every registered file and freezes the result.
    ///
    /// Returns [`Error::MissingConfig`] if no file was registered.
    pub fn build(self) -> Result<AppContext, Error> {
        if self.files.is_empty() {
            return Err(Error::MissingConfig);
        }

        let loader = self.loader.unwrap_or_default();
        let mut store = self.store.unwrap_or_default();
        for path in &self.files {
            tracing::debug!(path = %path.display(), "loading configuration file");
            loader.parse_file(&mut store, path)?;
        }

        Ok(AppContext::from_store(store))
    }
}
