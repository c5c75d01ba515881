use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use super::fetch::{read_file, DefaultFetcher, Fetcher};
use super::parser::{DocumentParser, MEMORY_SOURCE};
use super::resolve::MissingPolicy;
use super::{ConfigError, Store};

/// Default ceiling on nested `@load` directives.
pub const DEFAULT_MAX_DEPTH: usize = 20;

/// Parses INI-style documents into a [`Store`].
///
/// A document is a sequence of lines, each trimmed before it is classified:
///
/// ```ini
/// # comments start with '#' or ';'
/// name = app
///
/// [server]
/// host = localhost
/// url = http://${server.host}:${server.port,DEFAULT_PORT}/api
///
/// @load:${CONF_DIR}/local.ini
/// ```
///
/// Keys under a `[section]` are stored as `section.key`. `${a,b}` expands to
/// the first of `a`, `b` that is already known (environment included).
/// `@load:<path-or-url>` parses another document right there, in the current
/// section and into the same store; later assignments win, whichever document
/// they come from.
///
/// ## Example
///
/// ```no_run
/// use dragon_ini::Loader;
///
/// let store = Loader::builder()
///     .with_max_depth(8)
///     .build()
///     .load_file("config/app.ini")?;
///
/// let port = store.default_int("server.port", 8080);
/// # Ok::<(), dragon_ini::ConfigError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Loader {
    fetcher: Arc<dyn Fetcher>,
    policy: MissingPolicy,
    max_depth: usize,
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

impl Loader {
    /// Creates a loader with default settings.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Creates a new loader builder.
    pub fn builder() -> LoaderBuilder {
        LoaderBuilder::default()
    }

    /// Parses the file at `path` into a fresh store.
    ///
    /// Use [`parse_file`](Self::parse_file) to keep the partially filled store
    /// when parsing fails.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<Store, ConfigError> {
        let mut store = Store::new();
        self.parse_file(&mut store, path)?;
        Ok(store)
    }

    /// Parses the file at `path` into `store`.
    ///
    /// `path` is always read from the local filesystem; the configured
    /// [`Fetcher`] only serves `@load` targets.
    pub fn parse_file(
        &self,
        store: &mut Store,
        path: impl AsRef<Path>,
    ) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let bytes = read_file(path)?;
        self.parse_source(store, &bytes, &path.display().to_string())
    }

    /// Parses an in-memory document into `store`.
    pub fn parse_str(&self, store: &mut Store, text: &str) -> Result<(), ConfigError> {
        self.parser().parse(store, text, MEMORY_SOURCE, "", 0)
    }

    /// Parses raw bytes into `store`. Invalid UTF-8 is replaced, not rejected.
    pub fn parse_bytes(&self, store: &mut Store, bytes: &[u8]) -> Result<(), ConfigError> {
        self.parse_source(store, bytes, MEMORY_SOURCE)
    }

    fn parse_source(
        &self,
        store: &mut Store,
        bytes: &[u8],
        source_name: &str,
    ) -> Result<(), ConfigError> {
        let text = String::from_utf8_lossy(bytes);
        self.parser().parse(store, &text, source_name, "", 0)
    }

    fn parser(&self) -> DocumentParser<'_> {
        DocumentParser {
            fetcher: self.fetcher.as_ref(),
            policy: self.policy,
            max_depth: self.max_depth,
        }
    }
}

/// Builder for [`Loader`].
#[derive(Debug)]
#[must_use = "builders do nothing until .build() is called"]
pub struct LoaderBuilder {
    fetcher: Option<Arc<dyn Fetcher>>,
    http_timeout: Option<Duration>,
    policy: MissingPolicy,
    max_depth: usize,
}

impl Default for LoaderBuilder {
    fn default() -> Self {
        Self {
            fetcher: None,
            http_timeout: None,
            policy: MissingPolicy::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl LoaderBuilder {
    /// Sets how many `@load` directives may nest before parsing fails with
    /// [`ConfigError::LoadLoop`].
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets what unresolved `${...}` references in values expand to.
    pub fn with_missing_policy(mut self, policy: MissingPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replaces the fetcher used for `@load` targets.
    ///
    /// Top-level documents given to [`Loader::parse_file`] are still read
    /// from disk directly. Overrides
    /// [`with_http_timeout`](Self::with_http_timeout).
    pub fn with_fetcher(mut self, fetcher: impl Fetcher + 'static) -> Self {
        self.fetcher = Some(Arc::new(fetcher));
        self
    }

    /// Sets a timeout for HTTP loads made by the default fetcher.
    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Loader {
        let fetcher: Arc<dyn Fetcher> = match (self.fetcher, self.http_timeout) {
            (Some(fetcher), _) => fetcher,
            (None, Some(timeout)) => Arc::new(DefaultFetcher::new().with_timeout(timeout)),
            (None, None) => Arc::new(DefaultFetcher::new()),
        };

        Loader {
            fetcher,
            policy: self.policy,
            max_depth: self.max_depth,
        }
    }
}
