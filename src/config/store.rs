//! The resolved key/value store and its typed accessors.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use super::env::{Environment, ProcessEnv};
use super::source::{key_path, merge_at_path};
use super::value::Value;
use super::ConfigError;

/// Flat mapping from dotted key to [`Value`].
///
/// Keys of the default section are stored bare; keys under `[section]` are
/// stored as `section.key`. Assigning an existing key overwrites it.
///
/// Reads fall back to the [`Environment`] for keys that were never assigned:
/// environment variables fill in what the documents leave out but never
/// replace an assigned value.
///
/// ## Strict and default accessors
///
/// [`int`](Self::int), [`int64`](Self::int64), [`bool`](Self::bool) and
/// [`float`](Self::float) fail with [`ConfigError::InvalidValue`] when the text
/// does not parse. The `default_*` variants never fail and return the supplied
/// fallback instead.
///
/// ```
/// use dragon_ini::{Loader, Store};
///
/// let mut store = Store::new();
/// Loader::new().parse_str(&mut store, "[server]\nport = 8080\n")?;
///
/// assert_eq!(store.int("server.port")?, 8080);
/// assert_eq!(store.default_int("server.workers", 4), 4);
/// # Ok::<(), dragon_ini::ConfigError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Store {
    entries: BTreeMap<String, Value>,
    env: Arc<dyn Environment>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    /// Creates an empty store that falls back to the process environment.
    pub fn new() -> Self {
        Self::with_environment(ProcessEnv)
    }

    /// Creates an empty store with a custom environment fallback.
    pub fn with_environment(env: impl Environment + 'static) -> Self {
        Self {
            entries: BTreeMap::new(),
            env: Arc::new(env),
        }
    }

    /// Assigns `value` to `key`, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Returns the stored value, ignoring the environment.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over stored entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns `true` if `key` is stored or set in the environment.
    pub fn exists(&self, key: &str) -> bool {
        self.entries.contains_key(key) || self.env.var(key).is_some()
    }

    /// Returns the string form of `key`, the environment value, or `""`.
    pub fn string(&self, key: &str) -> String {
        match self.entries.get(key) {
            Some(value) => value.to_string(),
            None => self.env.var(key).unwrap_or_default(),
        }
    }

    /// Splits the string form of `key` on `,`. An empty value yields no items.
    pub fn strings(&self, key: &str) -> Vec<String> {
        let s = self.string(key);
        if s.is_empty() {
            return Vec::new();
        }
        s.split(',').map(str::to_string).collect()
    }

    pub fn int(&self, key: &str) -> Result<i32, ConfigError> {
        let value = self.int64(key).map_err(|_| self.invalid(key, "int"))?;
        i32::try_from(value).map_err(|_| self.invalid(key, "int"))
    }

    pub fn int64(&self, key: &str) -> Result<i64, ConfigError> {
        self.typed(key, "int64", Value::to_i64)
    }

    pub fn bool(&self, key: &str) -> Result<bool, ConfigError> {
        self.typed(key, "bool", Value::to_bool)
    }

    pub fn float(&self, key: &str) -> Result<f64, ConfigError> {
        self.typed(key, "float", Value::to_f64)
    }

    /// Returns `default` when the string form of `key` is empty.
    pub fn default_string(&self, key: &str, default: &str) -> String {
        let s = self.string(key);
        if s.is_empty() {
            default.to_string()
        } else {
            s
        }
    }

    pub fn default_strings(&self, key: &str, default: &[&str]) -> Vec<String> {
        let items = self.strings(key);
        if items.is_empty() {
            default.iter().map(|s| s.to_string()).collect()
        } else {
            items
        }
    }

    pub fn default_int(&self, key: &str, default: i32) -> i32 {
        self.int(key).unwrap_or(default)
    }

    pub fn default_int64(&self, key: &str, default: i64) -> i64 {
        self.int64(key).unwrap_or(default)
    }

    pub fn default_bool(&self, key: &str, default: bool) -> bool {
        self.bool(key).unwrap_or(default)
    }

    pub fn default_float(&self, key: &str, default: f64) -> f64 {
        self.float(key).unwrap_or(default)
    }

    /// Returns the entries of one section with the `section.` prefix removed.
    ///
    /// The empty name selects the default section, i.e. keys without a dot.
    pub fn section(&self, name: &str) -> BTreeMap<String, Value> {
        if name.is_empty() {
            return self
                .entries
                .iter()
                .filter(|(k, _)| !k.contains('.'))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
        }

        let prefix = format!("{name}.");
        self.entries
            .iter()
            .filter_map(|(k, v)| {
                k.strip_prefix(&prefix)
                    .filter(|rest| !rest.is_empty())
                    .map(|rest| (rest.to_string(), v.clone()))
            })
            .collect()
    }

    /// Deserializes the stored entries into `T`.
    ///
    /// Dotted keys become nested tables (`server.port` is field `port` of
    /// field `server`). String values that look like booleans, integers or
    /// floats are converted first, so numeric fields deserialize from text.
    /// The environment is not consulted.
    ///
    /// ```
    /// use dragon_ini::{Loader, Store};
    /// use serde::Deserialize;
    ///
    /// #[derive(Deserialize)]
    /// struct Server {
    ///     host: String,
    ///     port: u16,
    /// }
    ///
    /// #[derive(Deserialize)]
    /// struct App {
    ///     server: Server,
    /// }
    ///
    /// let mut store = Store::new();
    /// Loader::new().parse_str(&mut store, "[server]\nhost=localhost\nport=8080")?;
    ///
    /// let app: App = store.deserialize()?;
    /// assert_eq!(app.server.port, 8080);
    /// # Ok::<(), dragon_ini::ConfigError>(())
    /// ```
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, ConfigError> {
        let mut table = toml::Table::new();
        for (key, value) in &self.entries {
            merge_at_path(&mut table, &key_path(key), value.to_toml());
        }
        toml::Value::Table(table)
            .try_into()
            .map_err(ConfigError::DeserializeError)
    }

    fn typed<T>(
        &self,
        key: &str,
        expected: &'static str,
        convert: impl Fn(&Value) -> Option<T>,
    ) -> Result<T, ConfigError> {
        let parsed = match self.entries.get(key) {
            Some(value) => convert(value),
            None => convert(&Value::String(self.string(key))),
        };
        parsed.ok_or_else(|| self.invalid(key, expected))
    }

    fn invalid(&self, key: &str, expected: &'static str) -> ConfigError {
        ConfigError::InvalidValue {
            key: key.to_string(),
            value: self.string(key),
            expected,
        }
    }
}
