//! Retrieval of documents named by `@load` directives.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use reqwest::blocking::Client;

use url::Url;

use super::ConfigError;

/// Turns a URI or path into raw document bytes.
///
/// Implementations do no parsing, caching or retrying.
pub trait Fetcher: Send + Sync + std::fmt::Debug {
    fn fetch(&self, uri: &str) -> Result<Vec<u8>, ConfigError>;
}

/// Where a reference points after scheme inspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Http(String),
    File(PathBuf),
}

impl Location {
    /// Classifies `uri`.
    ///
    /// `http://` and `https://` are fetched over HTTP. `file://` URLs are
    /// converted to local paths. Anything else without a `scheme://` prefix
    /// is a local path; other schemes are rejected.
    pub fn parse(uri: &str) -> Result<Self, ConfigError> {
        let Some((scheme, _)) = uri.split_once("://") else {
            return Ok(Location::File(PathBuf::from(uri)));
        };

        match scheme.to_ascii_lowercase().as_str() {
            "http" | "https" => Ok(Location::Http(uri.to_string())),
            "file" => {
                let url = Url::parse(uri).map_err(|_| ConfigError::InvalidUri(uri.to_string()))?;
                url.to_file_path()
                    .map(Location::File)
                    .map_err(|()| ConfigError::InvalidUri(uri.to_string()))
            }
            _ => Err(ConfigError::UnsupportedScheme {
                scheme: scheme.to_string(),
                uri: uri.to_string(),
            }),
        }
    }
}

/// Reads local files and performs blocking HTTP GETs.
///
/// The HTTP client is built on first use and shared by every later load, so
/// includes from the same host reuse connections.
#[derive(Debug, Clone, Default)]
pub struct DefaultFetcher {
    timeout: Option<Duration>,
    client: OnceLock<Client>,
}

impl DefaultFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a total timeout for HTTP requests. There is none by default.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self.client = OnceLock::new();
        self
    }

    fn client(&self) -> Result<&Client, reqwest::Error> {
        if let Some(client) = self.client.get() {
            return Ok(client);
        }
        let client = Client::builder().timeout(self.timeout).build()?;
        Ok(self.client.get_or_init(|| client))
    }

    fn fetch_http(&self, uri: &str) -> Result<Vec<u8>, ConfigError> {
        let http_error = |source: reqwest::Error| ConfigError::Http {
            uri: uri.to_string(),
            source,
        };

        let client = self.client().map_err(http_error)?;
        let response = client.get(uri).send().map_err(http_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ConfigError::HttpStatus {
                uri: uri.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().map_err(http_error)?;
        Ok(body.to_vec())
    }
}

impl Fetcher for DefaultFetcher {
    fn fetch(&self, uri: &str) -> Result<Vec<u8>, ConfigError> {
        match Location::parse(uri)? {
            Location::Http(url) => self.fetch_http(&url),
            Location::File(path) => read_file(&path),
        }
    }
}

/// Reads a whole file, mapping a missing file to [`ConfigError::FileNotFound`].
pub(crate) fn read_file(path: &Path) -> Result<Vec<u8>, ConfigError> {
    std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConfigError::FileNotFound(path.to_path_buf())
        } else {
            ConfigError::ReadError {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })
}
