use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to fetch '{uri}': {source}")]
    Http {
        uri: String,
        source: reqwest::Error,
    },

    #[error("fetching '{uri}' returned status {status}")]
    HttpStatus { uri: String, status: u16 },

    #[error("invalid uri '{0}'")]
    InvalidUri(String),

    #[error("unsupported uri scheme '{scheme}' in '{uri}'")]
    UnsupportedScheme { scheme: String, uri: String },

    #[error("{source_name}:{line}: section header is not closed: {text}")]
    UnclosedSection {
        source_name: String,
        line: usize,
        text: String,
    },

    #[error("{source_name}:{line}: no value assigned: {text}")]
    MissingAssignment {
        source_name: String,
        line: usize,
        text: String,
    },

    #[error("illegal directive '{0}'")]
    IllegalDirective(String),

    #[error("directive argument is empty")]
    EmptyValue,

    #[error("load may be in a loop: depth {depth} exceeds limit {limit}")]
    LoadLoop { depth: usize, limit: usize },

    #[error("cannot parse value '{value}' of key '{key}' as {expected}")]
    InvalidValue {
        key: String,
        value: String,
        expected: &'static str,
    },

    #[error("failed to deserialize config: {0}")]
    DeserializeError(#[from] toml::de::Error),
}
