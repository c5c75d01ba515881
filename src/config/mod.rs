//! INI-style configuration loading and typed access.

mod builder;
mod directive;
mod env;
mod error;
mod fetch;
mod parser;
mod resolve;
mod source;
mod store;
mod value;

pub use builder::{Loader, LoaderBuilder, DEFAULT_MAX_DEPTH};
pub use env::{Environment, ProcessEnv};
pub use error::ConfigError;
pub use fetch::{DefaultFetcher, Fetcher, Location};
pub use resolve::MissingPolicy;
pub use store::Store;
pub use value::Value;
