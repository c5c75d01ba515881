pub mod config;
pub mod context;
mod error;

pub use config::{ConfigError, Loader, MissingPolicy, Store, Value};
pub use context::AppContext;
pub use error::Error;
