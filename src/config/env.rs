use std::collections::HashMap;

/// Last-resort lookup consulted by [`Store::exists`](super::Store::exists)
/// and [`Store::string`](super::Store::string).
pub trait Environment: Send + Sync + std::fmt::Debug {
    /// Returns the value of `name`, or `None` if it is unset or empty.
    fn var(&self, name: &str) -> Option<String>;
}

/// Reads the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|v| !v.is_empty())
    }
}

impl Environment for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).filter(|v| !v.is_empty()).cloned()
    }
}
