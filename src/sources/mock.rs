//! In-memory source for tests.

use super::Source;
use crate::error::{ConfigError, Result};
use std::collections::HashMap;

/// In-memory configuration source, mainly for tests.
///
/// # Examples
///
/// ```rust
/// use configly::sources::{MockSource, Source};
///
/// let source = MockSource::new("test").with_value("port", "8080");
/// assert_eq!(source.get_value("port").unwrap(), Some("8080".to_string()));
///
/// let broken = MockSource::new("broken").with_error("connection refused");
/// assert!(broken.get_value("port").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockSource {
    name: String,
    values: HashMap<String, String>,
    error: Option<String>,
}

impl MockSource {
    /// Create an empty source called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: HashMap::new(),
            error: None,
        }
    }

    /// Add a key/value pair.
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Make every lookup fail with `message`.
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error = Some(message.into());
        self
    }
}

impl Source for MockSource {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn get_value(&self, key: &str) -> Result<Option<String>> {
        if let Some(message) = &self.error {
            return Err(ConfigError::Source {
                source_name: self.name.clone(),
                message: message.clone(),
            });
        }
        Ok(self.values.get(key).cloned())
    }
}
