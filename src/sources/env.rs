//! Environment variable configuration source.

use super::Source;
use crate::error::{ConfigError, Result};
use std::env::{self, VarError};

/// Environment variable configuration source.
///
/// Looks keys up in the process environment at load time, optionally behind a
/// prefix.
///
/// # Examples
///
/// ```rust
/// use configly::sources::{EnvSource, Source};
///
/// // Tag key "PORT" reads APP_PORT
/// let source = EnvSource::with_prefix("APP_");
/// assert_eq!(source.name(), "env:APP_*");
/// ```
#[derive(Debug, Clone, Default)]
pub struct EnvSource {
    prefix: Option<String>,
}

impl EnvSource {
    /// Create a source that looks keys up unchanged.
    pub fn new() -> Self {
        Self { prefix: None }
    }

    /// Create a source that looks up `prefix + key`.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()).filter(|p: &String| !p.is_empty()),
        }
    }

    fn variable(&self, key: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}{}", prefix, key),
            None => key.to_string(),
        }
    }
}

impl Source for EnvSource {
    fn name(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("env:{}*", prefix),
            None => "env".to_string(),
        }
    }

    fn get_value(&self, key: &str) -> Result<Option<String>> {
        let variable = self.variable(key);
        match env::var(&variable) {
            Ok(value) => Ok(Some(value)),
            Err(VarError::NotPresent) => Ok(None),
            Err(VarError::NotUnicode(_)) => Err(ConfigError::Source {
                source_name: self.name(),
                message: format!("value of {} is not valid unicode", variable),
            }),
        }
    }
}

#[cfg(test)]
#[allow(unsafe_code)] // For env var manipulation in tests
mod tests {
    use super::*;

    #[test]
    fn test_name() {
        assert_eq!(EnvSource::new().name(), "env");
        assert_eq!(EnvSource::with_prefix("APP_").name(), "env:APP_*");
        assert_eq!(EnvSource::with_prefix("").name(), "env");
    }

    #[test]
    fn test_get_existing_value() {
        unsafe {
            env::set_var("CONFIGLY_ENV_TEST_HOST", "localhost");
        }
        let source = EnvSource::new();
        assert_eq!(
            source.get_value("CONFIGLY_ENV_TEST_HOST").unwrap(),
            Some("localhost".to_string())
        );
        unsafe {
            env::remove_var("CONFIGLY_ENV_TEST_HOST");
        }
    }

    #[test]
    fn test_get_empty_value_is_found() {
        unsafe {
            env::set_var("CONFIGLY_ENV_TEST_EMPTY", "");
        }
        let source = EnvSource::new();
        assert_eq!(
            source.get_value("CONFIGLY_ENV_TEST_EMPTY").unwrap(),
            Some(String::new())
        );
        unsafe {
            env::remove_var("CONFIGLY_ENV_TEST_EMPTY");
        }
    }

    #[test]
    fn test_get_missing_value() {
        let source = EnvSource::new();
        assert_eq!(
            source.get_value("CONFIGLY_ENV_TEST_DEFINITELY_MISSING").unwrap(),
            None
        );
    }

    #[test]
    fn test_prefix_lookup() {
        unsafe {
            env::set_var("CONFIGLY_PREFIX_TEST_PORT", "9090");
        }
        let source = EnvSource::with_prefix("CONFIGLY_PREFIX_TEST_");
        assert_eq!(source.get_value("PORT").unwrap(), Some("9090".to_string()));
        assert_eq!(EnvSource::new().get_value("PORT_UNPREFIXED_MISSING").unwrap(), None);
        unsafe {
            env::remove_var("CONFIGLY_PREFIX_TEST_PORT");
        }
    }
}
