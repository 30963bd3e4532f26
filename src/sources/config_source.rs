//! Configuration source trait.

use crate::error::Result;
use std::sync::Arc;

/// A named key/value lookup the loader queries for field values.
///
/// Implement this trait to create custom configuration sources (e.g., remote APIs,
/// databases, key-value stores). Sources are only read, never mutated, and are
/// queried sequentially on the calling thread; a slow source slows the whole load.
pub trait Source: Send + Sync {
    /// Get a human-readable name for this source (for logging and error messages).
    fn name(&self) -> String;

    /// Look up a single value by key.
    ///
    /// Returns `Ok(None)` when the key is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup itself failed. The loader logs it and moves
    /// on to the next source.
    fn get_value(&self, key: &str) -> Result<Option<String>>;
}

impl<S: Source + ?Sized> Source for Box<S> {
    fn name(&self) -> String {
        (**self).name()
    }

    fn get_value(&self, key: &str) -> Result<Option<String>> {
        (**self).get_value(key)
    }
}

impl<S: Source + ?Sized> Source for Arc<S> {
    fn name(&self) -> String {
        (**self).name()
    }

    fn get_value(&self, key: &str) -> Result<Option<String>> {
        (**self).get_value(key)
    }
}
