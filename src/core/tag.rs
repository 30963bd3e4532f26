//! Field constraints and the tag grammar they are parsed from.
//!
//! ```text
//! <key>[,required][,default=<literal>][,min=<int>][,max=<int>][,minLen=<int>][,maxLen=<int>]
//! ```

use crate::error::{TagError, TagOption};
use std::num::ParseIntError;
use std::str::FromStr;

/// Constraints for one field: where its value comes from and what it must satisfy.
///
/// Usually parsed from a tag with [`parse_tag`], but can be declared directly:
///
/// ```rust
/// use configly::core::Constraint;
///
/// let constraint = Constraint::new("PORT").with_default("8080").with_min(1).with_max(65535);
/// assert_eq!(constraint.key, "PORT");
/// assert!(!constraint.required);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Constraint {
    /// Lookup key in sources. An empty key never matches any source.
    pub key: String,
    /// Fail the load when no source has a value and no default applies.
    pub required: bool,
    /// Raw value used when no source has one. Coerced like a source value.
    pub default_value: Option<String>,
    /// Lower bound for numeric fields.
    pub min: Option<i64>,
    /// Upper bound for numeric fields.
    pub max: Option<i64>,
    /// Minimum string length in bytes.
    pub min_len: Option<isize>,
    /// Maximum string length in bytes.
    pub max_len: Option<isize>,
}

impl Constraint {
    /// Create an unconstrained lookup of `key`.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    /// Mark the field as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set the default value.
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Set the numeric lower bound.
    pub fn with_min(mut self, min: i64) -> Self {
        self.min = Some(min);
        self
    }

    /// Set the numeric upper bound.
    pub fn with_max(mut self, max: i64) -> Self {
        self.max = Some(max);
        self
    }

    /// Set the minimum string length.
    pub fn with_min_len(mut self, min_len: isize) -> Self {
        self.min_len = Some(min_len);
        self
    }

    /// Set the maximum string length.
    pub fn with_max_len(mut self, max_len: isize) -> Self {
        self.max_len = Some(max_len);
        self
    }

    /// The default value, if one is set and non-empty.
    pub fn effective_default(&self) -> Option<&str> {
        self.default_value.as_deref().filter(|value| !value.is_empty())
    }
}

/// Parse a tag string into a [`Constraint`].
///
/// Segment 0 is the key, taken as-is. Every other segment is trimmed and matched
/// by prefix; unrecognized segments are ignored. All malformed numeric options
/// are reported together.
///
/// # Errors
///
/// Returns every [`TagError`] found in the tag if any option failed to parse.
pub fn parse_tag(raw: &str) -> Result<Constraint, Vec<TagError>> {
    let mut parts = raw.split(',');
    let mut constraint = Constraint::new(parts.next().unwrap_or_default());
    let mut errors = Vec::new();

    for part in parts.map(str::trim) {
        if part == "required" {
            constraint.required = true;
        } else if let Some(value) = part.strip_prefix("default=") {
            constraint.default_value = Some(value.to_string());
        } else if let Some(value) = part.strip_prefix("min=") {
            constraint.min = bound(TagOption::Min, value, &mut errors);
        } else if let Some(value) = part.strip_prefix("max=") {
            constraint.max = bound(TagOption::Max, value, &mut errors);
        } else if let Some(value) = part.strip_prefix("minLen=") {
            constraint.min_len = bound(TagOption::MinLen, value, &mut errors);
        } else if let Some(value) = part.strip_prefix("maxLen=") {
            constraint.max_len = bound(TagOption::MaxLen, value, &mut errors);
        } else {
            tracing::trace!(tag = raw, option = part, "ignoring unrecognized tag option");
        }
    }

    if errors.is_empty() {
        Ok(constraint)
    } else {
        Err(errors)
    }
}

fn bound<N>(option: TagOption, value: &str, errors: &mut Vec<TagError>) -> Option<N>
where
    N: FromStr<Err = ParseIntError>,
{
    match value.parse() {
        Ok(n) => Some(n),
        Err(error) => {
            let error = TagError {
                option,
                value: value.to_string(),
                error,
            };
            tracing::warn!(%error, "invalid tag option");
            errors.push(error);
            None
        }
    }
}
