//! Error types for configly.

use crate::core::Kind;
use std::fmt;
use std::num::{ParseFloatError, ParseIntError};
use std::path::PathBuf;

/// Result type alias for configly operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur when constructing a loader or loading a record.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A loader was constructed without any sources.
    #[error("at least one source is required")]
    NoSources,

    /// One or more field annotations could not be parsed. No source was queried.
    #[error("invalid configuration tags: {0}")]
    InvalidTags(FieldErrors),

    /// One or more fields could not be resolved, coerced or validated.
    #[error("invalid configuration: {0}")]
    Invalid(FieldErrors),

    /// A configuration file could not be read.
    #[error("error reading file {}: {error}", .path.display())]
    FileRead {
        /// Path of the file
        path: PathBuf,
        /// Underlying IO failure
        #[source]
        error: std::io::Error,
    },

    /// A configuration file has no extension to detect its format from.
    #[error("file has no extension: {}", .0.display())]
    MissingExtension(PathBuf),

    /// A configuration file has an extension no enabled format handles.
    #[error("unsupported file type: {}", .0.display())]
    UnsupportedFile(PathBuf),

    /// A configuration file could not be parsed.
    #[error("error parsing {format} file: {message}")]
    Parse {
        /// Format name ("json", "yaml", ...)
        format: &'static str,
        /// Parser message
        message: String,
    },

    /// A source failed to look up a key.
    #[error("source {source_name} failed: {message}")]
    Source {
        /// Name of the failing source
        source_name: String,
        /// Failure description
        message: String,
    },
}

impl ConfigError {
    /// The per-field failures carried by this error, if any.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::InvalidTags(errors) | Self::Invalid(errors) => Some(errors),
            _ => None,
        }
    }
}

/// A single failure attributed to one field of the record.
#[derive(Debug, thiserror::Error)]
pub enum FieldError {
    /// An option of the field's tag could not be parsed.
    #[error("field {field}: {error}")]
    Tag {
        /// Field name
        field: String,
        /// Parse failure
        #[source]
        error: TagError,
    },

    /// A negative numeric bound was declared on an unsigned field.
    #[error("field {field}: {option} bound {bound} is negative but the field is unsigned")]
    UnsignedBound {
        /// Field name
        field: String,
        /// Which bound
        option: TagOption,
        /// Declared bound
        bound: i64,
    },

    /// A required field had no value in any source.
    #[error("required value {key} not found in provided sources")]
    MissingRequired {
        /// Lookup key
        key: String,
    },

    /// The resolved string could not be converted to the field's type.
    #[error("error setting {key} (source {source_name}): {error}")]
    Coercion {
        /// Lookup key
        key: String,
        /// Source that supplied the value, or "default"
        source_name: String,
        /// Conversion failure
        #[source]
        error: CoerceError,
    },

    /// The converted value violates a declared bound.
    #[error("invalid value for {key}: {error}")]
    Validation {
        /// Lookup key
        key: String,
        /// Violated bound
        #[source]
        error: ValidationError,
    },
}

/// Tag options that carry a numeric argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagOption {
    /// `min=`
    Min,
    /// `max=`
    Max,
    /// `minLen=`
    MinLen,
    /// `maxLen=`
    MaxLen,
}

impl fmt::Display for TagOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Min => "min",
            Self::Max => "max",
            Self::MinLen => "minLen",
            Self::MaxLen => "maxLen",
        })
    }
}

/// A numeric tag option whose argument is not a valid integer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {option} value {value:?}: {error}")]
pub struct TagError {
    /// The option that failed
    pub option: TagOption,
    /// The raw argument
    pub value: String,
    /// Integer parse failure
    #[source]
    pub error: ParseIntError,
}

/// Failure converting a raw string into a field value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoerceError {
    /// Not a valid signed integer of the target width.
    #[error("invalid integer for {kind}: {error}")]
    InvalidInteger {
        /// Target kind
        kind: Kind,
        /// Parse failure
        #[source]
        error: ParseIntError,
    },

    /// Not a valid unsigned integer of the target width.
    #[error("invalid unsigned integer for {kind}: {error}")]
    InvalidUnsigned {
        /// Target kind
        kind: Kind,
        /// Parse failure
        #[source]
        error: ParseIntError,
    },

    /// Not a valid floating point number.
    #[error("invalid float: {0}")]
    InvalidFloat(#[source] ParseFloatError),

    /// Not one of the accepted boolean spellings.
    #[error("invalid boolean: {0:?}")]
    InvalidBool(String),

    /// Not a valid duration literal.
    #[error("invalid duration: {0}")]
    InvalidDuration(#[from] DurationError),

    /// The field's type cannot be loaded from a string.
    #[error("unsupported field type: {0}")]
    Unsupported(&'static str),
}

/// Failure parsing a duration literal such as `"1h30m"`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DurationError {
    /// Malformed literal.
    #[error("invalid duration {0:?}")]
    Invalid(String),

    /// A number without a unit.
    #[error("missing unit in duration {0:?}")]
    MissingUnit(String),

    /// An unrecognized unit.
    #[error("unknown unit {unit:?} in duration {input:?}")]
    UnknownUnit {
        /// The unit text
        unit: String,
        /// The whole literal
        input: String,
    },

    /// Negative durations cannot be represented.
    #[error("negative duration {0:?}")]
    Negative(String),

    /// The literal exceeds the representable range.
    #[error("duration {0:?} out of range")]
    Overflow(String),
}

/// A coerced value outside its declared bounds.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// String shorter than `minLen`.
    #[error("length {len} is less than minimum length {min}")]
    TooShort {
        /// Actual length
        len: usize,
        /// Declared bound
        min: isize,
    },

    /// String longer than `maxLen`.
    #[error("length {len} is greater than maximum length {max}")]
    TooLong {
        /// Actual length
        len: usize,
        /// Declared bound
        max: isize,
    },

    /// Number below `min`.
    #[error("value {value} is less than minimum {min}")]
    BelowMin {
        /// Actual value, rendered
        value: String,
        /// Declared bound
        min: i64,
    },

    /// Number above `max`.
    #[error("value {value} is greater than maximum {max}")]
    AboveMax {
        /// Actual value, rendered
        value: String,
        /// Declared bound
        max: i64,
    },

    /// A negative bound checked against an unsigned value.
    #[error("bound {0} is negative and cannot apply to an unsigned value")]
    NegativeBound(i64),

    /// NaN checked against a numeric bound.
    #[error("value NaN cannot satisfy numeric bounds")]
    NotANumber,
}

/// Every independent field failure from one load, in field order.
#[derive(Debug, Default)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Record a failure.
    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    /// Number of failures.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no failure was recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the failures.
    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.0.iter()
    }
}

impl Extend<FieldError> for FieldErrors {
    fn extend<I: IntoIterator<Item = FieldError>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl IntoIterator for FieldErrors {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a FieldErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.as_slice() {
            [single] => write!(f, "{}", single),
            errors => {
                writeln!(f, "{} errors:", errors.len())?;
                for (i, err) in errors.iter().enumerate() {
                    writeln!(f, "  {}. {}", i + 1, err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for FieldErrors {}
