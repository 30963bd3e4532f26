//! Loader that resolves every annotated field of a record from prioritized sources.

use crate::core::{
    Annotation, Configurable, Constraint, Field, LoaderBuilder, Schema, coerce, parse_tag,
    validate,
};
use crate::error::{ConfigError, FieldError, FieldErrors, Result, TagOption};
use crate::sources::Source;
use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;
use tracing::{Dispatch, debug, debug_span, dispatcher, warn};

/// Tag key used when none is configured.
pub const DEFAULT_TAG_KEY: &str = "configly";

/// Source name reported for values that came from a field's default.
pub const DEFAULT_SOURCE_NAME: &str = "default";

/// Settings for [`Loader::new`].
pub struct LoaderConfig {
    /// Tag key to read annotations from. `None` or empty means [`DEFAULT_TAG_KEY`].
    pub tag_key: Option<String>,
    /// Sources in priority order: earlier sources win.
    pub sources: Vec<Box<dyn Source>>,
    /// Where diagnostics go. Defaults to a no-op dispatcher.
    pub logger: Dispatch,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            tag_key: None,
            sources: Vec::new(),
            logger: Dispatch::none(),
        }
    }
}

impl fmt::Debug for LoaderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoaderConfig")
            .field("tag_key", &self.tag_key)
            .field("sources", &source_names(&self.sources))
            .finish_non_exhaustive()
    }
}

/// Populates records of type `T` from an ordered list of sources.
///
/// Each call to [`load`](Self::load) builds a fresh record and constraint set, so a
/// loader can be reused and shared between threads.
///
/// # Examples
///
/// ```rust
/// use configly::prelude::*;
/// use configly::sources::MockSource;
///
/// #[derive(Debug, Default)]
/// struct AppConfig {
///     port: u16,
///     host: String,
/// }
///
/// impl Configurable for AppConfig {
///     fn describe(schema: &mut Schema<Self>) {
///         schema.field("port", |c| &mut c.port).tag("configly", "PORT,default=8080");
///         schema.field("host", |c| &mut c.host).tag("configly", "HOST,required");
///     }
/// }
///
/// # fn main() -> configly::error::Result<()> {
/// let loader = Loader::builder()
///     .with_source(MockSource::new("test").with_value("HOST", "localhost"))
///     .build::<AppConfig>()?;
///
/// let config = loader.load()?;
/// assert_eq!(config.port, 8080);
/// assert_eq!(config.host, "localhost");
/// # Ok(())
/// # }
/// ```
///
/// The record type must be a [`Configurable`] record:
///
/// ```rust,compile_fail
/// use configly::prelude::*;
/// use configly::sources::{MockSource, Source};
///
/// let config = LoaderConfig {
///     sources: vec![Box::new(MockSource::new("test")) as Box<dyn Source>],
///     ..LoaderConfig::default()
/// };
/// let loader = Loader::<String>::new(config);
/// ```
pub struct Loader<T> {
    tag_key: String,
    sources: Vec<Box<dyn Source>>,
    logger: Dispatch,
    _record: PhantomData<fn() -> T>,
}

/// A field selected for loading, with its constraint.
struct FieldPlan<'a, T> {
    index: usize,
    field: &'a Field<T>,
    constraint: Constraint,
}

impl Loader<()> {
    /// Create a builder for constructing a loader.
    pub fn builder() -> LoaderBuilder {
        LoaderBuilder::new()
    }
}

impl<T> Loader<T> {
    /// The tag key annotations are read from.
    pub fn tag_key(&self) -> &str {
        &self.tag_key
    }

    /// Names of the configured sources, highest priority first.
    pub fn source_names(&self) -> Vec<String> {
        source_names(&self.sources)
    }
}

impl<T: Configurable> Loader<T> {
    /// Create a loader for records of type `T`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoSources`] if `config.sources` is empty.
    pub fn new(config: LoaderConfig) -> Result<Self> {
        if config.sources.is_empty() {
            return Err(ConfigError::NoSources);
        }

        let tag_key = config
            .tag_key
            .filter(|key| !key.is_empty())
            .unwrap_or_else(|| DEFAULT_TAG_KEY.to_string());

        dispatcher::with_default(&config.logger, || {
            debug!(
                record = type_name::<T>(),
                tag_key = %tag_key,
                sources = ?source_names(&config.sources),
                "loader initialized"
            );
        });

        Ok(Self {
            tag_key,
            sources: config.sources,
            logger: config.logger,
            _record: PhantomData,
        })
    }

    /// Load a fully populated, fully valid record.
    ///
    /// Tags are parsed first; if any is malformed, every tag error is returned
    /// before a source is queried. Otherwise every field is resolved, coerced and
    /// validated, and all failures are returned together.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidTags`] if any field annotation is malformed
    /// - [`ConfigError::Invalid`] if any field is missing, unparsable or out of bounds
    pub fn load(&self) -> Result<T> {
        dispatcher::with_default(&self.logger, || {
            let span = debug_span!("load", record = type_name::<T>());
            let _guard = span.enter();
            self.load_record()
        })
    }

    fn load_record(&self) -> Result<T> {
        let schema = Schema::<T>::of();
        let plans = self.parse_all_tags(&schema)?;

        let mut record = T::default();
        let mut errors = FieldErrors::new();
        for plan in &plans {
            if let Err(error) = self.load_field(&mut record, plan) {
                warn!(field = plan.field.name(), %error, "field failed to load");
                errors.push(error);
            }
        }

        if !errors.is_empty() {
            return Err(ConfigError::Invalid(errors));
        }
        debug!(fields = plans.len(), "record loaded");
        Ok(record)
    }

    /// Collect the constraint of every assignable, annotated field.
    fn parse_all_tags<'a>(&self, schema: &'a Schema<T>) -> Result<Vec<FieldPlan<'a, T>>> {
        let mut plans = Vec::new();
        let mut errors = FieldErrors::new();

        for (index, field) in schema.fields().iter().enumerate() {
            if !field.is_settable() {
                debug!(field = field.name(), "skipping unassignable field");
                continue;
            }

            let constraint = match field.annotation(&self.tag_key) {
                None => {
                    debug!(field = field.name(), tag_key = %self.tag_key, "no tag found, skipping");
                    continue;
                }
                Some(Annotation::Constraint(constraint)) => constraint.clone(),
                Some(Annotation::Tag(raw)) => match parse_tag(raw) {
                    Ok(constraint) => constraint,
                    Err(tag_errors) => {
                        errors.extend(tag_errors.into_iter().map(|error| FieldError::Tag {
                            field: field.name().to_string(),
                            error,
                        }));
                        continue;
                    }
                },
            };

            if field.kind().is_unsigned() {
                let negative = [
                    (TagOption::Min, constraint.min),
                    (TagOption::Max, constraint.max),
                ]
                .into_iter()
                .filter_map(|(option, bound)| bound.filter(|b| *b < 0).map(|b| (option, b)))
                .map(|(option, bound)| FieldError::UnsignedBound {
                    field: field.name().to_string(),
                    option,
                    bound,
                })
                .collect::<Vec<_>>();
                if !negative.is_empty() {
                    errors.extend(negative);
                    continue;
                }
            }

            plans.push(FieldPlan {
                index,
                field,
                constraint,
            });
        }

        if !errors.is_empty() {
            return Err(ConfigError::InvalidTags(errors));
        }
        Ok(plans)
    }

    fn load_field(
        &self,
        record: &mut T,
        plan: &FieldPlan<'_, T>,
    ) -> std::result::Result<(), FieldError> {
        let constraint = &plan.constraint;
        let (raw, source_name) = match self.value_from_sources(&constraint.key) {
            Some(found) => found,
            None if constraint.required => {
                return Err(FieldError::MissingRequired {
                    key: constraint.key.clone(),
                });
            }
            None => match constraint.effective_default() {
                Some(default) => (default.to_string(), DEFAULT_SOURCE_NAME.to_string()),
                None => {
                    debug!(key = %constraint.key, "no value found, keeping default");
                    return Ok(());
                }
            },
        };

        debug!(
            field = plan.field.name(),
            field_index = plan.index,
            key = %constraint.key,
            source = %source_name,
            "setting field"
        );

        let coercion_error = |error| FieldError::Coercion {
            key: constraint.key.clone(),
            source_name: source_name.clone(),
            error,
        };
        let value = coerce(plan.field.kind(), &raw).map_err(coercion_error)?;
        let checked = validate(&value, constraint);
        plan.field.set(record, value).map_err(coercion_error)?;

        checked.map_err(|error| FieldError::Validation {
            key: constraint.key.clone(),
            error,
        })
    }

    /// First value for `key` in priority order, with the name of the source it came from.
    ///
    /// A source that fails is logged and skipped.
    fn value_from_sources(&self, key: &str) -> Option<(String, String)> {
        if key.is_empty() {
            return None;
        }
        for source in &self.sources {
            match source.get_value(key) {
                Ok(Some(value)) => {
                    debug!(key, source = %source.name(), "found value");
                    return Some((value, source.name()));
                }
                Ok(None) => {}
                Err(error) => {
                    warn!(
                        key,
                        source = %source.name(),
                        %error,
                        "error getting value from source, skipping"
                    );
                }
            }
        }
        None
    }
}

fn source_names(sources: &[Box<dyn Source>]) -> Vec<String> {
    sources.iter().map(|s| s.name()).collect()
}
