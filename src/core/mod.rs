//! Core loading pipeline: field descriptors, tag parsing, coercion, validation.

mod builder;
mod coerce;
mod loader;
mod schema;
mod tag;
mod validation;

pub use builder::LoaderBuilder;
pub use coerce::{coerce, parse_bool, parse_duration};
pub use loader::{DEFAULT_SOURCE_NAME, DEFAULT_TAG_KEY, Loader, LoaderConfig};
pub use schema::{Annotation, Configurable, Field, FieldValue, Kind, Schema, Value};
pub use tag::{Constraint, parse_tag};
pub use validation::validate;
