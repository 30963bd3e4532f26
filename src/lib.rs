//! # configly
//!
//! Typed configuration records loaded from prioritized key/value sources.
//!
//! ## Overview
//!
//! A record describes its fields once through [`Configurable`](core::Configurable).
//! Each annotated field names the key to look up and its constraints:
//!
//! ```text
//! "<key>[,required][,default=<literal>][,min=<int>][,max=<int>][,minLen=<int>][,maxLen=<int>]"
//! ```
//!
//! On every load the sources are queried in order (first match wins), the text is
//! converted to the field's type, bounds are checked, and every failure is collected
//! into one error.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use configly::prelude::*;
//! use std::time::Duration;
//!
//! #[derive(Debug, Default)]
//! struct AppConfig {
//!     port: u16,
//!     database_url: String,
//!     timeout: Duration,
//! }
//!
//! impl Configurable for AppConfig {
//!     fn describe(schema: &mut Schema<Self>) {
//!         schema.field("port", |c| &mut c.port).tag("configly", "PORT,default=8080,min=1,max=65535");
//!         schema.field("database_url", |c| &mut c.database_url).tag("configly", "DB_URL,required");
//!         schema.field("timeout", |c| &mut c.timeout).tag("configly", "TIMEOUT,default=30s");
//!     }
//! }
//!
//! # fn example() -> configly::Result<()> {
//! let loader = Loader::builder()
//!     .with_cli()
//!     .with_env()
//!     .with_file(".env")
//!     .build::<AppConfig>()?;
//!
//! let config = loader.load()?;
//! println!("listening on {}", config.port);
//! # Ok(())
//! # }
//! ```
//!
//! ## Supported field types
//!
//! `String`, `bool`, all signed and unsigned integer widths, `f32`, `f64` and
//! [`std::time::Duration`] (`"1h30m"`, `"250ms"`). Other types can be registered
//! with [`Schema::opaque`](core::Schema::opaque); loading into them reports an error.
//!
//! ## Feature Flags
//!
//! | Feature  | Default | File formats        |
//! |----------|---------|---------------------|
//! | `json`   | yes     | `.json`             |
//! | `yaml`   | yes     | `.yaml`, `.yml`     |
//! | `dotenv` | yes     | `.env`, `*.env.*`   |
//! | `toml`   | no      | `.toml`             |

#![warn(missing_docs, rust_2024_compatibility)]
#![deny(unsafe_code)]

pub mod core;
pub mod error;
pub mod sources;

pub use error::{ConfigError, Result};

/// Convenient re-exports for common usage patterns.
pub mod prelude {
    pub use crate::core::{Configurable, Constraint, Loader, LoaderBuilder, LoaderConfig, Schema};
    pub use crate::error::{ConfigError, FieldError, Result};
    pub use crate::sources::{CliSource, EnvSource, FileSource, MockSource, Source};
}
