//! Builder for constructing Loader instances.

use crate::core::{Configurable, Loader, LoaderConfig};
use crate::error::Result;
use crate::sources::{CliSource, EnvSource, FileSource, Source};
use std::path::PathBuf;
use tracing::{Dispatch, dispatcher};

enum PendingSource {
    Ready(Box<dyn Source>),
    File(PathBuf),
}

/// Builder for constructing a [`Loader`].
///
/// Sources are queried in the order they are added: the first source added has
/// the highest priority.
///
/// # Examples
///
/// ```rust,no_run
/// use configly::prelude::*;
///
/// #[derive(Debug, Default)]
/// struct AppConfig {
///     port: u16,
/// }
///
/// impl Configurable for AppConfig {
///     fn describe(schema: &mut Schema<Self>) {
///         schema.field("port", |c| &mut c.port).tag("configly", "PORT,default=8080");
///     }
/// }
///
/// # fn example() -> Result<()> {
/// let loader = Loader::builder()
///     .with_cli()                 // Highest priority
///     .with_env()
///     .with_file(".env.local")
///     .with_file("config.yaml")   // Lowest priority
///     .build::<AppConfig>()?;
/// let config = loader.load()?;
/// # Ok(())
/// # }
/// ```
pub struct LoaderBuilder {
    tag_key: Option<String>,
    logger: Dispatch,
    sources: Vec<PendingSource>,
}

impl LoaderBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            tag_key: None,
            logger: Dispatch::none(),
            sources: Vec::new(),
        }
    }

    /// Read annotations under `tag_key` instead of `"configly"`.
    pub fn tag_key(mut self, tag_key: impl Into<String>) -> Self {
        self.tag_key = Some(tag_key.into());
        self
    }

    /// Send loader diagnostics to `logger`, including those emitted while
    /// [`build`](Self::build) reads file sources.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use configly::core::LoaderBuilder;
    ///
    /// let subscriber = tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).finish();
    /// let builder = LoaderBuilder::new().with_logger(subscriber);
    /// ```
    pub fn with_logger(mut self, logger: impl Into<Dispatch>) -> Self {
        self.logger = logger.into();
        self
    }

    /// Add a custom source.
    pub fn with_source<S: Source + 'static>(mut self, source: S) -> Self {
        self.sources.push(PendingSource::Ready(Box::new(source)));
        self
    }

    /// Add the process environment as a source.
    pub fn with_env(self) -> Self {
        self.with_source(EnvSource::new())
    }

    /// Add the process environment as a source, looking up `prefix + key`.
    pub fn with_env_prefix(self, prefix: impl Into<String>) -> Self {
        self.with_source(EnvSource::with_prefix(prefix))
    }

    /// Add the process arguments as a source.
    pub fn with_cli(self) -> Self {
        self.with_source(CliSource::from_process_args())
    }

    /// Add explicit `--key=value` arguments as a source.
    pub fn with_cli_args<I, A>(self, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: AsRef<str>,
    {
        self.with_source(CliSource::from_args(args))
    }

    /// Add a JSON, YAML, TOML or dotenv file as a source.
    ///
    /// The file is read when [`build`](Self::build) is called.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(PendingSource::File(path.into()));
        self
    }

    /// Build the loader.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No source was added
    /// - A file source cannot be read or parsed
    pub fn build<T: Configurable>(self) -> Result<Loader<T>> {
        let Self {
            tag_key,
            logger,
            sources,
        } = self;

        let sources = dispatcher::with_default(&logger, || {
            sources
                .into_iter()
                .map(|pending| match pending {
                    PendingSource::Ready(source) => Ok(source),
                    PendingSource::File(path) => {
                        FileSource::from_file(path).map(|s| Box::new(s) as Box<dyn Source>)
                    }
                })
                .collect::<Result<Vec<_>>>()
        })?;

        Loader::new(LoaderConfig {
            tag_key,
            sources,
            logger,
        })
    }
}

impl Default for LoaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}
