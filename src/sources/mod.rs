//! Configuration source implementations.

mod cli;
mod config_source;
mod env;
mod file;
mod mock;

pub use cli::CliSource;
pub use config_source::Source;
pub use env::EnvSource;
pub use file::FileSource;
pub use mock::MockSource;
