//! Command-line argument configuration source.

use super::Source;
use crate::error::Result;
use std::collections::HashMap;
use std::ffi::OsString;

/// Command-line argument configuration source.
///
/// Accepts `--key=value` and `-key=value`. Arguments without `=` are ignored, the
/// value is everything after the first `=`, and a repeated key keeps its last value.
///
/// # Examples
///
/// ```rust
/// use configly::sources::{CliSource, Source};
///
/// let source = CliSource::from_args(["--host=localhost", "-port=8080", "--verbose"]);
/// assert_eq!(source.get_value("port").unwrap(), Some("8080".to_string()));
/// assert_eq!(source.get_value("verbose").unwrap(), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CliSource {
    flags: HashMap<String, String>,
}

impl CliSource {
    /// Create a source from explicit arguments.
    pub fn from_args<I, A>(args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: AsRef<str>,
    {
        let flags = args
            .into_iter()
            .filter_map(|arg| {
                let arg = arg.as_ref();
                let trimmed = arg.strip_prefix("--").unwrap_or(arg);
                let trimmed = trimmed.strip_prefix('-').unwrap_or(trimmed);
                trimmed
                    .split_once('=')
                    .map(|(key, value)| (key.to_string(), value.to_string()))
            })
            .collect();
        Self { flags }
    }

    /// Create a source from the arguments of the current process, minus the program name.
    ///
    /// Arguments that are not valid unicode are converted lossily.
    pub fn from_process_args() -> Self {
        Self::from_os_args(std::env::args_os().skip(1))
    }

    fn from_os_args<I: IntoIterator<Item = OsString>>(args: I) -> Self {
        Self::from_args(
            args.into_iter()
                .map(|arg| arg.to_string_lossy().into_owned()),
        )
    }
}

impl Source for CliSource {
    fn name(&self) -> String {
        "cli".to_string()
    }

    fn get_value(&self, key: &str) -> Result<Option<String>> {
        Ok(self.flags.get(key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get(source: &CliSource, key: &str) -> Option<String> {
        source.get_value(key).unwrap()
    }

    #[test]
    fn test_name() {
        assert_eq!(CliSource::from_args(Vec::<String>::new()).name(), "cli");
    }

    #[test]
    fn test_double_and_single_dash() {
        let source = CliSource::from_args(["-host=localhost", "--port=8080", "-debug=true"]);
        assert_eq!(get(&source, "host").as_deref(), Some("localhost"));
        assert_eq!(get(&source, "port").as_deref(), Some("8080"));
        assert_eq!(get(&source, "debug").as_deref(), Some("true"));
    }

    #[test]
    fn test_values_keep_everything_after_first_equals() {
        let source = CliSource::from_args([
            "--config=key=value",
            "--url=https://example.com:8080/path?query=value&foo=bar",
            "--message=hello world",
            "--empty=",
        ]);
        assert_eq!(get(&source, "config").as_deref(), Some("key=value"));
        assert_eq!(
            get(&source, "url").as_deref(),
            Some("https://example.com:8080/path?query=value&foo=bar")
        );
        assert_eq!(get(&source, "message").as_deref(), Some("hello world"));
        assert_eq!(get(&source, "empty").as_deref(), Some(""));
    }

    #[test]
    fn test_flags_without_equals_are_ignored() {
        let source = CliSource::from_args(["--host=localhost", "--verbose", "positional"]);
        assert_eq!(get(&source, "verbose"), None);
        assert_eq!(get(&source, "positional"), None);
        assert_eq!(get(&source, "nonexistent"), None);
    }

    #[test]
    fn test_last_duplicate_wins() {
        let source = CliSource::from_args(["--host=localhost", "--host=example.com"]);
        assert_eq!(get(&source, "host").as_deref(), Some("example.com"));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_unicode_arguments_are_converted_lossily() {
        use std::os::unix::ffi::OsStringExt;

        let source = CliSource::from_os_args([
            OsString::from("--host=localhost"),
            OsString::from_vec(b"--name=caf\xe9".to_vec()),
            OsString::from_vec(b"--\xff=ignored-key".to_vec()),
        ]);
        assert_eq!(get(&source, "host").as_deref(), Some("localhost"));
        assert_eq!(get(&source, "name").as_deref(), Some("caf\u{FFFD}"));
    }

    #[test]
    fn test_from_process_args_does_not_panic() {
        let source = CliSource::from_process_args();
        assert_eq!(source.name(), "cli");
    }

    #[test]
    fn test_bare_key_value() {
        let source = CliSource::from_args(["region=eu-west-1"]);
        assert_eq!(get(&source, "region").as_deref(), Some("eu-west-1"));
    }
}
