//! File-based configuration source.

use super::Source;
use crate::error::{ConfigError, Result};
use std::collections::HashMap;
#[cfg(any(feature = "json", feature = "yaml", feature = "toml"))]
use serde::de::DeserializeOwned;
#[cfg(any(feature = "json", feature = "yaml", feature = "toml"))]
use std::{collections::BTreeMap, fmt::Display};
use std::path::{Path, PathBuf};

/// File-based configuration source.
///
/// The file is read and parsed once, when the source is created. Only top-level
/// scalar entries (strings, numbers, booleans) become values; nested tables,
/// arrays and nulls are dropped.
///
/// The format is detected from the file name:
/// - `.json` -> JSON
/// - `.yaml`, `.yml` -> YAML
/// - `.toml` -> TOML (with the `toml` feature)
/// - `.env`, `config.env`, `.env.local` -> dotenv
///
/// # Examples
///
/// ```rust,no_run
/// use configly::sources::FileSource;
///
/// let source = FileSource::from_file("config/default.yaml")?;
/// # Ok::<(), configly::ConfigError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    values: HashMap<String, String>,
}

impl FileSource {
    /// Read and parse `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The file name has no extension
    /// - No enabled format handles the extension
    /// - The contents do not parse
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let text = std::fs::read_to_string(&path).map_err(|error| ConfigError::FileRead {
            path: path.clone(),
            error,
        })?;
        let values = Format::detect(&path)?.parse(&path, &text)?;

        tracing::debug!(path = %path.display(), keys = values.len(), "loaded configuration file");
        Ok(Self { path, values })
    }

    /// Path this source was read from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Source for FileSource {
    fn name(&self) -> String {
        format!("file:{}", self.path.display())
    }

    fn get_value(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Yaml,
    Toml,
    Dotenv,
}

impl Format {
    fn detect(path: &Path) -> Result<Self> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default();
        let segments: Vec<&str> = file_name.split('.').collect();

        let (extension, middle) = match segments.as_slice() {
            [_, middle @ .., last] if !last.is_empty() => (*last, middle),
            _ => return Err(ConfigError::MissingExtension(path.to_path_buf())),
        };

        match extension {
            "json" => Ok(Format::Json),
            "yaml" | "yml" => Ok(Format::Yaml),
            "toml" => Ok(Format::Toml),
            "env" => Ok(Format::Dotenv),
            _ if middle.contains(&"env") => Ok(Format::Dotenv),
            _ => Err(ConfigError::UnsupportedFile(path.to_path_buf())),
        }
    }

    #[allow(unused_variables)]
    fn parse(self, path: &Path, text: &str) -> Result<HashMap<String, String>> {
        match self {
            #[cfg(feature = "json")]
            Format::Json => decode("json", text, |t| {
                serde_json::from_str::<Option<BTreeMap<String, serde_json::Value>>>(t)
            }),
            #[cfg(feature = "yaml")]
            Format::Yaml => decode("yaml", text, |t| {
                serde_yaml::from_str::<Option<BTreeMap<String, serde_yaml::Value>>>(t)
            }),
            #[cfg(feature = "toml")]
            Format::Toml => decode("toml", text, |t| {
                toml::from_str::<BTreeMap<String, toml::Value>>(t).map(Some)
            }),
            #[cfg(feature = "dotenv")]
            Format::Dotenv => dotenvy::from_read_iter(text.as_bytes())
                .collect::<std::result::Result<HashMap<_, _>, _>>()
                .map_err(|e| ConfigError::Parse {
                    format: "env",
                    message: e.to_string(),
                }),
            #[allow(unreachable_patterns)]
            _ => Err(ConfigError::UnsupportedFile(path.to_path_buf())),
        }
    }
}

/// Parse a document and keep its top-level scalars as text.
#[cfg(any(feature = "json", feature = "yaml", feature = "toml"))]
fn decode<V, E>(
    format: &'static str,
    text: &str,
    from_str: impl FnOnce(&str) -> std::result::Result<Option<BTreeMap<String, V>>, E>,
) -> Result<HashMap<String, String>>
where
    V: DeserializeOwned + ScalarText,
    E: Display,
{
    if text.trim().is_empty() {
        return Ok(HashMap::new());
    }

    let document = from_str(text).map_err(|e| ConfigError::Parse {
        format,
        message: e.to_string(),
    })?;

    Ok(document
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(key, value)| value.scalar_text().map(|text| (key, text)))
        .collect())
}

/// Text form of a scalar document value, `None` for anything else.
#[cfg(any(feature = "json", feature = "yaml", feature = "toml"))]
trait ScalarText {
    fn scalar_text(self) -> Option<String>;
}

#[cfg(feature = "json")]
impl ScalarText for serde_json::Value {
    fn scalar_text(self) -> Option<String> {
        match self {
            serde_json::Value::String(s) => Some(s),
            serde_json::Value::Number(n) => Some(n.to_string()),
            serde_json::Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

#[cfg(feature = "yaml")]
impl ScalarText for serde_yaml::Value {
    fn scalar_text(self) -> Option<String> {
        match self {
            serde_yaml::Value::String(s) => Some(s),
            serde_yaml::Value::Number(n) => Some(n.to_string()),
            serde_yaml::Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

#[cfg(feature = "toml")]
impl ScalarText for toml::Value {
    fn scalar_text(self) -> Option<String> {
        match self {
            toml::Value::String(s) => Some(s),
            toml::Value::Integer(i) => Some(i.to_string()),
            toml::Value::Float(f) => Some(f.to_string()),
            toml::Value::Boolean(b) => Some(b.to_string()),
            toml::Value::Datetime(d) => Some(d.to_string()),
            toml::Value::Array(_) | toml::Value::Table(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn get(source: &FileSource, key: &str) -> Option<String> {
        source.get_value(key).unwrap()
    }

    #[test]
    fn test_detect_format() {
        let detect = |name: &str| Format::detect(Path::new(name));
        assert_eq!(detect("config.json").unwrap(), Format::Json);
        assert_eq!(detect("config.yaml").unwrap(), Format::Yaml);
        assert_eq!(detect("config.yml").unwrap(), Format::Yaml);
        assert_eq!(detect("config.toml").unwrap(), Format::Toml);
        assert_eq!(detect(".env").unwrap(), Format::Dotenv);
        assert_eq!(detect(".env.local").unwrap(), Format::Dotenv);
        assert_eq!(detect("config.env").unwrap(), Format::Dotenv);
        assert_eq!(detect("dir.v2/app.env.production").unwrap(), Format::Dotenv);
    }

    #[test]
    fn test_detect_missing_extension() {
        assert!(matches!(
            Format::detect(Path::new("Makefile")),
            Err(ConfigError::MissingExtension(_))
        ));
        assert!(matches!(
            Format::detect(Path::new("config.")),
            Err(ConfigError::MissingExtension(_))
        ));
    }

    #[test]
    fn test_detect_unsupported() {
        assert!(matches!(
            Format::detect(Path::new("config.txt")),
            Err(ConfigError::UnsupportedFile(_))
        ));
        assert!(matches!(
            Format::detect(Path::new("environment.txt")),
            Err(ConfigError::UnsupportedFile(_))
        ));
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_json_scalars() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "config.json",
            r#"{
                "host": "localhost",
                "port": 8080,
                "ratio": 1.5,
                "debug": true,
                "database": {"host": "db.local"},
                "servers": ["a", "b"],
                "nothing": null
            }"#,
        );

        let source = FileSource::from_file(&path).unwrap();
        assert_eq!(get(&source, "host").as_deref(), Some("localhost"));
        assert_eq!(get(&source, "port").as_deref(), Some("8080"));
        assert_eq!(get(&source, "ratio").as_deref(), Some("1.5"));
        assert_eq!(get(&source, "debug").as_deref(), Some("true"));
        assert_eq!(get(&source, "database"), None);
        assert_eq!(get(&source, "servers"), None);
        assert_eq!(get(&source, "nothing"), None);
        assert_eq!(source.name(), format!("file:{}", path.display()));
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "invalid.json", "{invalid json}");
        assert!(matches!(
            FileSource::from_file(path),
            Err(ConfigError::Parse { format: "json", .. })
        ));
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn test_yaml_scalars() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "config.yml",
            "host: localhost\nport: 8080\ndebug: false\ndatabase:\n  host: db.local\nservers:\n  - a\n",
        );

        let source = FileSource::from_file(path).unwrap();
        assert_eq!(get(&source, "host").as_deref(), Some("localhost"));
        assert_eq!(get(&source, "port").as_deref(), Some("8080"));
        assert_eq!(get(&source, "debug").as_deref(), Some("false"));
        assert_eq!(get(&source, "database"), None);
        assert_eq!(get(&source, "servers"), None);
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn test_invalid_yaml() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "invalid.yaml", "invalid:\n  - yaml\n - bad indent");
        assert!(matches!(
            FileSource::from_file(path),
            Err(ConfigError::Parse { format: "yaml", .. })
        ));
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn test_empty_yaml() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "empty.yaml", "");
        let source = FileSource::from_file(path).unwrap();
        assert_eq!(get(&source, "host"), None);
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_toml_scalars() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "config.toml",
            "host = \"localhost\"\nport = 8080\n\n[database]\nhost = \"db.local\"\n",
        );

        let source = FileSource::from_file(path).unwrap();
        assert_eq!(get(&source, "host").as_deref(), Some("localhost"));
        assert_eq!(get(&source, "port").as_deref(), Some("8080"));
        assert_eq!(get(&source, "database"), None);
    }

    #[cfg(feature = "dotenv")]
    #[test]
    fn test_dotenv_files() {
        let dir = TempDir::new().unwrap();
        for name in [".env", ".env.local", "config.env"] {
            let path = write(&dir, name, "HOST=localhost\nPORT=8080\n# comment\n");
            let source = FileSource::from_file(path).unwrap();
            assert_eq!(get(&source, "HOST").as_deref(), Some("localhost"));
            assert_eq!(get(&source, "PORT").as_deref(), Some("8080"));
        }
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            FileSource::from_file("/nonexistent/file.json"),
            Err(ConfigError::FileRead { .. })
        ));
    }

    #[test]
    fn test_unsupported_file() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "config.txt", "content");
        assert!(matches!(
            FileSource::from_file(path),
            Err(ConfigError::UnsupportedFile(_))
        ));
    }
}
