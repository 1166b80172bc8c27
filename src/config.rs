//! Configuration - where to find FreeType and how to log
//!
//! Read from TOML; every field has a default so an empty file is valid.
//!
//! ```toml
//! [library]
//! path = "/opt/freetype/lib/libfreetype.so.6"
//! allow_process_symbols = false
//!
//! [logging]
//! level = "debug"
//! json = true
//! ```

use crate::logging::{self, LogConfig};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

/// Environment variable naming a configuration file
pub const CONFIG_ENV: &str = "FTBIND_CONFIG";
/// Environment variable naming the FreeType library to load
pub const LIBRARY_ENV: &str = "FTBIND_LIBRARY";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub library: LibraryConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryConfig {
    /// Exact library to load; disables the search below
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Names or paths tried in order
    #[serde(default = "default_search_names")]
    pub search_names: Vec<String>,

    /// Fall back to FreeType symbols already linked into the process
    #[serde(default = "default_true")]
    pub allow_process_symbols: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,

    #[serde(default)]
    pub file: Option<PathBuf>,

    #[serde(default)]
    pub json: bool,

    #[serde(default)]
    pub spans: bool,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            path: None,
            search_names: default_search_names(),
            allow_process_symbols: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            file: None,
            json: false,
            spans: false,
        }
    }
}

fn default_true() -> bool { true }
fn default_level() -> String { "info".to_string() }

#[cfg(target_os = "linux")]
fn default_search_names() -> Vec<String> {
    ["libfreetype.so.6", "libfreetype.so"].map(String::from).to_vec()
}

#[cfg(target_os = "macos")]
fn default_search_names() -> Vec<String> {
    [
        "libfreetype.6.dylib",
        "libfreetype.dylib",
        "/opt/homebrew/lib/libfreetype.6.dylib",
        "/usr/local/lib/libfreetype.6.dylib",
    ]
    .map(String::from)
    .to_vec()
}

#[cfg(windows)]
fn default_search_names() -> Vec<String> {
    ["freetype.dll", "libfreetype-6.dll"].map(String::from).to_vec()
}

#[cfg(not(any(target_os = "linux", target_os = "macos", windows)))]
fn default_search_names() -> Vec<String> {
    ["libfreetype.so.6", "libfreetype.so"].map(String::from).to_vec()
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;

        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// File named by `FTBIND_CONFIG` (defaults otherwise), then env overrides
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    /// Apply environment overrides
    pub fn apply_env(&mut self) {
        self.apply_overrides(|name| std::env::var_os(name));
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<OsString>) {
        if let Some(path) = var(LIBRARY_ENV).filter(|p| !p.is_empty()) {
            self.library.path = Some(PathBuf::from(path));
        }
    }
}

impl LoggingConfig {
    fn level(&self) -> Level {
        logging::parse_level(&self.level).unwrap_or(Level::INFO)
    }
}

impl From<&LoggingConfig> for LogConfig {
    fn from(config: &LoggingConfig) -> Self {
        Self {
            level: config.level(),
            file_output: config.file.is_some(),
            log_path: config.file.clone(),
            json_format: config.json,
            show_spans: config.spans,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert!(config.library.path.is_none());
        assert!(config.library.allow_process_symbols);
        assert!(!config.library.search_names.is_empty());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn sections_override_defaults() {
        let config = Config::from_toml_str(
            r#"
            [library]
            search_names = ["libfreetype-custom.so"]
            allow_process_symbols = false

            [logging]
            level = "trace"
            json = true
            "#,
        )
        .unwrap();

        assert_eq!(config.library.search_names, vec!["libfreetype-custom.so"]);
        assert!(!config.library.allow_process_symbols);
        assert!(config.logging.json);

        let log = LogConfig::from(&config.logging);
        assert_eq!(log.level, Level::TRACE);
        assert!(log.json_format);
        assert!(!log.file_output);
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = Config::from_toml_str("[library\npath = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn reads_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[library]\npath = \"/opt/ft/libfreetype.so.6\"").unwrap();
        writeln!(file, "[logging]\nfile = \"ftbind.log\"").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.library.path, Some(PathBuf::from("/opt/ft/libfreetype.so.6")));

        let log = LogConfig::from(&config.logging);
        assert!(log.file_output);
        assert_eq!(log.log_path, Some(PathBuf::from("ftbind.log")));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::from_file(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("absent.toml"));
    }

    #[test]
    fn library_override_replaces_path() {
        let mut config = Config::default();
        config.apply_overrides(|name| (name == LIBRARY_ENV).then(|| OsString::from("/tmp/libft.so")));
        assert_eq!(config.library.path, Some(PathBuf::from("/tmp/libft.so")));

        let mut untouched = Config::default();
        untouched.apply_overrides(|_| Some(OsString::new()));
        assert!(untouched.library.path.is_none());
    }

    #[test]
    fn unknown_level_falls_back_to_info() {
        let logging = LoggingConfig { level: "chatty".into(), ..LoggingConfig::default() };
        assert_eq!(LogConfig::from(&logging).level, Level::INFO);
    }
}
