//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.codexa.toml` files.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name.
pub const CONFIG_FILE: &str = ".codexa.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Codexa engine settings.
    #[serde(default)]
    pub remote: RemoteConfig,

    /// Analysis store settings.
    #[serde(default)]
    pub store: StoreConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to listen on.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

/// Codexa engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Base URL of the engine API.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Shared secret sent as `x-functions-key`.
    #[serde(default)]
    pub function_key: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Skip the engine entirely and score locally.
    #[serde(default)]
    pub offline: bool,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            function_key: None,
            timeout_seconds: default_timeout(),
            offline: false,
        }
    }
}

fn default_api_base() -> String {
    "https://codexa-engine-func.azurewebsites.net/api".to_string()
}

fn default_timeout() -> u64 {
    10
}

/// Analysis store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Maximum analyses kept in memory.
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
        }
    }
}

fn default_capacity() -> usize {
    crate::store::DEFAULT_CAPACITY
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load `.codexa.toml` from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments (and their environment fallbacks) take precedence
    /// over config file settings when explicitly provided.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref host) = args.host {
            self.server.host = host.clone();
        }
        if let Some(port) = args.port {
            self.server.port = port;
        }

        if let Some(ref api_base) = args.api_base {
            self.remote.api_base = api_base.clone();
        }
        if let Some(ref key) = args.function_key {
            self.remote.function_key = Some(key.clone());
        }
        if let Some(timeout) = args.timeout {
            self.remote.timeout_seconds = timeout;
        }
        if args.offline {
            self.remote.offline = true;
        }

        if let Some(capacity) = args.capacity {
            self.store.capacity = capacity;
        }
    }

    /// Check the merged settings.
    ///
    /// The CLI validates its own flags; this catches the same mistakes
    /// when they come from the config file.
    pub fn validate(&self) -> Result<()> {
        let api_base = self.remote.api_base.trim();
        if !api_base.is_empty()
            && !api_base.starts_with("http://")
            && !api_base.starts_with("https://")
        {
            bail!(
                "remote.api_base must start with 'http://' or 'https://' (got '{}')",
                api_base
            );
        }

        if self.remote.timeout_seconds == 0 {
            bail!("remote.timeout_seconds must be at least 1");
        }

        if self.store.capacity == 0 {
            bail!("store.capacity must be at least 1");
        }

        Ok(())
    }

    /// Whether outbound calls to the engine should be attempted.
    pub fn use_remote(&self) -> bool {
        !self.remote.offline && !self.remote.api_base.trim().is_empty()
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::tests::make_args;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.remote.timeout_seconds, 10);
        assert_eq!(config.store.capacity, 50);
        assert!(config.use_remote());
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[server]
port = 8080

[remote]
api_base = "http://localhost:7071/api"
function_key = "abc"
timeout_seconds = 3

[store]
capacity = 20
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.remote.api_base, "http://localhost:7071/api");
        assert_eq!(config.remote.function_key.as_deref(), Some("abc"));
        assert_eq!(config.remote.timeout_seconds, 3);
        assert_eq!(config.store.capacity, 20);
    }

    #[test]
    fn test_load_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load_from_dir(dir.path()).unwrap().is_none());

        let mut file = std::fs::File::create(dir.path().join(CONFIG_FILE)).unwrap();
        writeln!(file, "[remote]\noffline = true").unwrap();

        let config = Config::load_from_dir(dir.path()).unwrap().unwrap();
        assert!(config.remote.offline);
        assert!(!config.use_remote());
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[server]\nport = \"not a number\"").unwrap();

        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_merge_with_args() {
        let mut config = Config::default();
        let mut args = make_args();
        args.port = Some(9000);
        args.api_base = Some("http://engine:7071/api".to_string());
        args.capacity = Some(5);

        config.merge_with_args(&args);

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.remote.api_base, "http://engine:7071/api");
        assert_eq!(config.remote.timeout_seconds, 10);
        assert_eq!(config.store.capacity, 5);
    }

    #[test]
    fn test_validate_defaults_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_capacity_from_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "[store]\ncapacity = 0\n").unwrap();

        let config = Config::load_from_dir(dir.path()).unwrap().unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("store.capacity"));
    }

    #[test]
    fn test_validate_rejects_zero_timeout_from_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "[remote]\ntimeout_seconds = 0\n",
        )
        .unwrap();

        let config = Config::load_from_dir(dir.path()).unwrap().unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("remote.timeout_seconds"));
    }

    #[test]
    fn test_validate_rejects_bad_scheme_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[remote]\napi_base = \"ftp://engine\"\n").unwrap();

        assert!(Config::load(&path).unwrap().validate().is_err());
    }

    #[test]
    fn test_cli_overrides_invalid_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[store]\ncapacity = 0\n").unwrap();

        let mut config = Config::load(&path).unwrap();
        let mut args = make_args();
        args.capacity = Some(10);
        config.merge_with_args(&args);

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_api_base_disables_remote() {
        let mut config = Config::default();
        config.remote.api_base = "  ".to_string();
        assert!(!config.use_remote());
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[server]"));
        assert!(toml_str.contains("[remote]"));
        assert!(toml_str.contains("[store]"));
    }
}
