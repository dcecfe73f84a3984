//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and environment fallbacks.

use clap::Parser;
use std::path::PathBuf;

/// Codexa Reviewer - AI code review dashboard
///
/// Serves a small web dashboard that forwards code to the Codexa
/// analysis engine and falls back to local heuristics when the engine
/// is unreachable.
///
/// Examples:
///   codexa-reviewer
///   codexa-reviewer --port 8080 --api-base http://localhost:7071/api
///   codexa-reviewer --offline
///   codexa-reviewer --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Interface to listen on (default: 0.0.0.0)
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Port to listen on (default: 5000)
    #[arg(short, long, env = "PORT", value_name = "PORT")]
    pub port: Option<u16>,

    /// Base URL of the Codexa engine API
    #[arg(long, env = "CODEXA_API_BASE", value_name = "URL")]
    pub api_base: Option<String>,

    /// Shared secret sent to the engine as x-functions-key
    #[arg(long, env = "CODEXA_FUNCTION_KEY", hide_env_values = true, value_name = "KEY")]
    pub function_key: Option<String>,

    /// Engine request timeout in seconds (default: 10)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Maximum analyses kept in memory (default: 50)
    #[arg(long, value_name = "COUNT")]
    pub capacity: Option<usize>,

    /// Never call the engine; score with local heuristics only
    #[arg(long)]
    pub offline: bool,

    /// Path to configuration file
    ///
    /// If not specified, looks for .codexa.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .codexa.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if let Some(ref api_base) = self.api_base {
            if !api_base.is_empty()
                && !api_base.starts_with("http://")
                && !api_base.starts_with("https://")
            {
                return Err("API base URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        if let Some(capacity) = self.capacity {
            if capacity == 0 {
                return Err("Capacity must be at least 1".to_string());
            }
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref config_path) = self.config {
            if !config_path.is_file() {
                return Err(format!(
                    "Config file does not exist: {}",
                    config_path.display()
                ));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn make_args() -> Args {
        Args {
            host: None,
            port: None,
            api_base: None,
            function_key: None,
            timeout: None,
            capacity: None,
            offline: false,
            config: None,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    #[test]
    fn test_validation_defaults_ok() {
        assert!(make_args().validate().is_ok());
    }

    #[test]
    fn test_validation_invalid_url() {
        let mut args = make_args();
        args.api_base = Some("ftp://engine".to_string());
        assert!(args.validate().is_err());

        args.api_base = Some("http://localhost:7071/api".to_string());
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_zero_values() {
        let mut args = make_args();
        args.timeout = Some(0);
        assert!(args.validate().is_err());

        let mut args = make_args();
        args.capacity = Some(0);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_missing_config() {
        let mut args = make_args();
        args.config = Some(PathBuf::from("/definitely/not/here.toml"));
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }

    #[test]
    fn test_parse_flags() {
        let args = Args::try_parse_from([
            "codexa-reviewer",
            "--port",
            "8081",
            "--offline",
            "--capacity",
            "10",
        ])
        .unwrap();
        assert_eq!(args.port, Some(8081));
        assert!(args.offline);
        assert_eq!(args.capacity, Some(10));
    }
}
