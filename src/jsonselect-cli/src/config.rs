//! Configuration management for jsel
//!
//! Settings are layered: built-in defaults, then the first configuration file
//! found (or the one given with `--config`), then `JSEL_*` environment
//! variables, then command-line flags.

use crate::cli::CliConfig;
use jsonselect::ExecutorConfig;

use serde::Deserialize;
use thiserror::Error;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// File names searched for in each configuration directory, in priority order
pub const CONFIG_NAMES: [&str; 4] = ["jsel.toml", ".jsel.toml", "jsel.yaml", ".jsel.yaml"];

/// Result type alias for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("Failed to read config file {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    /// Invalid TOML content
    #[error("Invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid YAML content
    #[error("Invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The file extension names no supported format
    #[error("Unsupported config file format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
}

/// Main configuration structure for jsel
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// How matches are printed
    pub output: OutputConfig,
    /// How selectors are run
    pub select: SelectConfig,
    /// Debug and diagnostic configuration
    pub debug: DebugConfig,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Print each match on one line
    pub compact: bool,
    /// Print strings without JSON quoting
    pub raw_output: bool,
    /// Spaces per indentation level in pretty output
    pub indent: usize,
}

/// Selector execution configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SelectConfig {
    /// Stop at the first match
    pub first_only: bool,
    /// Number of parsed selectors kept in the cache
    pub cache_size: usize,
}

/// Debug configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Verbosity level
    pub verbosity: u8,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            compact: false,
            raw_output: false,
            indent: 2,
        }
    }
}

impl Default for SelectConfig {
    fn default() -> Self {
        Self {
            first_only: false,
            cache_size: ExecutorConfig::default().cache_size,
        }
    }
}

impl Config {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from the standard locations and the environment
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        if let Some(config_path) = Self::find_config_file(&current_dir, dirs::home_dir().as_deref())
        {
            log::debug!("using config file {}", config_path.display());
            config.merge_file(&config_path)?;
        }

        config.merge_env();

        Ok(config)
    }

    /// Find the configuration file: `current_dir` first, then
    /// `$HOME/.config/jsel`, then `$HOME`
    pub fn find_config_file(current_dir: &Path, home: Option<&Path>) -> Option<PathBuf> {
        let mut search_dirs = vec![current_dir.to_path_buf()];
        if let Some(home) = home {
            search_dirs.push(home.join(".config").join("jsel"));
            search_dirs.push(home.to_path_buf());
        }

        search_dirs.iter()
            .flat_map(|dir| CONFIG_NAMES.iter().map(move |name| dir.join(name)))
            .find(|path| path.exists())
            .map(|path| path.canonicalize().unwrap_or(path))
    }

    /// Merge configuration from file
    pub fn merge_file(&mut self, path: &Path) -> Result<()> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let file_config: Config = match extension(path) {
            "toml" => toml::from_str(&content)?,
            "yaml" | "yml" => serde_yaml::from_str(&content)?,
            _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        };
        self.merge(file_config);

        Ok(())
    }

    /// Merge configuration from environment variables
    pub fn merge_env(&mut self) {
        self.merge_env_with_reader(|key| std::env::var(key).ok());
    }

    /// Merge configuration from environment variables with custom reader
    pub fn merge_env_with_reader<F>(&mut self, env_reader: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = env_reader("JSEL_COMPACT") {
            self.output.compact = parse_flag(&val);
        }

        if let Some(val) = env_reader("JSEL_RAW_OUTPUT") {
            self.output.raw_output = parse_flag(&val);
        }

        if let Some(val) = env_reader("JSEL_VERBOSITY") {
            self.debug.verbosity = val.parse().unwrap_or(DebugConfig::default().verbosity);
        }
    }

    /// Merge another config into this one, taking every non-default value
    fn merge(&mut self, other: Config) {
        let output = OutputConfig::default();
        if other.output.compact != output.compact {
            self.output.compact = other.output.compact;
        }
        if other.output.raw_output != output.raw_output {
            self.output.raw_output = other.output.raw_output;
        }
        if other.output.indent != output.indent {
            self.output.indent = other.output.indent;
        }

        let select = SelectConfig::default();
        if other.select.first_only != select.first_only {
            self.select.first_only = other.select.first_only;
        }
        if other.select.cache_size != select.cache_size {
            self.select.cache_size = other.select.cache_size;
        }

        if other.debug.verbosity != DebugConfig::default().verbosity {
            self.debug.verbosity = other.debug.verbosity;
        }
    }

    /// Apply CLI configuration overrides; flags left off keep the lower layers
    pub fn apply_cli(&mut self, cli_config: &CliConfig) {
        if cli_config.compact_output {
            self.output.compact = true;
        }
        if cli_config.raw_output {
            self.output.raw_output = true;
        }
        if let Some(indent) = cli_config.indent {
            self.output.indent = indent;
        }
        if cli_config.first_only {
            self.select.first_only = true;
        }
        if cli_config.verbose > 0 {
            self.debug.verbosity = cli_config.verbose;
        }
    }

    /// Convert to the matcher's executor configuration
    pub fn to_executor_config(&self) -> ExecutorConfig {
        ExecutorConfig {
            cache_size: self.select.cache_size,
            collect_stats: self.debug.verbosity > 0,
        }
    }
}

fn extension(path: &Path) -> &str {
    path.extension().and_then(|ext| ext.to_str()).unwrap_or("")
}

fn parse_flag(val: &str) -> bool {
    val != "0" && val.to_lowercase() != "false"
}
