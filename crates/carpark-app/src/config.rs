//! Configuration management for carpark
//!
//! Config stored at: ~/.config/carpark/config.toml

use carpark_domain::model::tariff::DEFAULT_RATE_PER_HOUR;
use carpark_types::{ConfigError, OutputFormat, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Plate reader settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReaderConfig {
    /// Recognition backend (gemini, command)
    #[serde(default = "default_reader_backend")]
    pub backend: String,

    /// Gemini model override
    #[serde(default)]
    pub model: Option<String>,

    /// Local OCR command line, image path is appended
    #[serde(default)]
    pub command: Option<String>,

    /// Gemini API key (GEMINI_API_KEY takes precedence)
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Vehicle registry settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Registry backend (rto-api, vehicle-master, none)
    #[serde(default = "default_registry_backend")]
    pub backend: String,

    /// RapidAPI host override
    #[serde(default)]
    pub host: Option<String>,

    /// RapidAPI key (RAPIDAPI_KEY takes precedence)
    #[serde(default)]
    pub api_key: Option<String>,

    /// TOML vehicle master for the vehicle-master backend
    #[serde(default)]
    pub vehicles_file: Option<PathBuf>,
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Address the HTTP server binds to
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Charge per started hour
    #[serde(default = "default_rate_per_hour")]
    pub rate_per_hour: i64,

    /// Session store directory override
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Upload staging directory override
    #[serde(default)]
    pub upload_dir: Option<PathBuf>,

    /// Enable recognition caching
    #[serde(default = "default_true")]
    pub cache_enabled: bool,

    /// Cache directory override
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,

    /// Default output format (json, table)
    #[serde(default = "default_output_format")]
    pub output_format: OutputFormat,

    #[serde(default)]
    pub reader: ReaderConfig,

    #[serde(default)]
    pub registry: RegistryConfig,
}

fn default_bind_address() -> String {
    "0.0.0.0:4000".to_string()
}

fn default_rate_per_hour() -> i64 {
    DEFAULT_RATE_PER_HOUR
}

fn default_true() -> bool {
    true
}

fn default_output_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_reader_backend() -> String {
    "gemini".to_string()
}

fn default_registry_backend() -> String {
    "rto-api".to_string()
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            backend: default_reader_backend(),
            model: None,
            command: None,
            api_key: None,
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            backend: default_registry_backend(),
            host: None,
            api_key: None,
            vehicles_file: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            rate_per_hour: default_rate_per_hour(),
            data_dir: None,
            upload_dir: None,
            cache_enabled: true,
            cache_dir: None,
            output_format: default_output_format(),
            reader: ReaderConfig::default(),
            registry: RegistryConfig::default(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NotFound)?
            .join("carpark");
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Directory holding sessions.json
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.data_dir {
            return Ok(dir.clone());
        }

        let data_dir = dirs::data_dir()
            .ok_or(ConfigError::NotFound)?
            .join("carpark");
        Ok(data_dir)
    }

    /// Directory uploads are staged in while being read
    pub fn upload_dir(&self) -> PathBuf {
        self.upload_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("carpark-uploads"))
    }

    /// Get the cache directory path
    pub fn cache_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.cache_dir {
            return Ok(dir.clone());
        }

        let cache_dir = dirs::cache_dir()
            .ok_or(ConfigError::NotFound)?
            .join("carpark");
        Ok(cache_dir)
    }

    /// Load config from the default location, or defaults, then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load config from a TOML file, or create default when it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))?;

        if config.rate_per_hour < 0 {
            return Err(ConfigError::ParseError(format!(
                "{}: rate_per_hour cannot be negative (got {})",
                path.display(),
                config.rate_per_hour
            ))
            .into());
        }
        Ok(config)
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save config to a TOML file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::SaveError(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply environment overrides
    ///
    /// `lookup` is `std::env::var` in production; tests pass a map.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.bind_address = format!("0.0.0.0:{port}");
        }
        if let Some(bind) = lookup("CARPARK_BIND") {
            self.bind_address = bind;
        }
        if let Some(dir) = lookup("CARPARK_DATA_DIR") {
            self.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(key) = lookup("GEMINI_API_KEY") {
            self.reader.api_key = Some(key);
        }
        if let Some(key) = lookup("RAPIDAPI_KEY") {
            self.registry.api_key = Some(key);
        }
    }
}

fn masked(secret: &Option<String>) -> &'static str {
    if secret.as_deref().is_some_and(|s| !s.is_empty()) {
        "(set)"
    } else {
        "(not set)"
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Carpark Configuration")?;
        writeln!(f, "=====================")?;
        writeln!(f)?;
        writeln!(f, "Bind address:   {}", self.bind_address)?;
        writeln!(f, "Rate per hour:  {}", self.rate_per_hour)?;
        writeln!(
            f,
            "Data dir:       {}",
            self.data_dir()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "(error)".to_string())
        )?;
        writeln!(f, "Upload dir:     {}", self.upload_dir().display())?;
        writeln!(f, "Cache enabled:  {}", self.cache_enabled)?;
        writeln!(
            f,
            "Cache dir:      {}",
            self.cache_dir()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "(error)".to_string())
        )?;
        writeln!(f, "Output format:  {}", self.output_format)?;
        writeln!(f)?;
        writeln!(f, "Reader:         {}", self.reader.backend)?;
        writeln!(
            f,
            "  Model:        {}",
            self.reader.model.as_deref().unwrap_or("(default)")
        )?;
        writeln!(
            f,
            "  Command:      {}",
            self.reader.command.as_deref().unwrap_or("(none)")
        )?;
        writeln!(f, "  API key:      {}", masked(&self.reader.api_key))?;
        writeln!(f, "Registry:       {}", self.registry.backend)?;
        writeln!(f, "  API key:      {}", masked(&self.registry.api_key))?;
        if let Some(ref file) = self.registry.vehicles_file {
            writeln!(f, "  Vehicles:     {}", file.display())?;
        }

        if let Ok(path) = Self::config_path() {
            writeln!(f)?;
            writeln!(f, "Config file:    {}", path.display())?;
        }

        Ok(())
    }
}
