//! Configuration types for the tempshot server.
//!
//! This module loads and validates settings from a TOML file. It includes:
//!
//! - [`Config`] - Root configuration struct
//! - [`ServerConfig`] - HTTP listener and public URL
//! - [`UploadConfig`] - Upload directory and limits
//! - [`ImageConfig`] - Retention window
//! - [`StorageConfig`] - Startup behaviour of the storage directory
//!
//! Every field has a default, so an empty file (or no file) is valid.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants;

/// Result of configuration validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Non-fatal warnings that should be logged but don't prevent operation.
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// Returns true if there are any warnings.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// tempshot.toml configuration structure.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_format: LogFormat,
    pub server: ServerConfig,
    pub upload: UploadConfig,
    pub image: ImageConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Base for absolute URLs in responses. Derived from the `Host` header when unset.
    pub public_url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: constants::DEFAULT_HOST.to_string(),
            port: constants::DEFAULT_PORT,
            public_url: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub dir: PathBuf,
    pub max_file_size: usize,
    pub allowed_mime_prefix: String,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(constants::DEFAULT_UPLOAD_DIR),
            max_file_size: constants::DEFAULT_MAX_FILE_SIZE,
            allowed_mime_prefix: constants::DEFAULT_ALLOWED_MIME_PREFIX.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    pub ttl_secs: u64,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            ttl_secs: constants::DEFAULT_TTL_SECS,
        }
    }
}

impl ImageConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Delete files left in the upload directory by a previous run.
    pub sweep_on_start: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            sweep_on_start: true,
        }
    }
}

impl Config {
    /// Load configuration from the specified path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read (IO error)
    /// - The file contains invalid TOML syntax
    /// - Fields have invalid types
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load from an explicit path, or from `tempshot.toml` if it exists,
    /// or fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit path is missing, or if any chosen file
    /// fails to parse.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => {
                let default_path = Path::new(constants::DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::load_from(default_path)
                } else {
                    Ok(Self::default())
                }
            },
        }
    }

    /// Apply overrides from environment variables:
    /// `PORT`, `TEMPSHOT_TTL_SECS`, `TEMPSHOT_UPLOAD_DIR`.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable does not parse.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    fn apply_env_from(&mut self, get: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(port) = get("PORT").filter(|v| !v.is_empty()) {
            self.server.port = port
                .parse()
                .with_context(|| format!("Invalid PORT value: {port}"))?;
        }
        if let Some(ttl) = get("TEMPSHOT_TTL_SECS").filter(|v| !v.is_empty()) {
            self.image.ttl_secs = ttl
                .parse()
                .with_context(|| format!("Invalid TEMPSHOT_TTL_SECS value: {ttl}"))?;
        }
        if let Some(dir) = get("TEMPSHOT_UPLOAD_DIR").filter(|v| !v.is_empty()) {
            self.upload.dir = PathBuf::from(dir);
        }
        Ok(())
    }

    /// Validate configuration.
    ///
    /// Returns a `ValidationResult` containing any non-fatal warnings.
    ///
    /// # Errors
    ///
    /// Returns an error listing every invalid setting:
    /// - Port 0
    /// - Zero TTL or zero maximum file size
    /// - Empty upload directory or MIME prefix
    /// - Public URL without an http(s) scheme
    pub fn validate(&self) -> Result<ValidationResult> {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        if self.server.port == 0 {
            errors.push(
                "server.port cannot be 0. Use a valid port number (1-65535)".to_string(),
            );
        } else if self.server.port < 1024 {
            warnings.push(format!(
                "server.port {} is a system/privileged port (< 1024)",
                self.server.port
            ));
        }

        if let Some(raw) = &self.server.public_url {
            match url::Url::parse(raw) {
                Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {},
                Ok(_) => errors.push(format!(
                    "server.public_url must be an http:// or https:// URL (got: '{raw}')"
                )),
                Err(e) => errors.push(format!("server.public_url is invalid: {e} (got: '{raw}')")),
            }
        }

        if self.image.ttl_secs == 0 {
            errors.push("image.ttl_secs cannot be 0".to_string());
        } else if self.image.ttl_secs > constants::LONG_TTL_WARNING_SECS {
            warnings.push(format!(
                "image.ttl_secs {} keeps images for more than 24 hours",
                self.image.ttl_secs
            ));
        }

        if self.upload.max_file_size == 0 {
            errors.push("upload.max_file_size cannot be 0".to_string());
        }

        if self.upload.dir.as_os_str().is_empty() {
            errors.push("upload.dir cannot be empty".to_string());
        }

        if self.upload.allowed_mime_prefix.is_empty() {
            errors.push("upload.allowed_mime_prefix cannot be empty".to_string());
        }

        if !errors.is_empty() {
            anyhow::bail!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            );
        }

        Ok(ValidationResult { warnings })
    }
}
