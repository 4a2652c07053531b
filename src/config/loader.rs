//! Configuration file loading and saving.
//!
//! Loads the configuration from TOML or YAML, detected by file extension.
//! A missing file at the default location is not an error: the built-in
//! defaults apply. A missing file that was asked for explicitly is.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, trace};

use crate::error::{Result, ResultExt, ThemeError};

use super::path::{PathResolver, default_config_path};
use super::schema::AppConfig;

/// Configuration file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML format (.yaml, .yml).
    Yaml,
    /// TOML format (.toml).
    Toml,
}

impl ConfigFormat {
    /// Detect format from file extension.
    ///
    /// Returns `None` if the extension is not recognized.
    #[must_use]
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        trace!(extension = %ext, "Detecting config format from extension");
        match ext.to_lowercase().as_str() {
            "yaml" | "yml" => Some(Self::Yaml),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }

    fn detect(path: &Path) -> Result<Self> {
        Self::from_extension(path).ok_or_else(|| {
            ThemeError::ConfigParse(format!(
                "Unknown config format for '{}': expected .yaml, .yml, or .toml",
                path.display()
            ))
        })
    }
}

/// A configuration together with where it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: AppConfig,
    /// Path the config was (or would have been) read from.
    pub path: PathBuf,
    /// False when built-in defaults are in use.
    pub from_file: bool,
}

impl LoadedConfig {
    /// Resolver for paths inside this config.
    pub fn resolver(&self) -> Result<PathResolver> {
        PathResolver::new(&self.path)
    }

    /// Status file location with `~` and relative paths resolved.
    pub fn status_path(&self) -> Result<PathBuf> {
        self.resolver()?.resolve(&self.config.status_file)
    }
}

/// Load the configuration for a run.
///
/// With `explicit` set, the file must exist. Otherwise the default location
/// is tried and defaults are used when nothing is there.
#[instrument(skip_all, fields(explicit = ?explicit))]
pub fn load_or_default(explicit: Option<&Path>) -> Result<LoadedConfig> {
    if let Some(path) = explicit {
        let config = load_config(path)?;
        return Ok(LoadedConfig {
            config,
            path: path.to_path_buf(),
            from_file: true,
        });
    }

    let path = default_config_path()?;
    if path.is_file() {
        let config = load_config(&path)?;
        return Ok(LoadedConfig {
            config,
            path,
            from_file: true,
        });
    }

    debug!(path = %path.display(), "No config file, using built-in defaults");
    Ok(LoadedConfig {
        config: AppConfig::default(),
        path,
        from_file: false,
    })
}

/// Load a configuration from a file.
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be read
/// - The format cannot be detected from the extension
/// - The file content cannot be parsed
/// - Validation fails
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path = path.as_ref();
    info!("Loading configuration file");

    let format = ConfigFormat::detect(path)?;
    debug!(format = ?format, "Detected config format");

    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ThemeError::ConfigNotFound {
                path: path.display().to_string(),
            }
        } else {
            ThemeError::Io(e)
        }
    })?;
    debug!(bytes = content.len(), "Read config file");

    load_config_from_str(&content, format)
}

/// Load a configuration from a string with a specified format.
#[instrument(skip(content), fields(format = ?format, content_len = content.len()))]
pub fn load_config_from_str(content: &str, format: ConfigFormat) -> Result<AppConfig> {
    let config: AppConfig = match format {
        ConfigFormat::Yaml => {
            // An empty YAML document is null, not an empty map
            if content.trim().is_empty() {
                AppConfig::default()
            } else {
                serde_yaml::from_str(content)
                    .map_err(|e| ThemeError::ConfigParse(format!("YAML: {e}")))?
            }
        }
        ConfigFormat::Toml => {
            toml::from_str(content).map_err(|e| ThemeError::ConfigParse(format!("TOML: {e}")))?
        }
    };

    config.validate()?;

    info!(
        targets = config.targets.len(),
        reload = config.reload.enabled,
        status_file = %config.status_file.display(),
        "Configuration loaded and validated"
    );
    Ok(config)
}

/// Save a configuration to a file, creating parent directories.
#[instrument(skip(config), fields(path = %path.as_ref().display()))]
pub fn save_config<P: AsRef<Path>>(config: &AppConfig, path: P) -> Result<()> {
    let path = path.as_ref();
    info!("Saving configuration file");

    let content = render_config(config, ConfigFormat::detect(path)?)?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write config {}", path.display()))?;

    info!(
        bytes = path.metadata().map(|m| m.len()).unwrap_or(0),
        "Configuration saved"
    );
    Ok(())
}

/// Serialize a configuration in the given format.
pub fn render_config(config: &AppConfig, format: ConfigFormat) -> Result<String> {
    match format {
        ConfigFormat::Yaml => serde_yaml::to_string(config)
            .map_err(|e| ThemeError::ConfigParse(format!("YAML: {e}"))),
        ConfigFormat::Toml => toml::to_string_pretty(config)
            .map_err(|e| ThemeError::ConfigParse(format!("TOML: {e}"))),
    }
}
