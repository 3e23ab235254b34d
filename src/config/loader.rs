//! Loading booth configuration from TOML or YAML files.

use std::path::Path;

use tracing::{debug, info, instrument, trace};

use super::path::PathResolver;
use super::schema::BoothConfig;
use crate::error::{BoothError, Result};

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
}

/// Load and validate a booth configuration file.
///
/// Relative `paths.assets` / `paths.output` entries are resolved against the
/// file's directory.
///
/// # Errors
///
/// Returns an error if:
/// - The format cannot be detected from the extension
/// - The file cannot be read
/// - The content cannot be parsed
/// - Validation fails
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<BoothConfig> {
    let path = path.as_ref();
    info!("Loading configuration file");

    let format = ConfigFormat::from_extension(path).ok_or_else(|| {
        BoothError::ConfigParse(format!(
            "Unknown config format for '{}': expected .yaml, .yml, or .toml",
            path.display()
        ))
    })?;

    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            BoothError::ConfigNotFound {
                path: path.display().to_string(),
            }
        } else {
            BoothError::Io(e)
        }
    })?;
    debug!(bytes = content.len(), format = ?format, "Read config file");

    let mut config = load_config_from_str(&content, format)?;

    let resolver = PathResolver::new(path)?;
    config.paths.assets = resolver.resolve(&config.paths.assets)?;
    config.paths.output = resolver.resolve(&config.paths.output)?;

    Ok(config)
}

/// Load the config at `path`, or the default location, or built-in defaults.
///
/// An explicit path must exist; the default location may be absent.
pub fn load_or_default(path: Option<&Path>) -> Result<BoothConfig> {
    if let Some(path) = path {
        return load_config(path);
    }
    match super::path::default_config_path() {
        Some(default) if default.exists() => load_config(default),
        _ => {
            debug!("No config file, using defaults");
            Ok(BoothConfig::default())
        }
    }
}

/// Parse and validate configuration content.
///
/// # Errors
///
/// Returns an error if parsing or validation fails.
#[instrument(skip(content), fields(format = ?format, content_len = content.len()))]
pub fn load_config_from_str(content: &str, format: ConfigFormat) -> Result<BoothConfig> {
    let config: BoothConfig = match format {
        ConfigFormat::Yaml => serde_yaml::from_str(content)
            .map_err(|e| BoothError::ConfigParse(format!("YAML: {e}")))?,
        ConfigFormat::Toml => {
            toml::from_str(content).map_err(|e| BoothError::ConfigParse(format!("TOML: {e}")))?
        }
    };

    config.validate()?;

    info!(
        shots = config.capture.shot_count,
        width = config.capture.width,
        height = config.capture.height,
        fast = config.fast,
        "Configuration loaded and validated"
    );

    Ok(config)
}

/// Render a configuration as TOML.
pub fn to_toml(config: &BoothConfig) -> Result<String> {
    toml::to_string_pretty(config).map_err(|e| BoothError::ConfigParse(format!("TOML: {e}")))
}
