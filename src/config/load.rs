use super::schema::{DirectoryConfig, DirectoryKey, RouteAttributesConfig};
use crate::error::ConfigError;
use crate::metadata::validate_where_pattern;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable overriding `enabled`.
pub const ENABLED_ENV: &str = "ROUTE_ATTRIBUTES_ENABLED";

/// File formats the configuration can be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Toml,
    Json,
}

impl ConfigFormat {
    /// Pick the format from a file extension; unknown extensions read as YAML.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => ConfigFormat::Toml,
            Some("json") => ConfigFormat::Json,
            _ => ConfigFormat::Yaml,
        }
    }
}

/// Load a configuration file.
///
/// Relative paths inside the file are resolved against the file's directory.
/// Environment overrides are not applied; see
/// [`RouteAttributesConfig::apply_env_overrides`].
///
/// # Errors
///
/// [`ConfigError::Io`] when the file cannot be read, [`ConfigError::Parse`]
/// when it does not match the schema, [`ConfigError::Invalid`] when it fails
/// validation.
pub fn load_config(path: impl AsRef<Path>) -> Result<RouteAttributesConfig, ConfigError> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut config = RouteAttributesConfig::from_source(&source, ConfigFormat::from_path(path))
        .map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })?;

    let root = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    config.rebase(root);
    config.validate()?;

    debug!(
        config = %path.display(),
        enabled = config.enabled,
        directories = config.directories.len(),
        "Loaded route-attributes config"
    );
    Ok(config)
}

impl RouteAttributesConfig {
    /// Parse configuration text without touching the filesystem.
    pub fn from_source(source: &str, format: ConfigFormat) -> Result<Self, String> {
        let mut config: Self = match format {
            ConfigFormat::Yaml => serde_yaml::from_str(source).map_err(|e| e.to_string())?,
            ConfigFormat::Toml => toml::from_str(source).map_err(|e| e.to_string())?,
            ConfigFormat::Json => serde_json::from_str(source).map_err(|e| e.to_string())?,
        };
        config.fill_extended_paths();
        Ok(config)
    }

    /// In the extended form a string key is the directory itself.
    fn fill_extended_paths(&mut self) {
        for (key, entry) in &mut self.directories.0 {
            if let (DirectoryKey::Namespace(dir), DirectoryConfig::Extended(ext)) = (&*key, entry) {
                if ext.path.is_none() {
                    ext.path = Some(PathBuf::from(dir));
                }
            }
        }
    }

    /// Resolve every relative path against `root`.
    pub fn rebase(&mut self, root: &Path) {
        rebase_path(&mut self.app.path, root);
        if let Some(cache) = &mut self.app.route_cache {
            rebase_path(cache, root);
        }
        for (_, entry) in &mut self.directories.0 {
            match entry {
                DirectoryConfig::Simple(path) => rebase_path(path, root),
                DirectoryConfig::Extended(ext) => {
                    if let Some(path) = &mut ext.path {
                        rebase_path(path, root);
                    }
                    if let Some(base) = &mut ext.base_path {
                        rebase_path(base, root);
                    }
                }
            }
        }
    }

    /// Apply `ROUTE_ATTRIBUTES_ENABLED` when it is set to a boolean value.
    pub fn apply_env_overrides(&mut self) {
        let Ok(value) = std::env::var(ENABLED_ENV) else {
            return;
        };
        match parse_bool(&value) {
            Some(enabled) => {
                debug!(env = ENABLED_ENV, enabled, "Config override from environment");
                self.enabled = enabled;
            }
            None => warn!(
                env = ENABLED_ENV,
                value = %value,
                "Ignoring non-boolean environment override"
            ),
        }
    }

    /// Check the parts of the configuration that deserialization cannot.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] for where patterns that do not compile and
    /// positional extended entries without a `path`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, entry) in self.directories.iter() {
            let DirectoryConfig::Extended(ext) = entry else {
                continue;
            };
            if ext.path.is_none() {
                return Err(ConfigError::Invalid(format!(
                    "directory entry {key} uses the extended form without a `path`"
                )));
            }
            for (param, pattern) in &ext.options.wheres {
                validate_where_pattern(pattern).map_err(|e| {
                    ConfigError::Invalid(format!(
                        "directory {key}: invalid where pattern for `{param}`: {e}"
                    ))
                })?;
            }
        }
        Ok(())
    }
}

fn rebase_path(path: &mut PathBuf, root: &Path) {
    if path.is_relative() {
        *path = root.join(&*path);
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
