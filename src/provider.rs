//! # Service Provider
//!
//! Glue between configuration and the [`RouteRegistrar`]: decides whether
//! routes are registered at all, normalizes the configured directories and
//! registers them in reverse declaration order.
//!
//! Reverse order matters together with the router's replacement rule: the
//! earliest-declared directory is registered last, so when two directories
//! declare the same verb and URI the earlier one wins.

use crate::config::{AppConfig, DirectoryConfig, DirectoryKey, RouteAttributesConfig};
use crate::error::{ConfigError, RegistrarError};
use crate::registrar::RouteRegistrar;
use crate::route::GroupOptions;
use crate::router::Router;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// What the provider needs to know about the host application.
pub trait Application {
    /// Root namespace of the application, e.g. `App`
    fn namespace(&self) -> &str;
    /// Directory the application namespace maps to
    fn path(&self) -> &Path;
    /// Whether routes are served from a cache and must not be discovered
    fn routes_are_cached(&self) -> bool;
}

/// [`Application`] backed by the `app` section of the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppContext {
    pub namespace: String,
    pub path: PathBuf,
    /// Routes count as cached while this file exists
    pub route_cache: Option<PathBuf>,
}

impl AppContext {
    pub fn new(namespace: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            namespace: namespace.into(),
            path: path.into(),
            route_cache: None,
        }
    }

    #[must_use]
    pub fn with_route_cache(mut self, cache: impl Into<PathBuf>) -> Self {
        self.route_cache = Some(cache.into());
        self
    }
}

impl From<&AppConfig> for AppContext {
    fn from(app: &AppConfig) -> Self {
        Self {
            namespace: app.namespace.clone(),
            path: app.path.clone(),
            route_cache: app.route_cache.clone(),
        }
    }
}

impl Application for AppContext {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn routes_are_cached(&self) -> bool {
        self.route_cache.as_deref().is_some_and(Path::exists)
    }
}

/// A configured directory with every default filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub key: DirectoryKey,
    /// Directory to walk
    pub path: PathBuf,
    pub namespace: String,
    pub base_path: PathBuf,
    /// Group options around every route of the directory
    pub options: GroupOptions,
}

impl DirectoryEntry {
    /// Apply the defaulting rules to one raw configuration entry.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] for a positional extended entry without `path`.
    pub fn normalize(
        key: &DirectoryKey,
        config: &DirectoryConfig,
        app: &dyn Application,
    ) -> Result<Self, ConfigError> {
        let entry = match (key, config) {
            (DirectoryKey::Namespace(namespace), DirectoryConfig::Simple(path)) => Self {
                key: key.clone(),
                path: path.clone(),
                namespace: namespace.clone(),
                base_path: path.clone(),
                options: GroupOptions::default(),
            },
            (DirectoryKey::Index(_), DirectoryConfig::Simple(path)) => Self {
                key: key.clone(),
                path: path.clone(),
                namespace: app.namespace().to_string(),
                base_path: app.path().to_path_buf(),
                options: GroupOptions::default(),
            },
            (_, DirectoryConfig::Extended(ext)) => {
                let path = match (&ext.path, key) {
                    (Some(path), _) => path.clone(),
                    (None, DirectoryKey::Namespace(dir)) => PathBuf::from(dir),
                    (None, DirectoryKey::Index(_)) => {
                        return Err(ConfigError::Invalid(format!(
                            "directory entry {key} uses the extended form without a `path`"
                        )))
                    }
                };
                let base_path = match (&ext.base_path, &ext.namespace) {
                    (Some(base), _) => base.clone(),
                    (None, Some(_)) => path.clone(),
                    (None, None) => app.path().to_path_buf(),
                };
                Self {
                    key: key.clone(),
                    namespace: ext
                        .namespace
                        .clone()
                        .unwrap_or_else(|| app.namespace().to_string()),
                    path,
                    base_path,
                    options: ext.options.clone(),
                }
            }
        };
        Ok(entry)
    }
}

/// Registers attribute routes for an application according to its config.
#[derive(Debug, Clone)]
pub struct RouteAttributesServiceProvider {
    config: RouteAttributesConfig,
}

impl RouteAttributesServiceProvider {
    pub fn new(config: RouteAttributesConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &RouteAttributesConfig {
        &self.config
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// False when disabled or when the application serves cached routes.
    #[must_use]
    pub fn should_register_routes(&self, app: &dyn Application) -> bool {
        self.is_enabled() && !app.routes_are_cached()
    }

    #[must_use]
    pub fn global_middleware(&self) -> &[String] {
        &self.config.middleware
    }

    /// Normalized directory entries, last-declared first.
    pub fn directories(&self, app: &dyn Application) -> Result<Vec<DirectoryEntry>, ConfigError> {
        self.config
            .directories
            .iter()
            .rev()
            .map(|(key, config)| DirectoryEntry::normalize(key, config, app))
            .collect()
    }

    /// Create a registrar over `router` and register routes into it.
    pub fn boot<R: Router>(
        &self,
        app: &dyn Application,
        router: R,
    ) -> Result<RouteRegistrar<R>, RegistrarError> {
        let mut registrar = RouteRegistrar::new(router);
        self.register_routes(app, &mut registrar)?;
        Ok(registrar)
    }

    /// Register every configured directory unless routes are disabled or cached.
    ///
    /// Returns the number of routes registered.
    pub fn register_routes<R: Router>(
        &self,
        app: &dyn Application,
        registrar: &mut RouteRegistrar<R>,
    ) -> Result<usize, RegistrarError> {
        if !self.is_enabled() {
            info!("Route attributes disabled; skipping route registration");
            return Ok(0);
        }
        if app.routes_are_cached() {
            info!("Routes are cached; skipping route registration");
            return Ok(0);
        }
        self.register_directories(app, registrar)
    }

    /// Register every configured directory, ignoring the enabled and cached
    /// checks.
    pub fn register_directories<R: Router>(
        &self,
        app: &dyn Application,
        registrar: &mut RouteRegistrar<R>,
    ) -> Result<usize, RegistrarError> {
        registrar.use_middleware(self.config.middleware.clone());
        let mut total = 0;

        for entry in self.directories(app)? {
            debug!(
                key = %entry.key,
                directory = %entry.path.display(),
                namespace = %entry.namespace,
                base_path = %entry.base_path.display(),
                "Registering configured directory"
            );
            registrar
                .use_root_namespace(entry.namespace.as_str())
                .use_base_path(entry.base_path.clone());
            total += if entry.options.is_empty() {
                registrar.register_directory(&entry.path)?
            } else {
                registrar.group(entry.options.clone(), |r| r.register_directory(&entry.path))?
            };
        }

        info!(
            directories = self.config.directories.len(),
            routes = total,
            "Attribute routes registered"
        );
        Ok(total)
    }
}

impl Default for RouteAttributesServiceProvider {
    fn default() -> Self {
        Self::new(RouteAttributesConfig::default())
    }
}
