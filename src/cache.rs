//! # Route Cache
//!
//! Serializes the discovered routes to a JSON file so an application can
//! skip discovery on startup. While the cache file exists,
//! [`AppContext::routes_are_cached`](crate::provider::AppContext) reports
//! true and the provider registers nothing.

use crate::route::EffectiveRoute;
use crate::router::RouteTable;
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Format version written into every cache file.
pub const CACHE_VERSION: u32 = 1;

/// Contents of a route cache file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteCache {
    pub version: u32,
    /// Live routes in registration order
    pub routes: Vec<EffectiveRoute>,
}

impl RouteCache {
    /// Snapshot the live routes of `table`.
    #[must_use]
    pub fn from_table(table: &RouteTable) -> Self {
        Self {
            version: CACHE_VERSION,
            routes: table.routes().iter().map(|r| (**r).clone()).collect(),
        }
    }

    /// Write the cache as pretty JSON, creating parent directories.
    pub fn write(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        info!(
            cache = %path.display(),
            routes = self.routes.len(),
            "Route cache written"
        );
        Ok(())
    }

    /// Read a cache file written by [`write`](Self::write).
    pub fn read(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let cache: Self = serde_json::from_str(&json)
            .with_context(|| format!("parsing route cache {}", path.display()))?;
        if cache.version != CACHE_VERSION {
            bail!(
                "route cache {} has version {}, expected {}",
                path.display(),
                cache.version,
                CACHE_VERSION
            );
        }
        Ok(cache)
    }

    /// Rebuild a [`RouteTable`] by registering the cached routes in order.
    #[must_use]
    pub fn into_table(self) -> RouteTable {
        RouteTable::from_routes(self.routes)
    }
}

/// Remove the cache file. Returns whether a file was removed.
pub fn clear(path: &Path) -> anyhow::Result<bool> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            info!(cache = %path.display(), "Route cache cleared");
            Ok(true)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e).with_context(|| format!("removing {}", path.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::{Handler, HttpVerb};
    use crate::router::{RouteOptions, Router};
    use http::Method;

    #[test]
    fn test_cache_restores_lookup_behavior() {
        let mut table = RouteTable::new();
        table.add_route(
            &[HttpVerb::Get],
            "users/{id}",
            Handler::new(r"App\UserController", "show"),
            RouteOptions {
                name: Some("users.show".into()),
                ..RouteOptions::default()
            },
        );
        table.add_route(
            &[HttpVerb::Get],
            "users/{id}",
            Handler::new(r"App\OtherController", "show"),
            RouteOptions::default(),
        );

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache/routes.json");
        RouteCache::from_table(&table).write(&path).unwrap();

        let restored = RouteCache::read(&path).unwrap();
        assert_eq!(restored.routes.len(), 1);
        let table = restored.into_table();
        let m = table.route(&Method::GET, None, "/users/1").unwrap();
        assert_eq!(m.route.handler.class, r"App\OtherController");

        assert!(clear(&path).unwrap());
        assert!(!clear(&path).unwrap());
    }

    #[test]
    fn test_version_mismatch_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("routes.json");
        std::fs::write(&path, r#"{"version": 99, "routes": []}"#).unwrap();
        let err = RouteCache::read(&path).unwrap_err();
        assert!(err.to_string().contains("version 99"));
    }
}
