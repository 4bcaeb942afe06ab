//! # Hot Reload Module
//!
//! Watches the configured controller directories and rebuilds the
//! [`RouteTable`] when a controller file changes.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use arc_swap::ArcSwap;
//! use route_attributes::hot_reload::{rebuild_table, watch_directories};
//! use std::sync::Arc;
//!
//! let table = Arc::new(ArcSwap::from_pointee(rebuild_table(&provider, &app)?));
//! let _watcher = watch_directories(provider, app, table.clone(), |table| {
//!     println!("Reloaded {} routes", table.len());
//! })?;
//! ```
//!
//! ## Reload Process
//!
//! 1. **Detection** - a create, modify or remove event on a `.rs` file
//! 2. **Rebuild** - a fresh registrar walks every configured directory
//! 3. **Swap** - the new table replaces the old one atomically
//!
//! If the rebuild fails the error is logged and the previous table stays
//! active. Readers never observe a partially built table.

use crate::provider::{AppContext, RouteAttributesServiceProvider};
use crate::resolver::SOURCE_EXTENSION;
use crate::router::RouteTable;
use arc_swap::ArcSwap;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Discover every configured directory into a fresh [`RouteTable`].
///
/// Ignores the enabled and cached checks; a watcher always wants the routes
/// on disk.
pub fn rebuild_table(
    provider: &RouteAttributesServiceProvider,
    app: &AppContext,
) -> anyhow::Result<RouteTable> {
    let mut registrar = crate::registrar::RouteRegistrar::new(RouteTable::new());
    provider.register_directories(app, &mut registrar)?;
    for failure in registrar.failures() {
        warn!(
            file = %failure.path.display(),
            error = %failure.error,
            "Controller skipped during rebuild"
        );
    }
    Ok(registrar.into_router())
}

fn is_source_change(event: &Event) -> bool {
    matches!(
        event.kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
    ) && event
        .paths
        .iter()
        .any(|p| p.extension().and_then(|e| e.to_str()) == Some(SOURCE_EXTENSION))
}

/// Watch every configured directory and publish a rebuilt table into `table`
/// after each source change.
///
/// `on_reload` runs on the watcher thread after each successful swap. Keep
/// the returned watcher alive for as long as reloading should happen.
pub fn watch_directories<F>(
    provider: RouteAttributesServiceProvider,
    app: AppContext,
    table: Arc<ArcSwap<RouteTable>>,
    mut on_reload: F,
) -> anyhow::Result<RecommendedWatcher>
where
    F: FnMut(&RouteTable) + Send + 'static,
{
    let directories = provider.directories(&app)?;

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<Event, notify::Error>| match res {
            Ok(event) if is_source_change(&event) => match rebuild_table(&provider, &app) {
                Ok(rebuilt) => {
                    info!(
                        routes = rebuilt.len(),
                        trigger = ?event.paths,
                        "hot-reload: route table rebuilt"
                    );
                    let rebuilt = Arc::new(rebuilt);
                    table.store(Arc::clone(&rebuilt));
                    on_reload(&rebuilt);
                }
                Err(e) => error!(error = %e, "hot-reload: rebuild failed; keeping previous routes"),
            },
            Ok(_) => {}
            Err(e) => error!(error = %e, "hot-reload: watch error"),
        },
        Config::default(),
    )?;

    for entry in &directories {
        watcher.watch(&entry.path, RecursiveMode::Recursive)?;
        info!(directory = %entry.path.display(), "hot-reload: watching");
    }
    Ok(watcher)
}
