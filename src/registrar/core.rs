use super::group::GroupGuard;
use super::walk::source_files;
use crate::error::RegistrarError;
use crate::metadata::{ClassLoader, MetadataExtractor};
use crate::resolver::ClassResolver;
use crate::route::{EffectiveRoute, GroupOptions};
use crate::router::Router;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A file that failed during a directory walk.
#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: RegistrarError,
}

/// Discovers controllers and registers their routes with a [`Router`].
///
/// Configured with builder-style setters, then driven with
/// [`register_file`](Self::register_file) and
/// [`register_directory`](Self::register_directory):
///
/// ```rust,no_run
/// use route_attributes::registrar::RouteRegistrar;
/// use route_attributes::route::EffectiveRoute;
///
/// let mut registrar = RouteRegistrar::new(Vec::<EffectiveRoute>::new());
/// registrar
///     .use_base_path("app")
///     .use_root_namespace("App")
///     .use_middleware(vec!["web".to_string()]);
/// let count = registrar.register_directory("app/Http/Controllers")?;
/// # Ok::<(), route_attributes::error::RegistrarError>(())
/// ```
pub struct RouteRegistrar<R: Router> {
    router: R,
    base_path: PathBuf,
    root_namespace: String,
    middleware: Vec<String>,
    /// Cumulative merge of every active group scope, innermost last
    scopes: Vec<GroupOptions>,
    registered: usize,
    failures: Vec<FileFailure>,
}

impl<R: Router> RouteRegistrar<R> {
    /// Create a registrar with an empty base path, no root namespace and no
    /// global middleware.
    pub fn new(router: R) -> Self {
        Self {
            router,
            base_path: PathBuf::new(),
            root_namespace: String::new(),
            middleware: Vec::new(),
            scopes: Vec::new(),
            registered: 0,
            failures: Vec::new(),
        }
    }

    /// Namespace prepended to every resolved controller identifier.
    pub fn use_root_namespace(&mut self, namespace: impl Into<String>) -> &mut Self {
        self.root_namespace = namespace.into();
        self
    }

    /// Directory that controller identifiers are derived relative to.
    pub fn use_base_path(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.base_path = path.into();
        self
    }

    /// Middleware applied to every route, before any group or route middleware.
    pub fn use_middleware(&mut self, middleware: Vec<String>) -> &mut Self {
        self.middleware = middleware;
        self
    }

    #[must_use]
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    #[must_use]
    pub fn root_namespace(&self) -> &str {
        &self.root_namespace
    }

    #[must_use]
    pub fn middleware(&self) -> &[String] {
        &self.middleware
    }

    /// Total `add_route` calls made so far.
    #[must_use]
    pub fn registered_count(&self) -> usize {
        self.registered
    }

    /// Files that failed during directory walks, in walk order.
    #[must_use]
    pub fn failures(&self) -> &[FileFailure] {
        &self.failures
    }

    /// Drain the recorded failures.
    pub fn take_failures(&mut self) -> Vec<FileFailure> {
        std::mem::take(&mut self.failures)
    }

    #[must_use]
    pub fn router(&self) -> &R {
        &self.router
    }

    pub fn router_mut(&mut self) -> &mut R {
        &mut self.router
    }

    pub fn into_router(self) -> R {
        self.router
    }

    /// Run `f` inside a group scope.
    ///
    /// The options are merged into the enclosing scope and apply to every
    /// route registered by `f`. The scope is popped when `f` returns, whether
    /// it succeeds, fails or panics.
    pub fn group<T>(&mut self, options: GroupOptions, f: impl FnOnce(&mut Self) -> T) -> T {
        let mut guard = self.push_group(options);
        f(&mut *guard)
    }

    /// Enter a group scope that lasts as long as the returned guard.
    pub fn push_group(&mut self, options: GroupOptions) -> GroupGuard<'_, R> {
        let merged = self.current_scope().merge(&options);
        self.scopes.push(merged);
        GroupGuard::new(self)
    }

    pub(super) fn pop_group(&mut self) {
        self.scopes.pop();
    }

    fn current_scope(&self) -> GroupOptions {
        self.scopes.last().cloned().unwrap_or_default()
    }

    fn resolver(&self) -> ClassResolver {
        let base = fs::canonicalize(&self.base_path).unwrap_or_else(|_| self.base_path.clone());
        ClassResolver::new(base, &self.root_namespace)
    }

    /// Register the routes of one controller file.
    ///
    /// Returns the number of routes registered; `Ok(0)` when the file is
    /// skipped (outside the base path, no concrete controller, no routes).
    ///
    /// # Errors
    ///
    /// [`RegistrarError::ClassLoad`] or [`RegistrarError::InvalidMetadata`].
    /// A failing file registers nothing.
    pub fn register_file(&mut self, path: impl AsRef<Path>) -> Result<usize, RegistrarError> {
        let path = path.as_ref();
        let file = fs::canonicalize(path).map_err(|e| RegistrarError::ClassLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let resolver = self.resolver();
        self.register_resolved(&resolver, &file)
    }

    /// Register every controller under `dir`, recursively.
    ///
    /// Files are visited in sorted pre-order. A failing file is logged,
    /// recorded in [`failures`](Self::failures) and skipped.
    ///
    /// # Errors
    ///
    /// [`RegistrarError::Directory`] when `dir` is missing or not a directory.
    pub fn register_directory(&mut self, dir: impl AsRef<Path>) -> Result<usize, RegistrarError> {
        let dir = dir.as_ref();
        let canonical = fs::canonicalize(dir).map_err(|source| RegistrarError::Directory {
            path: dir.to_path_buf(),
            source,
        })?;
        if !canonical.is_dir() {
            return Err(RegistrarError::Directory {
                path: dir.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a directory"),
            });
        }

        let resolver = self.resolver();
        let files = source_files(&canonical)?;
        let mut count = 0;
        let mut failed = 0;

        for file in files {
            match self.register_resolved(&resolver, &file) {
                Ok(n) => count += n,
                Err(error) => {
                    warn!(
                        file = %file.display(),
                        error = %error,
                        "Skipping controller file"
                    );
                    failed += 1;
                    self.failures.push(FileFailure { path: file, error });
                }
            }
        }

        info!(
            directory = %dir.display(),
            namespace = %self.root_namespace,
            routes = count,
            failures = failed,
            "Registered route directory"
        );
        Ok(count)
    }

    fn register_resolved(
        &mut self,
        resolver: &ClassResolver,
        file: &Path,
    ) -> Result<usize, RegistrarError> {
        let Some(resolved) = resolver.resolve(file) else {
            debug!(
                file = %file.display(),
                base_path = %resolver.base_path().display(),
                "Skipping file outside base path"
            );
            return Ok(0);
        };
        let Some(class) = ClassLoader::load(&resolved)? else {
            return Ok(0);
        };
        let (group, routes) = MetadataExtractor::extract(&class)?;
        if routes.is_empty() {
            debug!(class = %class.name(), "Controller declares no routes");
            return Ok(0);
        }

        let outer = self.current_scope();
        let subgroups: Vec<Option<&GroupOptions>> = if group.subgroups.is_empty() {
            vec![None]
        } else {
            group.subgroups.iter().map(Some).collect()
        };

        let effective: Vec<EffectiveRoute> = subgroups
            .into_iter()
            .flat_map(|subgroup| routes.iter().map(move |route| (subgroup, route)))
            .map(|(subgroup, route)| {
                EffectiveRoute::resolve(
                    &self.middleware,
                    &outer,
                    &group,
                    subgroup,
                    class.name(),
                    route,
                )
            })
            .collect();

        let count = effective.len();
        for route in effective {
            let verbs = route.verb_list();
            let options = route.options();
            debug!(
                verbs = ?verbs,
                uri = %route.uri,
                handler = %route.handler,
                middleware = ?options.middleware,
                "Registering route"
            );
            self.router
                .add_route(&verbs, &route.uri, route.handler, options);
            self.registered += 1;
        }
        Ok(count)
    }
}
