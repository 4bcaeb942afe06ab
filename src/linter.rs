//! # Controller Linter
//!
//! Static checks over controller directories, run without registering
//! anything.
//!
//! ## Checks Performed
//!
//! 1. **parse_error** - the file is not valid Rust
//! 2. **invalid_metadata** - a route attribute is malformed
//! 3. **private_route_method** - a verb attribute on a non-`pub` method, which
//!    is never registered
//! 4. **trait_impl_route** - a verb attribute inside a trait impl, which is
//!    never registered
//! 5. **duplicate_route** - two routes share verb, domain and URI; the later
//!    registration overrides the earlier one
//! 6. **unknown_where_param** - a where-constraint names no parameter of the
//!    route's URI or domain
//! 7. **no_routes** - a controller declares no routes
//!
//! ## Usage
//!
//! ```rust,no_run
//! use route_attributes::linter::{lint_directory, print_lint_issues};
//! use std::path::Path;
//!
//! let dir = Path::new("app/Http/Controllers");
//! let issues = lint_directory(dir, Path::new("app"), "App")?;
//! print_lint_issues(&issues);
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::config::RouteAttributesConfig;
use crate::error::RegistrarError;
use crate::metadata::{has_verb_attribute, ClassLoader, LoadedClass, MetadataExtractor};
use crate::provider::{Application, RouteAttributesServiceProvider};
use crate::registrar::source_files;
use crate::resolver::ClassResolver;
use crate::route::{EffectiveRoute, GroupOptions, HttpVerb};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::path::Path;
use syn::{ImplItem, ImplItemFn, Visibility};

#[cfg(test)]
mod tests;

/// `{param}` and `{param?}` placeholders in URIs and domains.
#[allow(clippy::expect_used)]
static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{(\w+)\??\}").expect("placeholder regex is valid"));

/// Severity level for lint issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LintSeverity {
    /// Discovery fails for the file
    Error,
    /// The file registers, but not the way it reads
    Warning,
    Info,
}

impl fmt::Display for LintSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LintSeverity::Error => "error",
            LintSeverity::Warning => "warning",
            LintSeverity::Info => "info",
        })
    }
}

/// A lint issue found in a controller file
#[derive(Debug, Clone)]
pub struct LintIssue {
    /// `file:line`, or just the file when no line is known
    pub location: String,
    pub severity: LintSeverity,
    /// e.g. `private_route_method`
    pub kind: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl LintIssue {
    pub fn new(
        location: impl Into<String>,
        severity: LintSeverity,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        LintIssue {
            location: location.into(),
            severity,
            kind: kind.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Lint every controller under `dir`.
///
/// `base_path` and `namespace` play the same role as on the registrar.
pub fn lint_directory(
    dir: &Path,
    base_path: &Path,
    namespace: &str,
) -> anyhow::Result<Vec<LintIssue>> {
    let mut linter = Linter::default();
    linter.lint_dir(dir, base_path, namespace, &GroupOptions::default())?;
    Ok(linter.issues)
}

/// Lint every directory of `config`, in registration order, so that
/// `duplicate_route` reports overrides across directories too.
pub fn lint_config(
    config: &RouteAttributesConfig,
    app: &dyn Application,
) -> anyhow::Result<Vec<LintIssue>> {
    let provider = RouteAttributesServiceProvider::new(config.clone());
    let mut linter = Linter::default();
    for entry in provider.directories(app)? {
        linter.lint_dir(&entry.path, &entry.base_path, &entry.namespace, &entry.options)?;
    }
    Ok(linter.issues)
}

/// Whether any issue is an error.
#[must_use]
pub fn has_errors(issues: &[LintIssue]) -> bool {
    issues.iter().any(|i| i.severity == LintSeverity::Error)
}

#[derive(Default)]
struct Linter {
    issues: Vec<LintIssue>,
    /// `(verb, domain + uri)` to the handler and location that registered it
    seen: HashMap<(HttpVerb, String), (String, String)>,
}

impl Linter {
    fn lint_dir(
        &mut self,
        dir: &Path,
        base_path: &Path,
        namespace: &str,
        options: &GroupOptions,
    ) -> anyhow::Result<()> {
        let canonical = std::fs::canonicalize(dir)
            .map_err(|e| anyhow::anyhow!("cannot read directory {}: {e}", dir.display()))?;
        let base = std::fs::canonicalize(base_path).unwrap_or_else(|_| base_path.to_path_buf());
        let resolver = ClassResolver::new(base, namespace);

        for file in source_files(&canonical)? {
            let Some(resolved) = resolver.resolve(&file) else {
                continue;
            };
            let location = file.display().to_string();
            match ClassLoader::load(&resolved) {
                Ok(Some(class)) => self.lint_class(&class, &location, options),
                Ok(None) => {}
                Err(e) => self.issues.push(
                    LintIssue::new(&location, LintSeverity::Error, "parse_error", e.to_string())
                        .with_suggestion("Fix the syntax error; the file is skipped during discovery"),
                ),
            }
        }
        Ok(())
    }

    fn lint_class(&mut self, class: &LoadedClass, file: &str, options: &GroupOptions) {
        for method in methods(&class.inherent_impls) {
            if !matches!(method.vis, Visibility::Public(_)) && has_verb_attribute(&method.attrs) {
                self.issues.push(
                    LintIssue::new(
                        at(file, method),
                        LintSeverity::Warning,
                        "private_route_method",
                        format!(
                            "{}::{} has a route attribute but is not `pub`",
                            class.resolved.class_name, method.sig.ident
                        ),
                    )
                    .with_suggestion("Make the method `pub` or remove the route attribute"),
                );
            }
        }
        for method in methods(&class.trait_impls) {
            if has_verb_attribute(&method.attrs) {
                self.issues.push(
                    LintIssue::new(
                        at(file, method),
                        LintSeverity::Warning,
                        "trait_impl_route",
                        format!(
                            "{}::{} is a trait method; only inherent methods are routes",
                            class.resolved.class_name, method.sig.ident
                        ),
                    )
                    .with_suggestion("Declare the route on an inherent `impl` method"),
                );
            }
        }

        let (group, routes) = match MetadataExtractor::extract(class) {
            Ok(extracted) => extracted,
            Err(e) => {
                let location = match &e {
                    RegistrarError::InvalidMetadata { member, .. } => {
                        methods(&class.inherent_impls)
                            .find(|m| m.sig.ident == member.as_str())
                            .map(|m| at(file, m))
                            .unwrap_or_else(|| file.to_string())
                    }
                    _ => file.to_string(),
                };
                self.issues.push(LintIssue::new(
                    location,
                    LintSeverity::Error,
                    "invalid_metadata",
                    e.to_string(),
                ));
                return;
            }
        };

        if routes.is_empty() {
            self.issues.push(LintIssue::new(
                file,
                LintSeverity::Info,
                "no_routes",
                format!("{} declares no routes", class.name()),
            ));
            return;
        }

        let subgroups: Vec<Option<&GroupOptions>> = if group.subgroups.is_empty() {
            vec![None]
        } else {
            group.subgroups.iter().map(Some).collect()
        };
        for subgroup in subgroups {
            for route in &routes {
                let effective =
                    EffectiveRoute::resolve(&[], options, &group, subgroup, class.name(), route);
                let location = methods(&class.inherent_impls)
                    .find(|m| m.sig.ident == route.controller_method.as_str())
                    .map(|m| at(file, m))
                    .unwrap_or_else(|| file.to_string());
                self.check_where_params(&effective, &route.wheres, &location);
                self.check_duplicate(&effective, &location);
            }
        }
    }

    /// Method-level constraints only; class and group constraints may
    /// legitimately name parameters some routes lack.
    fn check_where_params(
        &mut self,
        route: &EffectiveRoute,
        declared: &BTreeMap<String, String>,
        location: &str,
    ) {
        let mut params: BTreeSet<&str> = BTreeSet::new();
        for text in std::iter::once(route.uri.as_str()).chain(route.domain.as_deref()) {
            params.extend(
                PLACEHOLDER
                    .captures_iter(text)
                    .filter_map(|c| c.get(1).map(|m| m.as_str())),
            );
        }
        for param in declared.keys() {
            if !params.contains(param.as_str()) {
                self.issues.push(LintIssue::new(
                    location,
                    LintSeverity::Info,
                    "unknown_where_param",
                    format!(
                        "where-constraint on `{param}` but `{}` has no such parameter",
                        route.uri
                    ),
                ));
            }
        }
    }

    fn check_duplicate(&mut self, route: &EffectiveRoute, location: &str) {
        let key = format!("{}{}", route.domain.as_deref().unwrap_or(""), route.uri);
        let handler = route.handler.to_string();
        for verb in &route.verbs {
            let previous = self
                .seen
                .insert((*verb, key.clone()), (handler.clone(), location.to_string()));
            if let Some((earlier, earlier_location)) = previous {
                self.issues.push(
                    LintIssue::new(
                        location,
                        LintSeverity::Warning,
                        "duplicate_route",
                        format!(
                            "{verb} {} from {handler} overrides {earlier} ({earlier_location})",
                            route.uri
                        ),
                    )
                    .with_suggestion("Give one of the routes a distinct URI, verb or domain"),
                );
            }
        }
    }
}

fn methods(impls: &[syn::ItemImpl]) -> impl Iterator<Item = &ImplItemFn> {
    impls.iter().flat_map(|imp| {
        imp.items.iter().filter_map(|item| match item {
            ImplItem::Fn(method) => Some(method),
            _ => None,
        })
    })
}

fn at(file: &str, method: &ImplItemFn) -> String {
    format!("{file}:{}", method.sig.ident.span().start().line)
}

/// Print lint issues grouped by severity.
pub fn print_lint_issues(issues: &[LintIssue]) {
    if issues.is_empty() {
        println!("✅ No lint issues found!");
        return;
    }

    let count = |severity: LintSeverity| issues.iter().filter(|i| i.severity == severity).count();
    println!("\n📋 Lint Results:");
    println!(
        "   {} error(s), {} warning(s), {} info(s)\n",
        count(LintSeverity::Error),
        count(LintSeverity::Warning),
        count(LintSeverity::Info)
    );

    for (severity, heading) in [
        (LintSeverity::Error, "❌ Errors (must fix):"),
        (LintSeverity::Warning, "⚠️  Warnings (should fix):"),
        (LintSeverity::Info, "ℹ️  Info:"),
    ] {
        let group: Vec<_> = issues.iter().filter(|i| i.severity == severity).collect();
        if group.is_empty() {
            continue;
        }
        println!("{heading}");
        for issue in group {
            println!("   [{}] {}", issue.kind, issue.location);
            println!("      {}", issue.message);
            if let Some(suggestion) = &issue.suggestion {
                println!("      💡 Suggestion: {suggestion}");
            }
        }
        println!();
    }
}
