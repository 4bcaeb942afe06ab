//! Route vocabulary shared by the extractor, the registrar and the routers:
//! verbs, handlers, group options and the fully merged [`EffectiveRoute`].

use crate::metadata::{GroupSpec, RouteSpec};
use crate::uri::join_uri;
use http::Method;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// HTTP verbs a route can be registered for.
///
/// The derived ordering (GET first, OPTIONS last) is the order verbs are
/// reported in everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpVerb {
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
    Options,
}

impl HttpVerb {
    /// Every verb, the expansion of `any`.
    pub const ALL: [HttpVerb; 7] = [
        HttpVerb::Get,
        HttpVerb::Head,
        HttpVerb::Post,
        HttpVerb::Put,
        HttpVerb::Patch,
        HttpVerb::Delete,
        HttpVerb::Options,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpVerb::Get => "GET",
            HttpVerb::Head => "HEAD",
            HttpVerb::Post => "POST",
            HttpVerb::Put => "PUT",
            HttpVerb::Patch => "PATCH",
            HttpVerb::Delete => "DELETE",
            HttpVerb::Options => "OPTIONS",
        }
    }

    #[must_use]
    pub fn to_method(self) -> Method {
        match self {
            HttpVerb::Get => Method::GET,
            HttpVerb::Head => Method::HEAD,
            HttpVerb::Post => Method::POST,
            HttpVerb::Put => Method::PUT,
            HttpVerb::Patch => Method::PATCH,
            HttpVerb::Delete => Method::DELETE,
            HttpVerb::Options => Method::OPTIONS,
        }
    }

    /// Parse a verb list entry; `any` and `*` expand to [`HttpVerb::ALL`].
    pub fn parse_many(value: &str) -> Result<Vec<HttpVerb>, UnknownVerb> {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("any") || trimmed == "*" {
            return Ok(HttpVerb::ALL.to_vec());
        }
        trimmed.parse().map(|verb| vec![verb])
    }
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A verb string that is not one of [`HttpVerb::ALL`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown HTTP verb `{0}`")]
pub struct UnknownVerb(pub String);

impl FromStr for HttpVerb {
    type Err = UnknownVerb;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpVerb::Get),
            "HEAD" => Ok(HttpVerb::Head),
            "POST" => Ok(HttpVerb::Post),
            "PUT" => Ok(HttpVerb::Put),
            "PATCH" => Ok(HttpVerb::Patch),
            "DELETE" => Ok(HttpVerb::Delete),
            "OPTIONS" => Ok(HttpVerb::Options),
            _ => Err(UnknownVerb(s.to_string())),
        }
    }
}

impl TryFrom<&Method> for HttpVerb {
    type Error = UnknownVerb;

    fn try_from(method: &Method) -> Result<Self, Self::Error> {
        method.as_str().parse()
    }
}

/// The controller method a route dispatches to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Handler {
    /// Fully-qualified controller identifier, e.g. `App\Http\Controllers\UserController`
    pub class: String,
    /// Method name as declared in the controller
    pub method: String,
}

impl Handler {
    pub fn new(class: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            method: method.into(),
        }
    }
}

impl fmt::Display for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.class, self.method)
    }
}

/// Group-level options layered around routes.
///
/// The same shape is used for registrar group scopes, the extra options of an
/// extended directory entry, and `#[group(..)]` subgroups on a controller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupOptions {
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub middleware: Vec<String>,
    /// Route-name prefix (`as` in configuration files)
    #[serde(default, alias = "as")]
    pub name_prefix: Option<String>,
    #[serde(default, rename = "where")]
    pub wheres: BTreeMap<String, String>,
}

impl GroupOptions {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prefix.is_none()
            && self.domain.is_none()
            && self.middleware.is_empty()
            && self.name_prefix.is_none()
            && self.wheres.is_empty()
    }

    /// Layer `inner` inside `self`.
    ///
    /// Prefixes are joined, the inner domain wins, middleware is appended,
    /// name prefixes are concatenated and inner where-constraints override.
    #[must_use]
    pub fn merge(&self, inner: &GroupOptions) -> GroupOptions {
        let prefix = match (&self.prefix, &inner.prefix) {
            (Some(outer), Some(inner)) => Some(join_uri(outer, inner)),
            (outer, inner) => inner.clone().or_else(|| outer.clone()),
        };
        let name_prefix = match (&self.name_prefix, &inner.name_prefix) {
            (Some(outer), Some(inner)) => Some(format!("{outer}{inner}")),
            (outer, inner) => inner.clone().or_else(|| outer.clone()),
        };
        let mut wheres = self.wheres.clone();
        wheres.extend(inner.wheres.clone());

        GroupOptions {
            prefix,
            domain: inner.domain.clone().or_else(|| self.domain.clone()),
            middleware: self
                .middleware
                .iter()
                .chain(inner.middleware.iter())
                .cloned()
                .collect(),
            name_prefix,
            wheres,
        }
    }
}

/// A fully merged route, ready for registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveRoute {
    pub verbs: BTreeSet<HttpVerb>,
    pub uri: String,
    pub handler: Handler,
    pub name: Option<String>,
    pub middleware: Vec<String>,
    pub domain: Option<String>,
    #[serde(rename = "where")]
    pub wheres: BTreeMap<String, String>,
    pub scope_bindings: Option<bool>,
}

impl EffectiveRoute {
    /// Merge one extracted route with everything layered around it.
    ///
    /// * `global` - middleware configured on the registrar, applied first
    /// * `outer` - the registrar's active group scopes, already merged
    /// * `group` - the controller's class-level declarations
    /// * `subgroup` - one `#[group(..)]` of the controller, if it has any
    /// * `class` - fully-qualified controller identifier
    #[must_use]
    pub fn resolve(
        global: &[String],
        outer: &GroupOptions,
        group: &GroupSpec,
        subgroup: Option<&GroupOptions>,
        class: &str,
        route: &RouteSpec,
    ) -> EffectiveRoute {
        let mut layer = outer.merge(&group.options());
        if let Some(subgroup) = subgroup {
            layer = layer.merge(subgroup);
        }

        let uri = join_uri(layer.prefix.as_deref().unwrap_or(""), &route.uri);
        let name = route.name.as_ref().map(|name| {
            format!("{}{}", layer.name_prefix.as_deref().unwrap_or(""), name)
        });
        let middleware = global
            .iter()
            .chain(layer.middleware.iter())
            .chain(route.middleware.iter())
            .cloned()
            .collect();
        let mut wheres = layer.wheres;
        wheres.extend(route.wheres.clone());

        EffectiveRoute {
            verbs: route.verbs.clone(),
            uri,
            handler: Handler::new(class, route.controller_method.clone()),
            name,
            middleware,
            domain: route.domain.clone().or(layer.domain),
            wheres,
            scope_bindings: group.scope_bindings,
        }
    }

    /// Verbs as a slice-friendly vector, in [`HttpVerb`] order.
    #[must_use]
    pub fn verb_list(&self) -> Vec<HttpVerb> {
        self.verbs.iter().copied().collect()
    }
}
