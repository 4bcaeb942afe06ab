//! In-memory route table.
//!
//! Routes live in one lane per verb, keyed by `domain + uri`. Registering a
//! key that is already present replaces the route in place, so the later
//! registration wins while keeping the earlier position. Lookup scans a lane
//! in order and returns the first entry whose host and path patterns match.

use super::{RouteHandle, RouteOptions, Router};
use crate::route::{EffectiveRoute, Handler, HttpVerb};
use crate::uri::normalize_uri;
use http::Method;
use regex::{Regex, RegexBuilder};
use smallvec::SmallVec;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Maximum number of captured parameters before heap allocation.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Captured host and path parameters in capture order.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Default pattern of a path parameter without a where-constraint.
const DEFAULT_PATH_PARAM: &str = "[^/]+";
/// Default pattern of a domain parameter without a where-constraint.
const DEFAULT_HOST_PARAM: &str = "[^.]+";

/// Result of a successful [`RouteTable::route`] lookup.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    pub route: Arc<EffectiveRoute>,
    /// Domain parameters first, then path parameters
    pub params: ParamVec,
}

impl RouteMatch {
    /// Get a captured parameter by name.
    ///
    /// If a name is captured twice (domain and path), the path value wins.
    #[inline]
    #[must_use]
    pub fn get_param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Compiled `{param}` pattern with the parameter name behind each group.
#[derive(Debug, Clone)]
struct CompiledPattern {
    regex: Regex,
    /// Group `pN`/`hN` maps to `names[N]`
    names: Vec<Arc<str>>,
}

impl CompiledPattern {
    fn captures(&self, prefix: char, input: &str, params: &mut ParamVec) -> bool {
        let Some(caps) = self.regex.captures(input) else {
            return false;
        };
        for (i, name) in self.names.iter().enumerate() {
            if let Some(value) = caps.name(&format!("{prefix}{i}")) {
                params.push((Arc::clone(name), value.as_str().to_string()));
            }
        }
        true
    }
}

#[derive(Debug, Clone)]
struct LaneEntry {
    /// `domain + uri`, the replacement key
    key: String,
    slot: usize,
    host: Option<CompiledPattern>,
    /// `None` when the pattern failed to compile; the entry never matches
    path: Option<CompiledPattern>,
}

/// An in-memory router with first-match lookup.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    /// Every route ever registered; index is the [`RouteHandle`]
    slots: Vec<Arc<EffectiveRoute>>,
    /// Lane entries pointing at each slot
    live: Vec<usize>,
    lanes: BTreeMap<HttpVerb, Vec<LaneEntry>>,
}

impl RouteTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table by registering `routes` in order.
    pub fn from_routes(routes: impl IntoIterator<Item = EffectiveRoute>) -> Self {
        let mut table = Self::new();
        for route in routes {
            table.insert(route);
        }
        table
    }

    /// Register a route, replacing any route with the same verb, domain and URI.
    pub fn insert(&mut self, route: EffectiveRoute) -> RouteHandle {
        let slot = self.slots.len();
        let key = lane_key(route.domain.as_deref(), &route.uri);
        let (host, path) = match route.domain.as_deref() {
            Some(domain) => match compile_host(domain, &route) {
                Some(host) => (Some(host), compile_path(&route)),
                None => (None, None),
            },
            None => (None, compile_path(&route)),
        };

        let mut verbs: Vec<HttpVerb> = route.verb_list();
        if route.verbs.contains(&HttpVerb::Get) && !route.verbs.contains(&HttpVerb::Head) {
            verbs.push(HttpVerb::Head);
        }

        self.live.push(0);
        for verb in verbs {
            let entry = LaneEntry {
                key: key.clone(),
                slot,
                host: host.clone(),
                path: path.clone(),
            };
            let lane = self.lanes.entry(verb).or_default();
            match lane.iter_mut().find(|e| e.key == entry.key) {
                Some(existing) => {
                    let replaced = &self.slots[existing.slot];
                    warn!(
                        verb = %verb,
                        uri = %route.uri,
                        domain = ?route.domain,
                        replaced = %replaced.handler,
                        handler = %route.handler,
                        "Route override"
                    );
                    self.live[existing.slot] -= 1;
                    *existing = entry;
                }
                None => lane.push(entry),
            }
            self.live[slot] += 1;
        }

        debug!(
            verbs = ?route.verb_list(),
            uri = %route.uri,
            handler = %route.handler,
            name = ?route.name,
            "Route registered"
        );
        self.slots.push(Arc::new(route));
        RouteHandle(slot)
    }

    /// Match a request to a route.
    ///
    /// `host` is the request host without port; routes with a domain never
    /// match when it is `None`. `path` may carry leading and trailing slashes.
    #[must_use]
    pub fn route(&self, method: &Method, host: Option<&str>, path: &str) -> Option<RouteMatch> {
        let verb = HttpVerb::try_from(method).ok()?;
        let lane = self.lanes.get(&verb)?;
        let request_path = request_path(path);

        for entry in lane {
            let mut params = ParamVec::new();
            if let Some(host_pattern) = &entry.host {
                match host {
                    Some(host) if host_pattern.captures('h', host, &mut params) => {}
                    _ => continue,
                }
            }
            let Some(path_pattern) = &entry.path else {
                continue;
            };
            if path_pattern.captures('p', &request_path, &mut params) {
                return Some(RouteMatch {
                    route: Arc::clone(&self.slots[entry.slot]),
                    params,
                });
            }
        }

        debug!(method = %method, host = ?host, path = %path, "No route matched");
        None
    }

    /// Look up a route by name. When several live routes share a name, the
    /// one registered last wins.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<Arc<EffectiveRoute>> {
        self.live_routes()
            .filter(|route| route.name.as_deref() == Some(name))
            .last()
            .cloned()
    }

    /// The route behind a handle, even if it has since been replaced.
    #[must_use]
    pub fn get(&self, handle: RouteHandle) -> Option<&Arc<EffectiveRoute>> {
        self.slots.get(handle.0)
    }

    /// Routes still reachable through at least one verb, in registration order.
    #[must_use]
    pub fn routes(&self) -> Vec<Arc<EffectiveRoute>> {
        self.live_routes().cloned().collect()
    }

    fn live_routes(&self) -> impl Iterator<Item = &Arc<EffectiveRoute>> {
        self.slots
            .iter()
            .zip(self.live.iter())
            .filter(|(_, live)| **live > 0)
            .map(|(route, _)| route)
    }

    /// Number of live routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live.iter().filter(|live| **live > 0).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Router for RouteTable {
    fn add_route(
        &mut self,
        verbs: &[HttpVerb],
        uri: &str,
        handler: Handler,
        options: RouteOptions,
    ) -> RouteHandle {
        self.insert(EffectiveRoute::from_parts(verbs, uri, handler, options))
    }
}

fn lane_key(domain: Option<&str>, uri: &str) -> String {
    format!("{}{}", domain.unwrap_or(""), uri)
}

/// Request path in the form route patterns are compiled against:
/// `/a/b`, or the empty string for the root.
fn request_path(path: &str) -> String {
    let normalized = normalize_uri(path);
    if normalized == "/" {
        String::new()
    } else {
        format!("/{normalized}")
    }
}

fn compile_path(route: &EffectiveRoute) -> Option<CompiledPattern> {
    let mut pattern = String::with_capacity(route.uri.len() + 8);
    let mut names = Vec::new();
    pattern.push('^');
    if route.uri != "/" {
        for segment in route.uri.split('/') {
            push_segment(&mut pattern, &mut names, segment, &route.wheres);
        }
    }
    pattern.push('$');
    compile(&pattern, names, false, route)
}

fn push_segment(
    pattern: &mut String,
    names: &mut Vec<Arc<str>>,
    segment: &str,
    wheres: &BTreeMap<String, String>,
) {
    if let Some(name) = segment
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix("?}"))
        .filter(|name| !name.contains(['{', '}']))
    {
        let group = param_group('p', names.len(), wheres.get(name).map(String::as_str), DEFAULT_PATH_PARAM);
        names.push(Arc::from(name));
        pattern.push_str("(?:/");
        pattern.push_str(&group);
        pattern.push_str(")?");
        return;
    }
    pattern.push('/');
    push_template(pattern, names, segment, wheres, 'p', DEFAULT_PATH_PARAM);
}

/// Append literal text and `{param}` groups of `template` to `pattern`.
fn push_template(
    pattern: &mut String,
    names: &mut Vec<Arc<str>>,
    template: &str,
    wheres: &BTreeMap<String, String>,
    prefix: char,
    default: &str,
) {
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        pattern.push_str(&regex::escape(&rest[..open]));
        let Some(close) = rest[open..].find('}') else {
            rest = &rest[open..];
            break;
        };
        let raw = &rest[open + 1..open + close];
        let (name, optional) = match raw.strip_suffix('?') {
            Some(name) => (name, true),
            None => (raw, false),
        };
        pattern.push_str(&param_group(
            prefix,
            names.len(),
            wheres.get(name).map(String::as_str),
            default,
        ));
        if optional {
            pattern.push('?');
        }
        names.push(Arc::from(name));
        rest = &rest[open + close + 1..];
    }
    pattern.push_str(&regex::escape(rest));
}

fn param_group(prefix: char, index: usize, constraint: Option<&str>, default: &str) -> String {
    format!("(?P<{prefix}{index}>{})", constraint.unwrap_or(default))
}

fn compile_host(domain: &str, route: &EffectiveRoute) -> Option<CompiledPattern> {
    let mut pattern = String::with_capacity(domain.len() + 8);
    let mut names = Vec::new();
    pattern.push('^');
    push_template(&mut pattern, &mut names, domain, &route.wheres, 'h', DEFAULT_HOST_PARAM);
    pattern.push('$');
    compile(&pattern, names, true, route)
}

fn compile(
    pattern: &str,
    names: Vec<Arc<str>>,
    case_insensitive: bool,
    route: &EffectiveRoute,
) -> Option<CompiledPattern> {
    match RegexBuilder::new(pattern)
        .case_insensitive(case_insensitive)
        .build()
    {
        Ok(regex) => Some(CompiledPattern { regex, names }),
        Err(e) => {
            warn!(
                uri = %route.uri,
                domain = ?route.domain,
                handler = %route.handler,
                pattern = %pattern,
                error = %e,
                "Route pattern failed to compile; route will never match"
            );
            None
        }
    }
}
