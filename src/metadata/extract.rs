use super::args::{
    expect_bool, expect_string, expect_strings, positional_strings, AttributeArgs,
};
use super::load::LoadedClass;
use super::types::{
    validate_where_pattern, GroupSpec, RouteSpec, WHERE_ALPHA, WHERE_ALPHA_NUMERIC, WHERE_NUMBER,
    WHERE_ULID, WHERE_UUID,
};
use crate::error::RegistrarError;
use crate::route::{GroupOptions, HttpVerb};
use crate::uri::{kebab_case, normalize_uri};
use std::collections::{BTreeMap, BTreeSet};
use syn::ext::IdentExt;
use syn::{Attribute, ImplItem, ImplItemFn, Visibility};
use tracing::debug;

/// Member label used in errors raised by struct-level attributes.
const CLASS_MEMBER: &str = "class attributes";

/// Attribute names that declare a route on a method.
pub const VERB_ATTRIBUTES: [&str; 9] = [
    "get", "post", "put", "patch", "delete", "options", "head", "any", "route",
];

const VERB_ARGS: [&str; 4] = ["uri", "name", "middleware", "domain"];
const ROUTE_ARGS: [&str; 5] = ["methods", "uri", "name", "middleware", "domain"];
const GROUP_ARGS: [&str; 4] = ["prefix", "domain", "name_prefix", "middleware"];

/// Last path segment of an attribute, so `#[route_attributes::get]` reads as `get`.
pub(crate) fn attribute_name(attr: &Attribute) -> Option<String> {
    attr.path().segments.last().map(|s| s.ident.to_string())
}

/// Whether a method carries at least one verb attribute.
pub(crate) fn has_verb_attribute(attrs: &[Attribute]) -> bool {
    attrs.iter().any(|attr| {
        attribute_name(attr).is_some_and(|name| VERB_ATTRIBUTES.contains(&name.as_str()))
    })
}

/// Turns the attributes of a loaded controller into a [`GroupSpec`] and its
/// [`RouteSpec`]s.
pub struct MetadataExtractor;

impl MetadataExtractor {
    /// Extract the class-level group and the ordered routes of `class`.
    ///
    /// Methods are visited in declaration order across the controller's
    /// inherent impl blocks. Trait impl methods are never routes.
    pub fn extract(class: &LoadedClass) -> Result<(GroupSpec, Vec<RouteSpec>), RegistrarError> {
        let group = Self::extract_group(class)?;
        let mut routes = Vec::new();

        for imp in &class.inherent_impls {
            for item in &imp.items {
                let ImplItem::Fn(method) = item else {
                    continue;
                };
                if let Some(route) = Self::extract_route(class.name(), &group, method)? {
                    routes.push(route);
                }
            }
        }

        debug!(
            class = %class.name(),
            routes = routes.len(),
            subgroups = group.subgroups.len(),
            "Extracted route metadata"
        );
        Ok((group, routes))
    }

    /// Read the struct-level attributes of `class`.
    pub fn extract_group(class: &LoadedClass) -> Result<GroupSpec, RegistrarError> {
        let fail = |message: String| RegistrarError::invalid(class.name(), CLASS_MEMBER, message);
        let mut group = GroupSpec::default();

        for attr in &class.item.attrs {
            let Some(name) = attribute_name(attr) else {
                continue;
            };
            match name.as_str() {
                "prefix" => group.prefix = Some(single_string(attr, "prefix").map_err(fail)?),
                "domain" => group.domain = Some(single_string(attr, "domain").map_err(fail)?),
                "name_prefix" => {
                    group.name_prefix = Some(single_string(attr, "name_prefix").map_err(fail)?)
                }
                "middleware" => {
                    let args = AttributeArgs::parse(attr).map_err(fail)?;
                    group
                        .middleware
                        .extend(positional_strings(&args, "middleware").map_err(fail)?);
                }
                "scope_bindings" => {
                    let args = AttributeArgs::parse(attr).map_err(fail)?;
                    let enabled = match args.positional.first() {
                        Some(expr) => expect_bool(expr, "scope_bindings").map_err(fail)?,
                        None => true,
                    };
                    group.scope_bindings = Some(enabled);
                }
                "fallback_verb" => {
                    let verb = single_string(attr, "fallback_verb").map_err(fail)?;
                    let verb = verb.parse::<HttpVerb>().map_err(|e| fail(e.to_string()))?;
                    group.fallback_verb = Some(verb);
                }
                "group" => group.subgroups.push(parse_group(attr).map_err(fail)?),
                other => {
                    apply_where(other, attr, &mut group.wheres).map_err(fail)?;
                }
            }
        }
        Ok(group)
    }

    /// Build the route declared by one method, if it declares one.
    fn extract_route(
        class: &str,
        group: &GroupSpec,
        method: &ImplItemFn,
    ) -> Result<Option<RouteSpec>, RegistrarError> {
        let method_name = method.sig.ident.unraw().to_string();
        let fail = |message: String| RegistrarError::invalid(class, &method_name, message);

        if !matches!(method.vis, Visibility::Public(_)) {
            if has_verb_attribute(&method.attrs) {
                debug!(class, method = %method_name, "Skipping non-public route method");
            }
            return Ok(None);
        }

        let mut decl = RouteDecl::default();
        let mut declared_verb = false;

        for attr in &method.attrs {
            let Some(name) = attribute_name(attr) else {
                continue;
            };
            match name.as_str() {
                "get" | "post" | "put" | "patch" | "delete" | "options" | "head" | "any" => {
                    let args = AttributeArgs::parse(attr).map_err(fail)?;
                    args.reject_unknown(&VERB_ARGS).map_err(fail)?;
                    let verbs = HttpVerb::parse_many(&name).map_err(|e| fail(e.to_string()))?;
                    decl.verbs.extend(verbs);
                    decl.absorb(&args, 0).map_err(fail)?;
                    declared_verb = true;
                }
                "route" => {
                    let args = AttributeArgs::parse(attr).map_err(fail)?;
                    args.reject_unknown(&ROUTE_ARGS).map_err(fail)?;
                    let methods = args
                        .get(0, "methods")
                        .ok_or_else(|| fail("route requires `methods`".to_string()))?;
                    for verb in expect_strings(methods, "methods").map_err(fail)? {
                        let verbs = HttpVerb::parse_many(&verb).map_err(|e| fail(e.to_string()))?;
                        decl.verbs.extend(verbs);
                    }
                    let uri_index = if args.named("methods").is_some() { 0 } else { 1 };
                    decl.absorb(&args, uri_index).map_err(fail)?;
                    declared_verb = true;
                }
                "middleware" => {
                    let args = AttributeArgs::parse(attr).map_err(fail)?;
                    decl.middleware
                        .extend(positional_strings(&args, "middleware").map_err(fail)?);
                }
                "domain" => {
                    let domain = single_string(attr, "domain").map_err(fail)?;
                    decl.set_domain(domain).map_err(fail)?;
                }
                "name" => {
                    let route_name = single_string(attr, "name").map_err(fail)?;
                    decl.set_name(route_name).map_err(fail)?;
                }
                other => {
                    apply_where(other, attr, &mut decl.wheres).map_err(fail)?;
                }
            }
        }

        if !declared_verb {
            match group.fallback_verb {
                Some(verb) if method.sig.receiver().is_some() => {
                    decl.verbs.insert(verb);
                }
                _ => return Ok(None),
            }
        }
        if decl.verbs.is_empty() {
            return Err(fail("route declares no HTTP verbs".to_string()));
        }

        let uri = match decl.uri {
            Some(uri) => normalize_uri(&uri),
            None => kebab_case(&method_name).ok_or_else(|| {
                fail(format!(
                    "no URI given and none can be derived from method name `{method_name}`"
                ))
            })?,
        };

        Ok(Some(RouteSpec {
            verbs: decl.verbs,
            uri,
            controller_method: method_name.clone(),
            name: decl.name,
            middleware: decl.middleware,
            domain: decl.domain,
            wheres: decl.wheres,
        }))
    }
}

/// Accumulates every route attribute found on one method.
#[derive(Default)]
struct RouteDecl {
    verbs: BTreeSet<HttpVerb>,
    uri: Option<String>,
    name: Option<String>,
    middleware: Vec<String>,
    domain: Option<String>,
    wheres: BTreeMap<String, String>,
}

impl RouteDecl {
    /// Fold in the optional arguments of a verb or `route` attribute; the URI
    /// sits at `uri_index` when given positionally.
    fn absorb(&mut self, args: &AttributeArgs, uri_index: usize) -> Result<(), String> {
        if let Some(expr) = args.get(uri_index, "uri") {
            let uri = expect_string(expr, "uri")?;
            merge_explicit(&mut self.uri, uri, "URIs")?;
        }
        if let Some(expr) = args.named("name") {
            self.set_name(expect_string(expr, "name")?)?;
        }
        if let Some(expr) = args.named("domain") {
            self.set_domain(expect_string(expr, "domain")?)?;
        }
        if let Some(expr) = args.named("middleware") {
            self.middleware.extend(expect_strings(expr, "middleware")?);
        }
        Ok(())
    }

    fn set_name(&mut self, name: String) -> Result<(), String> {
        merge_explicit(&mut self.name, name, "route names")
    }

    fn set_domain(&mut self, domain: String) -> Result<(), String> {
        merge_explicit(&mut self.domain, domain, "domains")
    }
}

fn merge_explicit(slot: &mut Option<String>, value: String, what: &str) -> Result<(), String> {
    match slot {
        Some(existing) if *existing != value => Err(format!(
            "conflicting {what} `{existing}` and `{value}` on one method"
        )),
        Some(_) => Ok(()),
        None => {
            *slot = Some(value);
            Ok(())
        }
    }
}

/// Exactly one string argument, positional or `#[attr = ".."]`.
fn single_string(attr: &Attribute, what: &str) -> Result<String, String> {
    let args = AttributeArgs::parse(attr)?;
    match (args.positional.as_slice(), args.named.is_empty()) {
        ([expr], true) => expect_string(expr, what),
        _ => Err(format!("{what} takes exactly one string argument")),
    }
}

fn parse_group(attr: &Attribute) -> Result<GroupOptions, String> {
    let args = AttributeArgs::parse(attr)?;
    args.reject_unknown(&GROUP_ARGS)?;
    if !args.positional.is_empty() {
        return Err("group only takes named arguments".to_string());
    }

    let optional = |key: &str| -> Result<Option<String>, String> {
        args.named(key).map(|e| expect_string(e, key)).transpose()
    };
    Ok(GroupOptions {
        prefix: optional("prefix")?,
        domain: optional("domain")?,
        name_prefix: optional("name_prefix")?,
        middleware: match args.named("middleware") {
            Some(expr) => expect_strings(expr, "middleware")?,
            None => Vec::new(),
        },
        wheres: BTreeMap::new(),
    })
}

/// Apply a where attribute to `wheres`. Attributes that are not where
/// constraints are ignored.
fn apply_where(
    name: &str,
    attr: &Attribute,
    wheres: &mut BTreeMap<String, String>,
) -> Result<(), String> {
    let preset = match name {
        "where_number" => Some(WHERE_NUMBER),
        "where_alpha" => Some(WHERE_ALPHA),
        "where_alpha_numeric" => Some(WHERE_ALPHA_NUMERIC),
        "where_uuid" => Some(WHERE_UUID),
        "where_ulid" => Some(WHERE_ULID),
        "where_pattern" | "where_in" => None,
        _ => return Ok(()),
    };
    let args = AttributeArgs::parse(attr)?;
    if !args.named.is_empty() {
        return Err(format!("{name} only takes positional arguments"));
    }

    if let Some(pattern) = preset {
        let params = positional_strings(&args, "parameter name")?;
        if params.is_empty() {
            return Err(format!("{name} requires at least one parameter name"));
        }
        for param in params {
            wheres.insert(param, pattern.to_string());
        }
        return Ok(());
    }

    let [param, value] = args.positional.as_slice() else {
        return Err(format!("{name} takes a parameter name and a value"));
    };
    let param = expect_string(param, "parameter name")?;
    let pattern = if name == "where_in" {
        let values = expect_strings(value, "where_in value")?;
        if values.is_empty() {
            return Err("where_in requires at least one value".to_string());
        }
        values
            .iter()
            .map(|v| regex::escape(v))
            .collect::<Vec<_>>()
            .join("|")
    } else {
        expect_string(value, "pattern")?
    };
    validate_where_pattern(&pattern)
        .map_err(|e| format!("invalid where pattern for `{param}`: {e}"))?;
    wheres.insert(param, pattern);
    Ok(())
}
