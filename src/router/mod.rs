//! # Router Module
//!
//! The sink side of route registration.
//!
//! ## Overview
//!
//! - [`Router`] is the one call the registrar makes per effective route:
//!   `add_route(verbs, uri, handler, options)`. Host applications implement it
//!   for their own router.
//! - `Vec<EffectiveRoute>` implements [`Router`] as a recording sink.
//! - [`RouteTable`] is an in-memory router with the replacement and
//!   first-match semantics a web framework router has. The CLI, the route
//!   cache and the directory watcher all build one.
//!
//! ## Example
//!
//! ```rust
//! use http::Method;
//! use route_attributes::route::{Handler, HttpVerb};
//! use route_attributes::router::{RouteOptions, RouteTable, Router};
//!
//! let mut table = RouteTable::new();
//! table.add_route(
//!     &[HttpVerb::Get],
//!     "users/{id}",
//!     Handler::new(r"App\UserController", "show"),
//!     RouteOptions::default(),
//! );
//!
//! let matched = table.route(&Method::GET, None, "/users/42").unwrap();
//! assert_eq!(matched.get_param("id"), Some("42"));
//! ```

mod core;

pub use self::core::{ParamVec, RouteMatch, RouteTable, MAX_INLINE_PARAMS};

use crate::route::{EffectiveRoute, Handler, HttpVerb};
use std::collections::BTreeMap;

/// Everything about a route besides its verbs, URI and handler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteOptions {
    pub name: Option<String>,
    pub middleware: Vec<String>,
    pub domain: Option<String>,
    pub wheres: BTreeMap<String, String>,
    pub scope_bindings: Option<bool>,
}

/// Opaque reference to a registered route, as returned by the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RouteHandle(pub usize);

/// Receives route registrations.
pub trait Router {
    /// Register one route. Called once per effective route, in discovery order.
    fn add_route(
        &mut self,
        verbs: &[HttpVerb],
        uri: &str,
        handler: Handler,
        options: RouteOptions,
    ) -> RouteHandle;
}

impl<R: Router + ?Sized> Router for &mut R {
    fn add_route(
        &mut self,
        verbs: &[HttpVerb],
        uri: &str,
        handler: Handler,
        options: RouteOptions,
    ) -> RouteHandle {
        (**self).add_route(verbs, uri, handler, options)
    }
}

impl Router for Vec<EffectiveRoute> {
    fn add_route(
        &mut self,
        verbs: &[HttpVerb],
        uri: &str,
        handler: Handler,
        options: RouteOptions,
    ) -> RouteHandle {
        self.push(EffectiveRoute::from_parts(verbs, uri, handler, options));
        RouteHandle(self.len() - 1)
    }
}

impl EffectiveRoute {
    /// Reassemble a route from the arguments of [`Router::add_route`].
    #[must_use]
    pub fn from_parts(
        verbs: &[HttpVerb],
        uri: &str,
        handler: Handler,
        options: RouteOptions,
    ) -> Self {
        EffectiveRoute {
            verbs: verbs.iter().copied().collect(),
            uri: uri.to_string(),
            handler,
            name: options.name,
            middleware: options.middleware,
            domain: options.domain,
            wheres: options.wheres,
            scope_bindings: options.scope_bindings,
        }
    }

    /// The [`RouteOptions`] part of this route.
    #[must_use]
    pub fn options(&self) -> RouteOptions {
        RouteOptions {
            name: self.name.clone(),
            middleware: self.middleware.clone(),
            domain: self.domain.clone(),
            wheres: self.wheres.clone(),
            scope_bindings: self.scope_bindings,
        }
    }
}
