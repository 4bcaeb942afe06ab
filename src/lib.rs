//! # route-attributes
//!
//! **route-attributes** discovers HTTP routes declared as attributes on
//! controller structs and registers them with a router.
//!
//! ## Overview
//!
//! A controller is a struct in a `.rs` file whose inherent `pub` methods carry
//! route attributes:
//!
//! ```rust,ignore
//! use route_attributes::attributes::{get, middleware, post, prefix};
//!
//! #[prefix("users")]
//! #[middleware("auth")]
//! pub struct UserController;
//!
//! impl UserController {
//!     #[get("{user}", name = "users.show")]
//!     pub fn show(&self) {}
//!
//!     #[post]
//!     pub fn store(&self) {}
//! }
//! ```
//!
//! Discovery is static: files are parsed with `syn`, nothing is compiled or
//! executed. The attribute macros themselves are inert, so annotated
//! controllers compile unchanged in the host application.
//!
//! ## Architecture
//!
//! - **[`resolver`]** - maps a file path to a fully-qualified controller identifier
//! - **[`metadata`]** - parses controller files and extracts route declarations
//! - **[`registrar`]** - walks directories, merges group options and registers routes
//! - **[`router`]** - the [`Router`](router::Router) sink trait and the in-memory
//!   [`RouteTable`](router::RouteTable)
//! - **[`provider`]** - configuration-driven registration of every configured directory
//! - **[`config`]** - YAML/TOML/JSON configuration loading
//! - **[`cache`]** - JSON route cache
//! - **[`linter`]** - static checks over controller sources
//! - **[`hot_reload`]** - rebuilds the route table when controllers change
//!
//! ### Discovery Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Provider as RouteAttributesServiceProvider
//!     participant Registrar as RouteRegistrar
//!     participant Resolver as ClassResolver
//!     participant Loader as ClassLoader
//!     participant Extractor as MetadataExtractor
//!     participant Router
//!
//!     Provider->>Provider: normalize directories, reverse order
//!     loop each directory
//!         Provider->>Registrar: use_root_namespace / use_base_path / group
//!         Registrar->>Registrar: walk *.rs (sorted)
//!         loop each file
//!             Registrar->>Resolver: resolve(file)
//!             Resolver-->>Registrar: App\Http\Controllers\UserController
//!             Registrar->>Loader: load(resolved)
//!             Loader-->>Registrar: struct + inherent impls
//!             Registrar->>Extractor: extract(class)
//!             Extractor-->>Registrar: GroupSpec + RouteSpec[]
//!             Registrar->>Router: add_route(verbs, uri, handler, options)
//!         end
//!     end
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use route_attributes::config::load_config;
//! use route_attributes::provider::{AppContext, RouteAttributesServiceProvider};
//! use route_attributes::router::RouteTable;
//!
//! let config = load_config("route-attributes.yaml")?;
//! let app = AppContext::from(&config.app);
//! let provider = RouteAttributesServiceProvider::new(config);
//!
//! let registrar = provider.boot(&app, RouteTable::new())?;
//! println!("{} routes registered", registrar.registered_count());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod hot_reload;
pub mod linter;
pub mod logging;
pub mod metadata;
pub mod provider;
pub mod registrar;
pub mod resolver;
pub mod route;
pub mod router;
pub mod uri;

/// Inert route attributes for controller sources.
#[cfg(feature = "macros")]
pub mod attributes {
    pub use route_attributes_macros::*;
}

pub use error::{ConfigError, RegistrarError};
pub use provider::{AppContext, Application, RouteAttributesServiceProvider};
pub use registrar::RouteRegistrar;
pub use route::{EffectiveRoute, GroupOptions, Handler, HttpVerb};
pub use router::{RouteTable, Router};
