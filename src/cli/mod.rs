//! # CLI Module
//!
//! Command-line access to discovery, linting and the route cache.
//!
//! ## Commands
//!
//! ```bash
//! # Show every discovered route
//! route-attributes --config route-attributes.yaml list
//! route-attributes list --json
//!
//! # Lint controllers, failing the build on errors
//! route-attributes lint --fail-on-error
//!
//! # Write or remove the route cache
//! route-attributes cache --output bootstrap/cache/routes.json
//! route-attributes clear
//!
//! # Rebuild routes whenever a controller changes
//! route-attributes watch
//! ```
//!
//! `--config` defaults to `route-attributes.yaml` and can also be set with
//! `ROUTE_ATTRIBUTES_CONFIG`.

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{format_routes, run, run_cli, Cli, Commands};
