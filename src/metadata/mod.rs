//! # Metadata Module
//!
//! Reads controller source files and turns their route attributes into
//! [`GroupSpec`] and [`RouteSpec`] values.
//!
//! ## Overview
//!
//! - [`ClassLoader`] parses a file with `syn` and confirms it declares a
//!   concrete controller struct
//! - [`MetadataExtractor`] reads struct-level attributes into a [`GroupSpec`]
//!   and method-level attributes into ordered [`RouteSpec`]s
//!
//! ## Attributes
//!
//! ```rust,ignore
//! #[prefix("users")]
//! #[middleware("auth")]
//! #[where_number("user")]
//! pub struct UserController;
//!
//! impl UserController {
//!     #[get("{user}", name = "users.show")]
//!     pub fn show(&self) {}
//!
//!     #[post]
//!     #[middleware("verified")]
//!     pub fn store(&self) {}
//! }
//! ```
//!
//! Attributes are matched by their last path segment, so the fully-qualified
//! `#[route_attributes::attributes::get(..)]` form is recognized too.

mod args;
mod extract;
mod load;
mod types;

pub use extract::{MetadataExtractor, VERB_ATTRIBUTES};
pub(crate) use extract::has_verb_attribute;
pub use load::{ClassLoader, LoadedClass};
pub use types::{
    validate_where_pattern, GroupSpec, RouteSpec, WHERE_ALPHA, WHERE_ALPHA_NUMERIC, WHERE_NUMBER,
    WHERE_ULID, WHERE_UUID,
};
