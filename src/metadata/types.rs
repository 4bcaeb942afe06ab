use crate::route::{GroupOptions, HttpVerb};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};

/// Pattern applied by `#[where_number(..)]`.
pub const WHERE_NUMBER: &str = "[0-9]+";
/// Pattern applied by `#[where_alpha(..)]`.
pub const WHERE_ALPHA: &str = "[a-zA-Z]+";
/// Pattern applied by `#[where_alpha_numeric(..)]`.
pub const WHERE_ALPHA_NUMERIC: &str = "[a-zA-Z0-9]+";
/// Pattern applied by `#[where_uuid(..)]`.
pub const WHERE_UUID: &str =
    r"[\da-fA-F]{8}-[\da-fA-F]{4}-[\da-fA-F]{4}-[\da-fA-F]{4}-[\da-fA-F]{12}";
/// Pattern applied by `#[where_ulid(..)]`.
pub const WHERE_ULID: &str = "[0-7][0-9a-hjkmnp-tv-zA-HJKMNP-TV-Z]{25}";

/// Check that a where-constraint compiles as an anchored parameter pattern.
pub fn validate_where_pattern(pattern: &str) -> Result<(), regex::Error> {
    Regex::new(&format!("^(?:{pattern})$")).map(|_| ())
}

/// Class-level route declarations of a controller.
///
/// A controller without any class-level attribute yields
/// `GroupSpec::default()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupSpec {
    pub prefix: Option<String>,
    pub domain: Option<String>,
    pub middleware: Vec<String>,
    pub name_prefix: Option<String>,
    pub wheres: BTreeMap<String, String>,
    /// Verb given to every public method that declares none
    pub fallback_verb: Option<HttpVerb>,
    pub scope_bindings: Option<bool>,
    /// One entry per `#[group(..)]`; each route is registered once per subgroup
    pub subgroups: Vec<GroupOptions>,
}

impl GroupSpec {
    /// The class-level options as [`GroupOptions`].
    #[must_use]
    pub fn options(&self) -> GroupOptions {
        GroupOptions {
            prefix: self.prefix.clone(),
            domain: self.domain.clone(),
            middleware: self.middleware.clone(),
            name_prefix: self.name_prefix.clone(),
            wheres: self.wheres.clone(),
        }
    }
}

/// One route declared by a controller method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSpec {
    /// Never empty
    pub verbs: BTreeSet<HttpVerb>,
    /// Normalized, without the group prefix
    pub uri: String,
    pub controller_method: String,
    pub name: Option<String>,
    pub middleware: Vec<String>,
    pub domain: Option<String>,
    pub wheres: BTreeMap<String, String>,
}
