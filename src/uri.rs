//! URI and identifier helpers shared by the resolver, the extractor and the
//! route table.
//!
//! Route URIs are stored in one canonical form: segments separated by a single
//! `/`, no leading or trailing slash, and `/` for the root. Every URI that
//! reaches a [`Router`](crate::router::Router) has gone through
//! [`normalize_uri`].

/// Normalize a URI: collapse duplicate slashes, strip leading and trailing
/// slashes, map the empty URI to `/`.
///
/// ```
/// use route_attributes::uri::normalize_uri;
///
/// assert_eq!(normalize_uri("//api///users/"), "api/users");
/// assert_eq!(normalize_uri(""), "/");
/// ```
#[must_use]
pub fn normalize_uri(uri: &str) -> String {
    let joined = uri
        .split('/')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/");
    if joined.is_empty() {
        "/".to_string()
    } else {
        joined
    }
}

/// Join a prefix and a path into one normalized URI.
#[must_use]
pub fn join_uri(prefix: &str, path: &str) -> String {
    normalize_uri(&format!("{prefix}/{path}"))
}

/// Kebab-case a method name, the default URI for a route that declares none.
///
/// Handles both `snake_case` and `camelCase` names; returns `None` when the
/// name has no alphanumeric content to build a URI from.
#[must_use]
pub fn kebab_case(name: &str) -> Option<String> {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_is_word = false;

    for ch in name.chars() {
        if ch == '_' || ch == '-' || ch.is_whitespace() {
            if prev_is_word {
                out.push('-');
            }
            prev_is_word = false;
            continue;
        }
        if ch.is_uppercase() && prev_is_word {
            out.push('-');
        }
        out.extend(ch.to_lowercase());
        prev_is_word = true;
    }

    let trimmed = out.trim_matches('-');
    if trimmed.chars().any(char::is_alphanumeric) {
        Some(trimmed.to_string())
    } else {
        None
    }
}

/// UpperCamelCase a file stem (`first_controller` -> `FirstController`).
///
/// Stems that are already `PascalCase` come back unchanged.
#[must_use]
pub fn upper_camel_case(stem: &str) -> String {
    stem.split(['_', '-'])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}
