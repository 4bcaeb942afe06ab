#![allow(dead_code)]

use route_attributes::route::{EffectiveRoute, HttpVerb};
use std::path::{Path, PathBuf};

/// Root namespace the fixture tree is registered under.
pub const FIXTURE_NAMESPACE: &str = r"Tests\Fixtures";

/// Absolute path of a file or directory under `tests/fixtures`.
pub fn fixture_path(relative: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(relative)
}

pub mod temp_controllers {
    use std::fs;
    use std::path::{Path, PathBuf};

    /// Write `source` to `root/relative`, creating parent directories.
    pub fn write_controller(root: &Path, relative: &str, source: &str) -> PathBuf {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, source).unwrap();
        path
    }

    /// Source of a controller with one GET route.
    pub fn get_controller(class: &str, uri: &str, method: &str) -> String {
        format!(
            "pub struct {class};\n\nimpl {class} {{\n    #[get(\"{uri}\")]\n    pub fn {method}(&self) {{}}\n}}\n"
        )
    }
}

/// Expected shape of a registered route; unset fields are not checked.
pub struct Expected<'a> {
    pub class: &'a str,
    pub uri: &'a str,
    pub method: &'a str,
    pub verb: HttpVerb,
    pub middleware: Option<&'a [&'a str]>,
    pub name: Option<&'a str>,
    pub domain: Option<&'a str>,
}

impl<'a> Expected<'a> {
    pub fn new(class: &'a str, uri: &'a str, method: &'a str) -> Self {
        Self {
            class,
            uri,
            method,
            verb: HttpVerb::Get,
            middleware: None,
            name: None,
            domain: None,
        }
    }

    pub fn middleware(mut self, middleware: &'a [&'a str]) -> Self {
        self.middleware = Some(middleware);
        self
    }

    pub fn name(mut self, name: &'a str) -> Self {
        self.name = Some(name);
        self
    }

    pub fn domain(mut self, domain: &'a str) -> Self {
        self.domain = Some(domain);
        self
    }

    fn matches(&self, route: &EffectiveRoute) -> bool {
        route.handler.class == self.class
            && route.handler.method == self.method
            && route.uri == self.uri
            && route.verbs.contains(&self.verb)
            && self
                .middleware
                .map_or(true, |m| route.middleware.iter().map(String::as_str).eq(m.iter().copied()))
            && self.name.map_or(true, |n| route.name.as_deref() == Some(n))
            && self.domain.map_or(true, |d| route.domain.as_deref() == Some(d))
    }
}

/// Assert that exactly one route matches `expected`.
pub fn assert_route_registered(routes: &[EffectiveRoute], expected: Expected<'_>) {
    let matching = routes.iter().filter(|r| expected.matches(r)).count();
    assert_eq!(
        matching, 1,
        "expected one route {} {} -> {}@{}, registered: {:#?}",
        expected.verb, expected.uri, expected.class, expected.method, routes
    );
}
