#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Unit tests for the controller linter

use crate::linter::{has_errors, lint_config, lint_directory, LintIssue, LintSeverity};
use crate::config::{DirectoryConfig, DirectoryKey, RouteAttributesConfig};
use crate::provider::AppContext;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to write controller files into a temp dir and lint it
fn lint_files(files: &[(&str, &str)]) -> Vec<LintIssue> {
    let dir = TempDir::new().expect("create temp dir");
    for (name, source) in files {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent");
        }
        fs::write(&path, source).expect("write controller");
    }
    lint_directory(dir.path(), dir.path(), "App").expect("lint directory")
}

fn kinds<'a>(issues: &'a [LintIssue], kind: &str) -> Vec<&'a LintIssue> {
    issues.iter().filter(|i| i.kind == kind).collect()
}

#[test]
fn test_lint_clean_controller() {
    let issues = lint_files(&[(
        "UserController.rs",
        r#"
pub struct UserController;
impl UserController {
    #[get("users/{user}")]
    #[where_number("user")]
    pub fn show(&self) {}
}
"#,
    )]);
    assert!(issues.is_empty(), "unexpected issues: {issues:?}");
}

#[test]
fn test_lint_parse_error() {
    let issues = lint_files(&[("Broken.rs", "pub struct Broken {")]);
    let errors = kinds(&issues, "parse_error");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].severity, LintSeverity::Error);
    assert!(has_errors(&issues));
}

#[test]
fn test_lint_private_and_trait_routes() {
    let issues = lint_files(&[(
        "PostController.rs",
        r#"
pub struct PostController;

impl Base for PostController {
    #[get("inherited")]
    fn inherited(&self) {}
}

impl PostController {
    #[get("posts")]
    pub fn index(&self) {}

    #[post("posts")]
    fn store(&self) {}
}
"#,
    )]);

    let private = kinds(&issues, "private_route_method");
    assert_eq!(private.len(), 1);
    assert!(private[0].message.contains("store"));
    assert!(private[0].location.ends_with(":14"), "{}", private[0].location);

    let inherited = kinds(&issues, "trait_impl_route");
    assert_eq!(inherited.len(), 1);
    assert_eq!(inherited[0].severity, LintSeverity::Warning);
    assert!(!has_errors(&issues));
}

#[test]
fn test_lint_invalid_metadata_and_no_routes() {
    let issues = lint_files(&[
        (
            "BadController.rs",
            r#"
pub struct BadController;
impl BadController {
    #[get(123)]
    pub fn bad(&self) {}
}
"#,
        ),
        (
            "EmptyController.rs",
            "pub struct EmptyController;\nimpl EmptyController { pub fn helper(&self) {} }\n",
        ),
    ]);

    let invalid = kinds(&issues, "invalid_metadata");
    assert_eq!(invalid.len(), 1);
    assert!(invalid[0].location.contains("BadController.rs:"));

    let empty = kinds(&issues, "no_routes");
    assert_eq!(empty.len(), 1);
    assert_eq!(empty[0].severity, LintSeverity::Info);
}

#[test]
fn test_lint_duplicate_and_unknown_where() {
    let issues = lint_files(&[
        (
            "AController.rs",
            r#"
pub struct AController;
impl AController {
    #[get("dup")]
    #[where_alpha("slug")]
    pub fn first(&self) {}
}
"#,
        ),
        (
            "BController.rs",
            r#"
pub struct BController;
impl BController {
    #[route(["GET", "POST"], "dup")]
    pub fn second(&self) {}
}
"#,
        ),
    ]);

    let dups = kinds(&issues, "duplicate_route");
    assert_eq!(dups.len(), 1);
    assert!(dups[0].message.contains(r"App\BController@second"));
    assert!(dups[0].message.contains(r"App\AController@first"));

    let unknown = kinds(&issues, "unknown_where_param");
    assert_eq!(unknown.len(), 1);
    assert!(unknown[0].message.contains("slug"));
}

#[test]
fn test_lint_config_reports_cross_directory_overrides() {
    let dir = TempDir::new().unwrap();
    for sub in ["first", "second"] {
        fs::create_dir_all(dir.path().join(sub)).unwrap();
        fs::write(
            dir.path().join(sub).join("HomeController.rs"),
            "pub struct HomeController;\nimpl HomeController {\n    #[get(\"/\")]\n    pub fn home(&self) {}\n}\n",
        )
        .unwrap();
    }

    let mut config = RouteAttributesConfig::default();
    config.directories.0 = vec![
        (
            DirectoryKey::Namespace("First".into()),
            DirectoryConfig::Simple(dir.path().join("first")),
        ),
        (
            DirectoryKey::Namespace("Second".into()),
            DirectoryConfig::Simple(dir.path().join("second")),
        ),
    ];
    let app = AppContext::new("App", Path::new("/nonexistent"));

    let issues = lint_config(&config, &app).unwrap();
    let dups = kinds(&issues, "duplicate_route");
    assert_eq!(dups.len(), 1);
    // registered in reverse order, so the first-declared directory overrides
    assert!(dups[0].message.contains(r"First\HomeController@home overrides"));
}
