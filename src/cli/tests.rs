//! Unit tests for CLI commands

use crate::cli::{format_routes, run, Cli, Commands};
use crate::route::{EffectiveRoute, Handler, HttpVerb};
use clap::Parser;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;

#[test]
fn test_lint_command_with_flags() {
    let cli = Cli::try_parse_from([
        "route-attributes",
        "lint",
        "--config",
        "routes.toml",
        "--fail-on-error",
        "--errors-only",
    ])
    .unwrap();

    assert_eq!(cli.config.to_string_lossy(), "routes.toml");
    match cli.command {
        Commands::Lint {
            fail_on_error,
            errors_only,
        } => {
            assert!(fail_on_error);
            assert!(errors_only);
        }
        _ => panic!("Expected Lint command"),
    }
}

#[test]
fn test_list_and_cache_parse() {
    let cli = Cli::try_parse_from(["route-attributes", "list", "--json"]).unwrap();
    assert!(matches!(cli.command, Commands::List { json: true }));

    let cli = Cli::try_parse_from(["route-attributes", "cache", "-o", "routes.json"]).unwrap();
    match cli.command {
        Commands::Cache { output } => {
            assert_eq!(output.unwrap().to_string_lossy(), "routes.json");
        }
        _ => panic!("Expected Cache command"),
    }

    assert!(Cli::try_parse_from(["route-attributes", "serve"]).is_err());
}

#[test]
fn test_format_routes_aligns_columns() {
    let route = EffectiveRoute {
        verbs: BTreeSet::from([HttpVerb::Get, HttpVerb::Post]),
        uri: "users/{id}".to_string(),
        handler: Handler::new(r"App\UserController", "show"),
        name: Some("users.show".to_string()),
        middleware: vec!["web".to_string(), "auth".to_string()],
        domain: None,
        wheres: BTreeMap::new(),
        scope_bindings: None,
    };
    let out = format_routes(&[route]);
    let lines: Vec<_> = out.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("METHOD"));
    assert!(lines[1].starts_with("GET|POST"));
    assert!(lines[1].contains(r"App\UserController@show"));
    assert!(lines[1].ends_with("web,auth"));
    assert_eq!(lines[0].find("URI"), lines[1].find("users/{id}"));
}

#[test]
fn test_cache_and_clear_commands() {
    let dir = tempfile::tempdir().unwrap();
    let controllers = dir.path().join("app/Http/Controllers");
    fs::create_dir_all(&controllers).unwrap();
    fs::write(
        controllers.join("HomeController.rs"),
        "pub struct HomeController;\nimpl HomeController {\n    #[get(\"/\")]\n    pub fn index(&self) {}\n}\n",
    )
    .unwrap();
    let config = dir.path().join("route-attributes.yaml");
    fs::write(
        &config,
        "app:\n  route_cache: cache/routes.json\ndirectories:\n  - app/Http/Controllers\n",
    )
    .unwrap();
    let config_arg = config.to_string_lossy().to_string();

    let cli = Cli::try_parse_from(["route-attributes", "--config", &config_arg, "cache"]).unwrap();
    run(cli).unwrap();
    let cache = dir.path().join("cache/routes.json");
    assert!(cache.exists());
    let written = fs::read_to_string(&cache).unwrap();
    assert!(written.contains(r"App\\Http\\Controllers\\HomeController"));

    let cli = Cli::try_parse_from(["route-attributes", "clear", "--config", &config_arg]).unwrap();
    run(cli).unwrap();
    assert!(!cache.exists());
}
