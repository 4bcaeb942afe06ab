#![allow(clippy::unwrap_used, clippy::expect_used)]

use arc_swap::ArcSwap;
use http::Method;
use route_attributes::config::load_config;
use route_attributes::hot_reload::{rebuild_table, watch_directories};
use route_attributes::provider::{AppContext, RouteAttributesServiceProvider};
use std::sync::{Arc, Mutex};
use std::time::Duration;

mod common;
use common::temp_controllers::{get_controller, write_controller};

#[test]
fn test_watch_directories_reload() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write_controller(
        root,
        "app/Http/Controllers/HomeController.rs",
        &get_controller("HomeController", "home", "index"),
    );
    let config_path = root.join("route-attributes.yaml");
    std::fs::write(&config_path, "directories:\n  - app/Http/Controllers\n").unwrap();
    let config = load_config(&config_path).unwrap();
    let app = AppContext::from(&config.app);
    let provider = RouteAttributesServiceProvider::new(config);

    let table = Arc::new(ArcSwap::from_pointee(rebuild_table(&provider, &app).unwrap()));
    assert_eq!(table.load().len(), 1);

    let reloads: Arc<Mutex<Vec<usize>>> = Arc::new(Mutex::new(Vec::new()));
    let reloads_clone = Arc::clone(&reloads);
    let watcher = watch_directories(provider, app, Arc::clone(&table), move |rebuilt| {
        reloads_clone.lock().unwrap().push(rebuilt.len());
    })
    .expect("watch_directories");

    // allow watcher thread to start
    std::thread::sleep(Duration::from_millis(100));

    write_controller(
        root,
        "app/Http/Controllers/AboutController.rs",
        &get_controller("AboutController", "about", "index"),
    );

    // wait for the rebuilt table to be published
    for _ in 0..200 {
        if table.load().len() == 2 {
            break;
        }
        std::thread::sleep(Duration::from_millis(50));
    }

    let current = table.load();
    assert_eq!(current.len(), 2);
    let about = current.route(&Method::GET, None, "/about").unwrap();
    assert_eq!(
        about.route.handler.to_string(),
        r"App\Http\Controllers\AboutController@index"
    );
    assert!(reloads.lock().unwrap().contains(&2));

    drop(watcher);
}

#[test]
fn test_rebuild_skips_broken_controllers() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write_controller(
        root,
        "app/Http/Controllers/HomeController.rs",
        &get_controller("HomeController", "home", "index"),
    );
    write_controller(root, "app/Http/Controllers/BrokenController.rs", "pub struct {");
    let config_path = root.join("route-attributes.yaml");
    std::fs::write(&config_path, "directories:\n  - app/Http/Controllers\n").unwrap();
    let config = load_config(&config_path).unwrap();
    let app = AppContext::from(&config.app);
    let provider = RouteAttributesServiceProvider::new(config);

    let table = rebuild_table(&provider, &app).unwrap();
    assert_eq!(table.len(), 1);
    assert!(table.route(&Method::GET, None, "/home").is_some());
}
