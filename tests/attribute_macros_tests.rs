#![allow(clippy::unwrap_used, clippy::expect_used)]

use http::Method;
use route_attributes::metadata::{WHERE_ALPHA, WHERE_NUMBER, WHERE_UUID};
use route_attributes::registrar::RouteRegistrar;
use route_attributes::router::RouteTable;

mod common;
use common::{fixture_path, FIXTURE_NAMESPACE};

// The same file is compiled here and read by the registrar below.
#[path = "fixtures/Attributes/AnnotatedPostController.rs"]
mod annotated;
use annotated::AnnotatedPostController;

const CLASS: &str = r"Tests\Fixtures\Attributes\AnnotatedPostController";

#[test]
fn test_attributes_leave_items_unchanged() {
    let controller = AnnotatedPostController;
    assert_eq!(controller.show(), "show");
    assert_eq!(controller.update_comment(), "update_comment");
    assert_eq!(controller.export(), "export");
    assert_eq!(controller.tag(), "tag");
}

#[test]
fn test_class_and_multi_param_wheres_are_registered() {
    let mut registrar = RouteRegistrar::new(Vec::new());
    registrar
        .use_base_path(fixture_path(""))
        .use_root_namespace(FIXTURE_NAMESPACE);
    let count = registrar
        .register_file(fixture_path("Attributes/AnnotatedPostController.rs"))
        .unwrap();
    assert_eq!(count, 4);

    let routes = registrar.router();
    let by_method = |method: &str| {
        routes
            .iter()
            .find(|r| r.handler.class == CLASS && r.handler.method == method)
            .unwrap()
    };

    let show = by_method("show");
    assert_eq!(show.uri, "posts/{post}");
    assert_eq!(show.wheres["post"], WHERE_NUMBER);
    assert_eq!(show.wheres["author"], WHERE_UUID);
    assert_eq!(show.wheres["editor"], WHERE_UUID);

    let update = by_method("update_comment");
    assert_eq!(update.wheres["post"], WHERE_NUMBER);
    assert_eq!(update.wheres["comment"], WHERE_NUMBER);

    let export = by_method("export");
    assert_eq!(export.wheres["post"], "[0-9]{1,3}");
    assert_eq!(export.wheres["format"], "json|xml");

    let tag = by_method("tag");
    assert_eq!(tag.wheres["tag"], WHERE_ALPHA);
    assert_eq!(tag.domain.as_deref(), Some("blog.example.com"));
}

#[test]
fn test_wheres_constrain_matching() {
    let mut registrar = RouteRegistrar::new(RouteTable::new());
    registrar
        .use_base_path(fixture_path(""))
        .use_root_namespace(FIXTURE_NAMESPACE);
    registrar
        .register_file(fixture_path("Attributes/AnnotatedPostController.rs"))
        .unwrap();
    let table = registrar.into_router();

    let hit = table.route(&Method::GET, None, "/posts/12").unwrap();
    assert_eq!(hit.route.handler.method, "show");
    assert!(table.route(&Method::GET, None, "/posts/abc").is_none());

    assert!(table
        .route(&Method::PUT, None, "/posts/1/comments/9")
        .is_some());
    assert!(table
        .route(&Method::PUT, None, "/posts/1/comments/x")
        .is_none());

    let hit = table.route(&Method::GET, None, "/posts/7/export/xml").unwrap();
    assert_eq!(hit.get_param("format"), Some("xml"));
    assert!(table.route(&Method::GET, None, "/posts/7/export/csv").is_none());
    assert!(table.route(&Method::GET, None, "/posts/1234/export/json").is_none());

    assert!(table
        .route(&Method::GET, Some("blog.example.com"), "/posts/1/tags/rust")
        .is_some());
    assert!(table
        .route(&Method::GET, Some("blog.example.com"), "/posts/1/tags/r2")
        .is_none());
}
