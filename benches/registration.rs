use criterion::{criterion_group, criterion_main, Criterion};
use http::Method;
use route_attributes::registrar::RouteRegistrar;
use route_attributes::router::RouteTable;
use std::hint::black_box;
use std::path::Path;

const CONTROLLERS: usize = 40;

fn controller_source(index: usize) -> String {
    format!(
        r#"#[prefix("zoo/{index}")]
#[middleware("web")]
pub struct Animal{index}Controller;

impl Animal{index}Controller {{
    #[get("animals")]
    pub fn index(&self) {{}}

    #[get("animals/{{id}}", name = "animals{index}.show")]
    #[where_number("id")]
    pub fn show(&self) {{}}

    #[put("animals/{{id}}")]
    #[patch("animals/{{id}}")]
    pub fn update(&self) {{}}

    #[delete("animals/{{id}}/toys/{{toy_id}}")]
    pub fn remove_toy(&self) {{}}
}}
"#
    )
}

fn write_tree(root: &Path) {
    for i in 0..CONTROLLERS {
        let dir = root.join(format!("Group{}", i % 4));
        std::fs::create_dir_all(&dir).expect("create controller dir");
        std::fs::write(
            dir.join(format!("Animal{i}Controller.rs")),
            controller_source(i),
        )
        .expect("write controller");
    }
}

fn register(root: &Path) -> RouteTable {
    let mut registrar = RouteRegistrar::new(RouteTable::new());
    registrar.use_base_path(root).use_root_namespace("App");
    registrar
        .register_directory(root)
        .expect("register directory");
    registrar.into_router()
}

fn bench_register_directory(c: &mut Criterion) {
    let dir = tempfile::tempdir().expect("tempdir");
    write_tree(dir.path());
    c.bench_function("register_directory", |b| {
        b.iter(|| black_box(register(dir.path())))
    });
}

fn bench_route_match(c: &mut Criterion) {
    let dir = tempfile::tempdir().expect("tempdir");
    write_tree(dir.path());
    let table = register(dir.path());
    c.bench_function("route_match", |b| {
        let test_paths = [
            (Method::GET, "/zoo/0/animals"),
            (Method::GET, "/zoo/17/animals/123"),
            (Method::PATCH, "/zoo/39/animals/5"),
            (Method::DELETE, "/zoo/21/animals/1/toys/2"),
            (Method::GET, "/zoo/3/animals/not-a-number"),
        ];
        b.iter(|| {
            for (method, path) in test_paths.iter() {
                let res = table.route(method, None, path);
                black_box(&res);
            }
        })
    });
}

criterion_group!(benches, bench_register_directory, bench_route_match);
criterion_main!(benches);
