//! # Config Module
//!
//! Loads the route-attributes configuration from YAML, TOML or JSON.
//!
//! ```yaml
//! enabled: true
//! middleware: [web]
//! app:
//!   namespace: App
//!   path: app
//! directories:
//!   - app/Http/Controllers
//! ```
//!
//! Directory entries keep their declaration order in every format. Relative
//! paths are resolved against the directory containing the config file.

mod load;
mod schema;

pub use load::{load_config, ConfigFormat, ENABLED_ENV};
pub use schema::{
    AppConfig, Directories, DirectoryConfig, DirectoryKey, ExtendedDirectory,
    RouteAttributesConfig,
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};

    const YAML: &str = r#"
enabled: true
middleware: [web]
app:
  namespace: App
  path: app
  route_cache: bootstrap/cache/routes.json
directories:
  0: app/Http/Controllers
  'Modules\Blog\Controllers': modules/blog
  modules/api:
    namespace: 'Modules\Api'
    prefix: api
    middleware: [api]
    as: api.
    where:
      id: '[0-9]+'
"#;

    #[test]
    fn test_yaml_keeps_declaration_order() {
        let config = RouteAttributesConfig::from_source(YAML, ConfigFormat::Yaml).unwrap();
        assert_eq!(config.middleware, vec!["web"]);
        let keys: Vec<_> = config.directories.iter().map(|(k, _)| k.clone()).collect();
        assert_eq!(
            keys,
            vec![
                DirectoryKey::Index(0),
                DirectoryKey::Namespace(r"Modules\Blog\Controllers".to_string()),
                DirectoryKey::Namespace("modules/api".to_string()),
            ]
        );

        let DirectoryConfig::Extended(ext) = &config.directories.0[2].1 else {
            panic!("expected extended entry");
        };
        assert_eq!(ext.path.as_deref(), Some(Path::new("modules/api")));
        assert_eq!(ext.namespace.as_deref(), Some(r"Modules\Api"));
        assert_eq!(ext.options.prefix.as_deref(), Some("api"));
        assert_eq!(ext.options.name_prefix.as_deref(), Some("api."));
        assert_eq!(ext.options.wheres["id"], "[0-9]+");
    }

    #[test]
    fn test_list_form_and_defaults() {
        let config = RouteAttributesConfig::from_source(
            "directories: [app/Http/Controllers, app/Admin]",
            ConfigFormat::Yaml,
        )
        .unwrap();
        assert!(config.enabled);
        assert_eq!(config.app, AppConfig::default());
        assert_eq!(config.directories.0[1].0, DirectoryKey::Index(1));

        let config = RouteAttributesConfig::from_source("{}", ConfigFormat::Json).unwrap();
        assert_eq!(config.directories.len(), 1);
    }

    #[test]
    fn test_json_and_toml() {
        let json = r#"{"enabled": false, "directories": {"0": "a", "Ns\\Controllers": "b"}}"#;
        let config = RouteAttributesConfig::from_source(json, ConfigFormat::Json).unwrap();
        assert!(!config.enabled);
        assert_eq!(config.directories.0[0].0, DirectoryKey::Index(0));
        assert_eq!(
            config.directories.0[1].0,
            DirectoryKey::Namespace(r"Ns\Controllers".to_string())
        );

        let toml = r#"
middleware = ["web"]

[directories]
"z/last" = { prefix = "z" }
"a/first" = { prefix = "a" }
"#;
        let config = RouteAttributesConfig::from_source(toml, ConfigFormat::Toml).unwrap();
        let keys: Vec<_> = config.directories.iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(keys, vec!["z/last", "a/first"]);
    }

    #[test]
    fn test_load_rebases_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("routes.yaml");
        std::fs::write(&file, YAML).unwrap();

        let config = load_config(&file).unwrap();
        assert_eq!(config.app.path, dir.path().join("app"));
        assert_eq!(
            config.app.route_cache,
            Some(dir.path().join("bootstrap/cache/routes.json"))
        );
        assert_eq!(
            config.directories.0[0].1,
            DirectoryConfig::Simple(dir.path().join("app/Http/Controllers"))
        );
    }

    #[test]
    fn test_validation_rejects_bad_patterns_and_missing_paths() {
        let bad_where = r#"
directories:
  modules/api:
    where: { id: '(' }
"#;
        let config = RouteAttributesConfig::from_source(bad_where, ConfigFormat::Yaml).unwrap();
        assert!(config.validate().is_err());

        let missing_path = "directories:\n  - prefix: api\n";
        let config = RouteAttributesConfig::from_source(missing_path, ConfigFormat::Yaml).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_config(PathBuf::from("/definitely/not/here.yaml")).unwrap_err();
        assert!(matches!(err, crate::error::ConfigError::Io { .. }));
    }
}
