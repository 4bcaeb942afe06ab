//! # Class Resolver
//!
//! Maps a controller file to the fully-qualified identifier of the controller
//! it is expected to declare. The mapping is a pure path transform; whether the
//! file really declares that controller is decided later by the
//! [`ClassLoader`](crate::metadata::ClassLoader).
//!
//! ```text
//! base:  /srv/app/Http/Controllers
//! file:  /srv/app/Http/Controllers/Admin/UserController.rs
//! root:  App\Http\Controllers
//!   =>   App\Http\Controllers\Admin\UserController
//! ```
//!
//! Directory components become namespace segments unchanged; the file stem is
//! UpperCamelCased so `user_controller.rs` resolves to `UserController`.

use crate::uri::upper_camel_case;
use std::path::{Component, Path, PathBuf};

/// Separator between namespace segments of a controller identifier.
pub const NAMESPACE_SEPARATOR: char = '\\';

/// Extension of controller source files.
pub const SOURCE_EXTENSION: &str = "rs";

/// A controller identifier derived from a file path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedClass {
    /// e.g. `App\Http\Controllers\Admin\UserController`
    pub fully_qualified_name: String,
    /// Last segment of the identifier, the struct the file must declare
    pub class_name: String,
    pub file_path: PathBuf,
}

/// Derives [`ResolvedClass`] values for files under one base path.
#[derive(Debug, Clone)]
pub struct ClassResolver {
    base_path: PathBuf,
    root_namespace: String,
}

impl ClassResolver {
    pub fn new(base_path: impl Into<PathBuf>, root_namespace: &str) -> Self {
        Self {
            base_path: base_path.into(),
            root_namespace: normalize_namespace(root_namespace),
        }
    }

    #[must_use]
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    #[must_use]
    pub fn root_namespace(&self) -> &str {
        &self.root_namespace
    }

    /// Resolve `file_path` to a controller identifier.
    ///
    /// Returns `None` when the file is not under the base path or is not a
    /// `.rs` source file.
    #[must_use]
    pub fn resolve(&self, file_path: &Path) -> Option<ResolvedClass> {
        if file_path.extension().and_then(|e| e.to_str()) != Some(SOURCE_EXTENSION) {
            return None;
        }
        let relative = file_path.strip_prefix(&self.base_path).ok()?;

        let mut segments: Vec<String> = Vec::new();
        if let Some(parent) = relative.parent() {
            for component in parent.components() {
                match component {
                    Component::Normal(part) => segments.push(part.to_str()?.to_string()),
                    Component::CurDir => {}
                    // `..`, roots and prefixes mean the file escaped the base path
                    _ => return None,
                }
            }
        }

        let stem = relative.file_stem()?.to_str()?;
        let class_name = upper_camel_case(stem);
        if class_name.is_empty() {
            return None;
        }
        segments.push(class_name.clone());

        let relative_name = segments.join(&NAMESPACE_SEPARATOR.to_string());
        let fully_qualified_name = if self.root_namespace.is_empty() {
            relative_name
        } else {
            format!("{}{}{}", self.root_namespace, NAMESPACE_SEPARATOR, relative_name)
        };

        Some(ResolvedClass {
            fully_qualified_name,
            class_name,
            file_path: file_path.to_path_buf(),
        })
    }
}

/// Accept `::` as a separator and drop leading/trailing separators.
fn normalize_namespace(namespace: &str) -> String {
    namespace
        .replace("::", &NAMESPACE_SEPARATOR.to_string())
        .trim_matches(NAMESPACE_SEPARATOR)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolves_nested_namespace() {
        let resolver = ClassResolver::new("/srv/base", r"App\Http\Controllers");
        let resolved = resolver
            .resolve(Path::new("/srv/base/Sub/Dir/Foo.rs"))
            .unwrap();
        assert_eq!(resolved.fully_qualified_name, r"App\Http\Controllers\Sub\Dir\Foo");
        assert_eq!(resolved.class_name, "Foo");
    }

    #[test]
    fn test_trailing_separator_and_rust_paths() {
        let resolver = ClassResolver::new("/srv/base", r"ThirdParty\Http\Controllers\");
        let resolved = resolver.resolve(Path::new("/srv/base/Foo.rs")).unwrap();
        assert_eq!(resolved.fully_qualified_name, r"ThirdParty\Http\Controllers\Foo");

        let resolver = ClassResolver::new("/srv/base", "crate::controllers");
        let resolved = resolver
            .resolve(Path::new("/srv/base/admin/user_controller.rs"))
            .unwrap();
        assert_eq!(resolved.fully_qualified_name, r"crate\controllers\admin\UserController");
    }

    #[test]
    fn test_skips_foreign_files() {
        let resolver = ClassResolver::new("/srv/base", "App");
        assert!(resolver.resolve(Path::new("/elsewhere/Foo.rs")).is_none());
        assert!(resolver.resolve(Path::new("/srv/base/notes.md")).is_none());
        assert!(resolver.resolve(Path::new("/srv/base/Foo")).is_none());
    }

    #[test]
    fn test_empty_root_namespace() {
        let resolver = ClassResolver::new("/srv/base", "");
        let resolved = resolver.resolve(Path::new("/srv/base/Api/Foo.rs")).unwrap();
        assert_eq!(resolved.fully_qualified_name, r"Api\Foo");
    }
}
