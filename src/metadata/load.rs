use crate::error::RegistrarError;
use crate::resolver::ResolvedClass;
use syn::{Item, ItemImpl, ItemStruct, Type};
use tracing::debug;

/// A controller confirmed to exist in its source file.
#[derive(Debug, Clone)]
pub struct LoadedClass {
    pub resolved: ResolvedClass,
    /// The controller struct and its class-level attributes
    pub item: ItemStruct,
    /// `impl Controller { .. }` blocks in file order
    pub inherent_impls: Vec<ItemImpl>,
    /// `impl Trait for Controller { .. }` blocks; never scanned for routes
    pub trait_impls: Vec<ItemImpl>,
}

impl LoadedClass {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.resolved.fully_qualified_name
    }
}

/// Parses controller files with `syn`. Nothing is compiled or executed.
pub struct ClassLoader;

impl ClassLoader {
    /// Read and parse the file behind `resolved`.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(class))` - the file declares a concrete controller struct
    /// * `Ok(None)` - no struct with the expected name, an interface (trait)
    ///   of that name, or a generic (abstract) struct
    ///
    /// # Errors
    ///
    /// [`RegistrarError::ClassLoad`] when the file cannot be read or parsed.
    pub fn load(resolved: &ResolvedClass) -> Result<Option<LoadedClass>, RegistrarError> {
        let source = std::fs::read_to_string(&resolved.file_path).map_err(|e| {
            RegistrarError::ClassLoad {
                path: resolved.file_path.clone(),
                reason: e.to_string(),
            }
        })?;
        Self::parse(resolved.clone(), &source)
    }

    /// Parse already-read source text for `resolved`.
    pub fn parse(
        resolved: ResolvedClass,
        source: &str,
    ) -> Result<Option<LoadedClass>, RegistrarError> {
        let file = syn::parse_file(source).map_err(|e| {
            let start = e.span().start();
            RegistrarError::ClassLoad {
                path: resolved.file_path.clone(),
                reason: format!("line {}:{}: {}", start.line, start.column + 1, e),
            }
        })?;

        let class_name = resolved.class_name.as_str();
        let mut item = None;
        let mut inherent_impls = Vec::new();
        let mut trait_impls = Vec::new();

        for entry in file.items {
            match entry {
                Item::Struct(s) if s.ident == class_name => item = Some(s),
                Item::Trait(t) if t.ident == class_name => {
                    debug!(
                        class = %resolved.fully_qualified_name,
                        file = %resolved.file_path.display(),
                        "Skipping interface declaration"
                    );
                    return Ok(None);
                }
                Item::Impl(imp) if impl_targets(&imp.self_ty, class_name) => {
                    if imp.trait_.is_some() {
                        trait_impls.push(imp);
                    } else {
                        inherent_impls.push(imp);
                    }
                }
                _ => {}
            }
        }

        let Some(item) = item else {
            debug!(
                class = %resolved.fully_qualified_name,
                file = %resolved.file_path.display(),
                "No controller struct declared"
            );
            return Ok(None);
        };

        if !item.generics.params.is_empty() {
            debug!(
                class = %resolved.fully_qualified_name,
                file = %resolved.file_path.display(),
                "Skipping generic controller (not concrete)"
            );
            return Ok(None);
        }

        Ok(Some(LoadedClass {
            resolved,
            item,
            inherent_impls,
            trait_impls,
        }))
    }
}

/// Whether an impl's self type names the controller (`Foo`, `self::Foo`, `crate::x::Foo`).
fn impl_targets(self_ty: &Type, class_name: &str) -> bool {
    match self_ty {
        Type::Path(tp) if tp.qself.is_none() => tp
            .path
            .segments
            .last()
            .is_some_and(|seg| seg.ident == class_name),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn resolved(name: &str) -> ResolvedClass {
        ResolvedClass {
            fully_qualified_name: format!(r"App\{name}"),
            class_name: name.to_string(),
            file_path: PathBuf::from(format!("{name}.rs")),
        }
    }

    #[test]
    fn test_loads_struct_and_impls_in_order() {
        let src = r#"
            pub struct UserController;
            impl Default for UserController { fn default() -> Self { UserController } }
            impl UserController { pub fn a(&self) {} }
            impl UserController { pub fn b(&self) {} }
        "#;
        let class = ClassLoader::parse(resolved("UserController"), src)
            .unwrap()
            .unwrap();
        assert_eq!(class.inherent_impls.len(), 2);
        assert_eq!(class.trait_impls.len(), 1);
        assert_eq!(class.name(), r"App\UserController");
    }

    #[test]
    fn test_skips_interfaces_absent_and_generic() {
        let trait_src = "pub trait BaseController { fn index(&self); }";
        assert!(ClassLoader::parse(resolved("BaseController"), trait_src)
            .unwrap()
            .is_none());

        let other_src = "pub struct SomethingElse;";
        assert!(ClassLoader::parse(resolved("UserController"), other_src)
            .unwrap()
            .is_none());

        let generic_src = "pub struct Repo<T> { inner: T }";
        assert!(ClassLoader::parse(resolved("Repo"), generic_src)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_parse_error_is_class_load_error() {
        let err = ClassLoader::parse(resolved("Broken"), "pub struct Broken {").unwrap_err();
        assert!(matches!(err, RegistrarError::ClassLoad { .. }));
        assert!(err.to_string().contains("Broken.rs"));
    }
}
