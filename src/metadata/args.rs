//! Argument lists of route attributes.
//!
//! Attributes are read with `syn` the same way a proc macro would read them:
//! `#[get("users", name = "users.index", middleware = ["auth"])]` becomes two
//! lists, positional expressions and `key = value` pairs.

use syn::punctuated::Punctuated;
use syn::{Attribute, Expr, ExprLit, Lit, Meta, Token};

/// Parsed arguments of one attribute.
#[derive(Debug, Default)]
pub(crate) struct AttributeArgs {
    pub positional: Vec<Expr>,
    pub named: Vec<(String, Expr)>,
}

impl AttributeArgs {
    /// Split an attribute's arguments into positional and named ones.
    ///
    /// `#[attr]` has no arguments, `#[attr = "x"]` has one positional argument.
    pub fn parse(attr: &Attribute) -> Result<Self, String> {
        match &attr.meta {
            Meta::Path(_) => Ok(Self::default()),
            Meta::NameValue(nv) => Ok(Self {
                positional: vec![nv.value.clone()],
                named: Vec::new(),
            }),
            Meta::List(_) => {
                let exprs = attr
                    .parse_args_with(Punctuated::<Expr, Token![,]>::parse_terminated)
                    .map_err(|e| format!("malformed arguments: {e}"))?;
                let mut args = Self::default();
                for expr in exprs {
                    match expr {
                        Expr::Assign(assign) => {
                            let key = assign_key(&assign.left)
                                .ok_or_else(|| "named argument must be a plain identifier".to_string())?;
                            args.named.push((key, *assign.right));
                        }
                        other => args.positional.push(other),
                    }
                }
                Ok(args)
            }
        }
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.named.is_empty()
    }

    pub fn named(&self, key: &str) -> Option<&Expr> {
        self.named.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Fail on named keys outside `allowed`.
    pub fn reject_unknown(&self, allowed: &[&str]) -> Result<(), String> {
        match self.named.iter().find(|(k, _)| !allowed.contains(&k.as_str())) {
            Some((key, _)) => Err(format!(
                "unknown argument `{key}` (expected one of: {})",
                allowed.join(", ")
            )),
            None => Ok(()),
        }
    }

    /// The argument at `index`, or the named argument `key`.
    pub fn get(&self, index: usize, key: &str) -> Option<&Expr> {
        self.named(key).or_else(|| self.positional.get(index))
    }
}

fn assign_key(left: &Expr) -> Option<String> {
    match left {
        Expr::Path(p) if p.qself.is_none() => p.path.get_ident().map(|i| i.to_string()),
        _ => None,
    }
}

/// A string literal.
pub(crate) fn expect_string(expr: &Expr, what: &str) -> Result<String, String> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Str(s), ..
        }) => Ok(s.value()),
        Expr::Group(g) => expect_string(&g.expr, what),
        _ => Err(format!("{what} must be a string literal")),
    }
}

/// A string literal or an array of string literals.
pub(crate) fn expect_strings(expr: &Expr, what: &str) -> Result<Vec<String>, String> {
    match expr {
        Expr::Array(array) => array
            .elems
            .iter()
            .map(|e| expect_string(e, what))
            .collect(),
        other => expect_string(other, what).map(|s| vec![s]),
    }
}

pub(crate) fn expect_bool(expr: &Expr, what: &str) -> Result<bool, String> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Bool(b), ..
        }) => Ok(b.value),
        _ => Err(format!("{what} must be `true` or `false`")),
    }
}

/// Every positional argument flattened as strings (`"a", ["b", "c"]`).
pub(crate) fn positional_strings(args: &AttributeArgs, what: &str) -> Result<Vec<String>, String> {
    let mut out = Vec::new();
    for expr in &args.positional {
        out.extend(expect_strings(expr, what)?);
    }
    Ok(out)
}
