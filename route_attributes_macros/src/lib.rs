//! Route attributes for controller sources.
//!
//! Every attribute here expands to the annotated item unchanged. Routes are
//! discovered by reading the source, so the macros only exist to make the
//! annotations legal Rust and to reject malformed arguments early.

use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::ToTokens;
use syn::parse::Parser;
use syn::punctuated::Punctuated;
use syn::{Expr, Item, ItemFn, Lit, Token};

type Args = Punctuated<Expr, Token![,]>;

const VERB_KEYS: &[&str] = &["uri", "name", "middleware", "domain"];
const ROUTE_KEYS: &[&str] = &["methods", "uri", "name", "middleware", "domain"];
const GROUP_KEYS: &[&str] = &["prefix", "domain", "name_prefix", "middleware"];

enum Target {
    Method,
    Class,
    Either,
}

struct Rules {
    target: Target,
    max_positional: usize,
    min_positional: usize,
    keys: &'static [&'static str],
}

fn expand(rules: Rules, attr: TokenStream, item: TokenStream) -> TokenStream {
    match check(&rules, attr, &item) {
        Ok(()) => item,
        Err(err) => with_error(err, item),
    }
}

fn check(rules: &Rules, attr: TokenStream, item: &TokenStream) -> syn::Result<()> {
    let args = Args::parse_terminated.parse(attr)?;

    let mut positional = 0;
    for arg in &args {
        match arg {
            Expr::Assign(assign) => {
                let key = assign.left.to_token_stream().to_string();
                if !rules.keys.contains(&key.as_str()) {
                    return Err(syn::Error::new_spanned(
                        &assign.left,
                        format!("unknown argument `{key}`"),
                    ));
                }
            }
            other => {
                positional += 1;
                if positional > rules.max_positional {
                    return Err(syn::Error::new_spanned(other, "too many arguments"));
                }
            }
        }
    }
    let named = args.len() - positional;
    if positional + named < rules.min_positional {
        return Err(syn::Error::new(
            Span::call_site(),
            format!("expected at least {} argument(s)", rules.min_positional),
        ));
    }

    match rules.target {
        Target::Method => syn::parse::<ItemFn>(item.clone())
            .map(|_| ())
            .or_else(|_| syn::parse::<syn::ImplItemFn>(item.clone()).map(|_| ()))
            .map_err(|_| syn::Error::new(Span::call_site(), "route attributes apply to methods")),
        Target::Either => Ok(()),
        Target::Class => match syn::parse::<Item>(item.clone())? {
            Item::Struct(_) => Ok(()),
            other => Err(syn::Error::new_spanned(
                other,
                "controller attributes apply to structs",
            )),
        },
    }
}

macro_rules! verb_attribute {
    ($($(#[$doc:meta])* $name:ident),* $(,)?) => {$(
        $(#[$doc])*
        #[proc_macro_attribute]
        pub fn $name(attr: TokenStream, item: TokenStream) -> TokenStream {
            let rules = Rules {
                target: Target::Method,
                max_positional: 1,
                min_positional: 0,
                keys: VERB_KEYS,
            };
            expand(rules, attr, item)
        }
    )*};
}

verb_attribute!(
    /// `#[get("uri", name = "..", middleware = "..", domain = "..")]`
    get,
    /// `#[post("uri")]`
    post,
    /// `#[put("uri")]`
    put,
    /// `#[patch("uri")]`
    patch,
    /// `#[delete("uri")]`
    delete,
    /// `#[options("uri")]`
    options,
    /// `#[head("uri")]`
    head,
    /// Every verb: `#[any("uri")]`
    any,
);

/// `#[route(["GET", "POST"], "uri")]` or `#[route(methods = "GET", uri = "..")]`
#[proc_macro_attribute]
pub fn route(attr: TokenStream, item: TokenStream) -> TokenStream {
    let rules = Rules {
        target: Target::Method,
        max_positional: 2,
        min_positional: 1,
        keys: ROUTE_KEYS,
    };
    expand(rules, attr, item)
}

macro_rules! single_value_attribute {
    ($target:ident: $($(#[$doc:meta])* $name:ident),* $(,)?) => {$(
        $(#[$doc])*
        #[proc_macro_attribute]
        pub fn $name(attr: TokenStream, item: TokenStream) -> TokenStream {
            let rules = Rules {
                target: Target::$target,
                max_positional: 1,
                min_positional: 1,
                keys: &[],
            };
            expand(rules, attr, item)
        }
    )*};
}

single_value_attribute!(Class:
    /// URI prefix for every route of the controller.
    prefix,
    /// Name prefix for every named route of the controller.
    name_prefix,
    /// Default verb for unannotated public methods.
    fallback_verb,
);

single_value_attribute!(Either:
    /// Domain for every route of the controller, or for one route.
    domain,
);

single_value_attribute!(Method:
    /// Route name: `#[name("users.show")]`
    name,
);

macro_rules! where_preset_attribute {
    ($($(#[$doc:meta])* $name:ident),* $(,)?) => {$(
        $(#[$doc])*
        #[proc_macro_attribute]
        pub fn $name(attr: TokenStream, item: TokenStream) -> TokenStream {
            let rules = Rules {
                target: Target::Either,
                max_positional: usize::MAX,
                min_positional: 1,
                keys: &[],
            };
            expand(rules, attr, item)
        }
    )*};
}

where_preset_attribute!(
    /// `#[where_number("id", ..)]` on a controller or a method
    where_number,
    /// `#[where_alpha("slug", ..)]`
    where_alpha,
    /// `#[where_alpha_numeric("code", ..)]`
    where_alpha_numeric,
    /// `#[where_uuid("id", ..)]`
    where_uuid,
    /// `#[where_ulid("id", ..)]`
    where_ulid,
);

/// `#[where_pattern("param", "regex")]` on a controller or a method
#[proc_macro_attribute]
pub fn where_pattern(attr: TokenStream, item: TokenStream) -> TokenStream {
    let rules = Rules {
        target: Target::Either,
        max_positional: 2,
        min_positional: 2,
        keys: &[],
    };
    expand(rules, attr, item)
}

/// `#[where_in("param", ["a", "b"])]` on a controller or a method
#[proc_macro_attribute]
pub fn where_in(attr: TokenStream, item: TokenStream) -> TokenStream {
    let rules = Rules {
        target: Target::Either,
        max_positional: 2,
        min_positional: 2,
        keys: &[],
    };
    expand(rules, attr, item)
}

/// Middleware for a controller or a single route. Repeatable.
#[proc_macro_attribute]
pub fn middleware(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = match Args::parse_terminated.parse(attr) {
        Ok(args) => args,
        Err(err) => return with_error(err, item),
    };
    if args.is_empty() {
        return with_error(
            syn::Error::new(Span::call_site(), "expected middleware name(s)"),
            item,
        );
    }
    item
}

/// `#[scope_bindings]` or `#[scope_bindings(false)]`
#[proc_macro_attribute]
pub fn scope_bindings(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = match Args::parse_terminated.parse(attr) {
        Ok(args) => args,
        Err(err) => return with_error(err, item),
    };
    let valid = match args.len() {
        0 => true,
        1 => matches!(&args[0], Expr::Lit(lit) if matches!(lit.lit, Lit::Bool(_))),
        _ => false,
    };
    if valid {
        item
    } else {
        with_error(
            syn::Error::new(Span::call_site(), "expected `scope_bindings` or `scope_bindings(bool)`"),
            item,
        )
    }
}

/// Extra route group for a controller. Repeatable.
///
/// `#[group(prefix = "v1", domain = "..", name_prefix = "..", middleware = [..])]`
#[proc_macro_attribute]
pub fn group(attr: TokenStream, item: TokenStream) -> TokenStream {
    let rules = Rules {
        target: Target::Class,
        max_positional: 0,
        min_positional: 0,
        keys: GROUP_KEYS,
    };
    expand(rules, attr, item)
}

fn with_error(err: syn::Error, item: TokenStream) -> TokenStream {
    let mut out = err.to_compile_error();
    out.extend(proc_macro2::TokenStream::from(item));
    out.into()
}
