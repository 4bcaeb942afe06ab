//! # Registrar Module
//!
//! Drives discovery: resolves controller files, loads and extracts their
//! route metadata, merges it with the active group scopes and hands every
//! [`EffectiveRoute`](crate::route::EffectiveRoute) to a
//! [`Router`](crate::router::Router).
//!
//! A file is extracted completely before any of its routes is registered, so
//! a file with invalid metadata registers nothing. During a directory walk a
//! failing file is recorded and the walk moves on.

mod core;
mod group;
mod walk;

pub use self::core::{FileFailure, RouteRegistrar};
pub use group::GroupGuard;
pub(crate) use walk::source_files;
