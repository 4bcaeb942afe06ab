use super::RouteRegistrar;
use crate::router::Router;
use std::ops::{Deref, DerefMut};

/// An active group scope on a [`RouteRegistrar`].
///
/// Dereferences to the registrar; the scope is popped when the guard drops,
/// including during unwinding.
pub struct GroupGuard<'a, R: Router> {
    registrar: &'a mut RouteRegistrar<R>,
}

impl<'a, R: Router> GroupGuard<'a, R> {
    pub(super) fn new(registrar: &'a mut RouteRegistrar<R>) -> Self {
        Self { registrar }
    }
}

impl<R: Router> Deref for GroupGuard<'_, R> {
    type Target = RouteRegistrar<R>;

    fn deref(&self) -> &Self::Target {
        self.registrar
    }
}

impl<R: Router> DerefMut for GroupGuard<'_, R> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.registrar
    }
}

impl<R: Router> Drop for GroupGuard<'_, R> {
    fn drop(&mut self) {
        self.registrar.pop_group();
    }
}
