use route_attributes::attributes::get;
use std::marker::PhantomData;

pub struct RegistrarTestBaseController<T> {
    marker: PhantomData<T>,
}

impl<T> RegistrarTestBaseController<T> {
    #[get("base-method")]
    pub fn base_method(&self) {}
}
