use route_attributes::attributes::get;

pub struct RegistrarTestFirstController;

impl RegistrarTestFirstController {
    #[get("first-method")]
    pub fn first_method(&self) {}
}
