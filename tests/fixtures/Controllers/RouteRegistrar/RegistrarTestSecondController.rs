use route_attributes::attributes::get;

pub struct RegistrarTestSecondController;

impl RegistrarTestSecondController {
    #[get("second-method")]
    pub fn second_method(&self) {}
}
