use route_attributes::attributes::get;

pub struct AnotherApiController;

impl AnotherApiController {
    #[get("somewhen")]
    pub fn third_party_get_method(&self) {}
}
