use route_attributes::attributes::get;

pub struct AnApiController;

impl AnApiController {
    #[get("somewhere")]
    pub fn third_party_get_method(&self) {}
}
