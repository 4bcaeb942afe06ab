use route_attributes::attributes::get;

pub struct ThirdPartyController;

impl ThirdPartyController {
    #[get("third-party")]
    pub fn third_party_get_method(&self) {}
}
