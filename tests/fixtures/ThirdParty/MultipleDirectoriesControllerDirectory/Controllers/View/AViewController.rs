use route_attributes::attributes::get;

pub struct AViewController;

impl AViewController {
    #[get("somehow")]
    pub fn third_party_get_method(&self) {}
}
