use route_attributes::attributes::get;

pub struct RegistrarTestControllerInSubDirectory;

impl RegistrarTestControllerInSubDirectory {
    #[get("in-sub-directory")]
    pub fn my_method(&self) {}
}
