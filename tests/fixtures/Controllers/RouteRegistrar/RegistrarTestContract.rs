use route_attributes::attributes::get;

/// Implemented by controllers; never registered itself.
pub trait RegistrarTestContract {
    #[get("contract-method")]
    fn contract_method(&self);
}
