#[derive(Debug, Clone)]
pub struct NewAddress {
    pub current_address: String,
    pub current_city: String,
    pub current_state: String,
    pub current_pincode: String,
    pub permanent_address: String,
    pub permanent_city: String,
    pub permanent_state: String,
    pub permanent_pincode: String,
}
