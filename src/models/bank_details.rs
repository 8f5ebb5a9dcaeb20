#[derive(Debug, Clone)]
pub struct NewBankDetails {
    pub bank_name: String,
    pub account_no: String,
    pub ifsc_code: String,
    pub branch_name: String,
}
