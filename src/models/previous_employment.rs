#[derive(Debug, Clone, Default)]
pub struct NewPreviousEmployment {
    pub pf_no: Option<String>,
    pub uan_no: Option<String>,
}
