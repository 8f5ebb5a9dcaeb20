/// Row for `government_ids`; file columns hold upload-directory paths.
#[derive(Debug, Clone)]
pub struct NewGovernmentIds {
    pub aadhar_no: String,
    pub aadhar_file: Option<String>,
    pub pan_no: String,
    pub pan_file: Option<String>,
}
