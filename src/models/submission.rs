use super::address::NewAddress;
use super::bank_details::NewBankDetails;
use super::education::NewEducation;
use super::employee::NewEmployee;
use super::employment_history::NewEmploymentHistory;
use super::government_ids::NewGovernmentIds;
use super::previous_employment::NewPreviousEmployment;
use super::signature::NewSignature;

/// Everything one onboarding submission writes, table by table.
/// `employment_history` is empty unless the employee is experienced.
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub employee: NewEmployee,
    pub government_ids: NewGovernmentIds,
    pub previous_employment: NewPreviousEmployment,
    pub address: NewAddress,
    pub bank_details: NewBankDetails,
    pub education: Vec<NewEducation>,
    pub employment_history: Vec<NewEmploymentHistory>,
    pub signature: NewSignature,
}

impl NewSubmission {
    /// Every upload path this submission references.
    pub fn file_paths(&self) -> Vec<String> {
        [
            self.government_ids.aadhar_file.as_ref(),
            self.government_ids.pan_file.as_ref(),
            self.signature.signature_file.as_ref(),
        ]
        .into_iter()
        .flatten()
        .chain(self.education.iter().filter_map(|e| e.doc_path.as_ref()))
        .chain(self.employment_history.iter().filter_map(|e| e.doc_path.as_ref()))
        .cloned()
        .collect()
    }
}
