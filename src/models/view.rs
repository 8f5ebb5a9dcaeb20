use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

use super::education::Education;
use super::employee::EmployeeRow;
use super::employment_history::EmploymentHistory;
use super::signature::DEFAULT_REVIEW_STATUS;

/// URL prefix the upload directory is served under.
pub const UPLOADS_URL_PREFIX: &str = "/uploads";

/// Raw result of the read queries, before grouping.
#[derive(Debug, Default)]
pub struct EmployeeSnapshot {
    pub employees: Vec<EmployeeRow>,
    pub education: Vec<Education>,
    pub employment: Vec<EmploymentHistory>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct EducationView {
    pub level: String,
    pub stream: String,
    pub institution: String,
    pub year: String,
    pub score: String,
    pub doc: Option<String>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct EmploymentView {
    pub company_name: String,
    pub designation: String,
    pub last_project: String,
    pub company_start_date: NaiveDate,
    pub company_end_date: Option<NaiveDate>,
    pub doc: Option<String>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeView {
    pub id: i32,
    pub full_name: String,
    pub email: String,
    pub phone_no: String,
    pub alternate_number: Option<String>,
    pub guardian_name: String,
    pub guardian_contact: String,
    pub marital_status: String,
    pub gender: String,
    pub blood_group: String,
    pub date_of_birth: NaiveDate,
    pub employment_status: String,
    pub aadhar_no: Option<String>,
    pub aadhar_file: Option<String>,
    pub pan_no: Option<String>,
    pub pan_file: Option<String>,
    pub pf_no: Option<String>,
    pub uan_no: Option<String>,
    pub current_address: Option<String>,
    pub current_city: Option<String>,
    pub current_state: Option<String>,
    pub current_pincode: Option<String>,
    pub permanent_address: Option<String>,
    pub permanent_city: Option<String>,
    pub permanent_state: Option<String>,
    pub permanent_pincode: Option<String>,
    pub bank_name_as_per_form: Option<String>,
    pub account_no: Option<String>,
    pub ifsc_code: Option<String>,
    pub branch_name: Option<String>,
    pub signature: Option<String>,
    pub consent: Option<bool>,
    pub status: String,
    pub education_details: Vec<EducationView>,
    pub employment_details: Vec<EmploymentView>,
}

/// Turns a stored path into the URL it is served at. Blank paths count as
/// absent.
pub fn file_url(stored: Option<&str>) -> Option<String> {
    let stored = stored.filter(|s| !s.trim().is_empty())?;
    let name = Path::new(stored).file_name()?.to_str()?;
    Some(format!("{}/{}", UPLOADS_URL_PREFIX, name))
}

impl EmployeeSnapshot {
    /// Groups the one-to-many rows under their employees, keeping the order
    /// they were fetched in.
    pub fn into_views(self) -> Vec<EmployeeView> {
        let mut education: HashMap<i32, Vec<EducationView>> = HashMap::new();
        for row in self.education {
            education.entry(row.employee_id).or_default().push(EducationView {
                doc: file_url(row.doc_path.as_deref()),
                level: row.level,
                stream: row.stream,
                institution: row.institution,
                year: row.year,
                score: row.score,
            });
        }

        let mut employment: HashMap<i32, Vec<EmploymentView>> = HashMap::new();
        for row in self.employment {
            employment.entry(row.employee_id).or_default().push(EmploymentView {
                doc: file_url(row.doc_path.as_deref()),
                company_name: row.company_name,
                designation: row.designation,
                last_project: row.last_project,
                company_start_date: row.start_date,
                company_end_date: row.end_date,
            });
        }

        self.employees
            .into_iter()
            .map(|row| EmployeeView {
                education_details: education.remove(&row.id).unwrap_or_default(),
                employment_details: employment.remove(&row.id).unwrap_or_default(),
                aadhar_file: file_url(row.aadhar_file.as_deref()),
                pan_file: file_url(row.pan_file.as_deref()),
                signature: file_url(row.signature_file.as_deref()),
                status: row
                    .status
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| DEFAULT_REVIEW_STATUS.to_string()),
                id: row.id,
                full_name: row.full_name,
                email: row.email,
                phone_no: row.phone_no,
                alternate_number: row.alternate_number,
                guardian_name: row.guardian_name,
                guardian_contact: row.guardian_contact,
                marital_status: row.marital_status,
                gender: row.gender,
                blood_group: row.blood_group,
                date_of_birth: row.date_of_birth,
                employment_status: row.employment_status,
                aadhar_no: row.aadhar_no,
                pan_no: row.pan_no,
                pf_no: row.pf_no,
                uan_no: row.uan_no,
                current_address: row.current_address,
                current_city: row.current_city,
                current_state: row.current_state,
                current_pincode: row.current_pincode,
                permanent_address: row.permanent_address,
                permanent_city: row.permanent_city,
                permanent_state: row.permanent_state,
                permanent_pincode: row.permanent_pincode,
                bank_name_as_per_form: row.bank_name,
                account_no: row.account_no,
                ifsc_code: row.ifsc_code,
                branch_name: row.branch_name,
                consent: row.consent,
            })
            .collect()
    }
}
