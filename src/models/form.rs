use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use validator::Validate;

use super::address::NewAddress;
use super::bank_details::NewBankDetails;
use super::education::NewEducation;
use super::employee::{EmploymentStatus, NewEmployee};
use super::employment_history::NewEmploymentHistory;
use super::file::FileField;
use super::government_ids::NewGovernmentIds;
use super::previous_employment::NewPreviousEmployment;
use super::signature::{parse_consent, NewSignature};
use super::submission::NewSubmission;
use crate::utils::upload::StagedUploads;
use crate::utils::validation::{
    string_or_number, validate_employment_status, validate_iso_date, validate_payload,
    validate_year, Violation, DATE_FORMAT,
};

/// Scalar fields of the onboarding multipart form. Blank values are dropped
/// before deserialization, so required fields arrive as `""` and optional
/// ones as `None`.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct OnboardingForm {
    #[validate(length(min = 1, message = "is required"))]
    pub full_name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "is required"))]
    pub phone_no: String,
    pub alternate_number: Option<String>,
    #[validate(length(min = 1, message = "is required"))]
    pub guardian_name: String,
    #[validate(length(min = 1, message = "is required"))]
    pub guardian_contact: String,
    #[validate(length(min = 1, message = "is required"))]
    pub marital_status: String,
    #[validate(length(min = 1, message = "is required"))]
    pub gender: String,
    #[validate(length(min = 1, message = "is required"))]
    pub blood_group: String,
    #[validate(
        length(min = 1, message = "is required"),
        custom = "validate_iso_date"
    )]
    pub date_of_birth: String,
    #[validate(
        length(min = 1, message = "is required"),
        custom = "validate_employment_status"
    )]
    pub employment_status: String,

    #[validate(length(min = 1, message = "is required"))]
    pub aadhar_no: String,
    #[validate(length(min = 1, message = "is required"))]
    pub pan_no: String,
    pub pf_no: Option<String>,
    pub uan_no: Option<String>,

    #[validate(length(min = 1, message = "is required"))]
    pub current_address: String,
    #[validate(length(min = 1, message = "is required"))]
    pub current_city: String,
    #[validate(length(min = 1, message = "is required"))]
    pub current_state: String,
    #[validate(length(min = 1, message = "is required"))]
    pub current_pincode: String,
    #[validate(length(min = 1, message = "is required"))]
    pub permanent_address: String,
    #[validate(length(min = 1, message = "is required"))]
    pub permanent_city: String,
    #[validate(length(min = 1, message = "is required"))]
    pub permanent_state: String,
    #[validate(length(min = 1, message = "is required"))]
    pub permanent_pincode: String,

    #[validate(length(min = 1, message = "is required"))]
    pub bank_name_as_per_form: String,
    #[validate(length(min = 1, message = "is required"))]
    pub account_no: String,
    #[validate(length(min = 1, message = "is required"))]
    pub ifsc_code: String,
    #[validate(length(min = 1, message = "is required"))]
    pub branch_name: String,

    #[validate(length(min = 1, message = "is required"))]
    pub education_details: String,
    pub employment_details: Option<String>,
    pub consent_checkbox: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct EducationEntry {
    #[validate(length(min = 1, message = "is required"))]
    pub level: String,
    #[validate(length(min = 1, message = "is required"))]
    pub stream: String,
    #[validate(length(min = 1, message = "is required"))]
    pub institution: String,
    #[serde(deserialize_with = "string_or_number")]
    #[validate(length(min = 1, message = "is required"), custom = "validate_year")]
    pub year: String,
    #[serde(deserialize_with = "string_or_number")]
    #[validate(length(min = 1, message = "is required"))]
    pub score: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct EmploymentEntry {
    #[validate(length(min = 1, message = "is required"))]
    pub company_name: String,
    #[validate(length(min = 1, message = "is required"))]
    pub designation: String,
    #[validate(length(min = 1, message = "is required"))]
    pub last_project: String,
    #[validate(
        length(min = 1, message = "is required"),
        custom = "validate_iso_date"
    )]
    pub company_start_date: String,
    #[validate(custom = "validate_iso_date")]
    pub company_end_date: Option<String>,
}

impl OnboardingForm {
    pub fn from_fields(fields: HashMap<String, String>) -> Result<Self, Vec<Violation>> {
        let map: serde_json::Map<String, Value> = fields
            .into_iter()
            .filter(|(_, value)| !value.trim().is_empty())
            .map(|(name, value)| (name, Value::String(value)))
            .collect();

        serde_json::from_value(Value::Object(map))
            .map_err(|err| vec![Violation::new("form", err.to_string())])
    }

    /// Checks the whole form against its rules and the uploads that came
    /// with it, then maps it onto table rows. Every violation is reported,
    /// not just the first.
    pub fn into_submission(self, uploads: &StagedUploads) -> Result<NewSubmission, Vec<Violation>> {
        let mut violations = validate_payload(None, &self);

        for field in [FileField::Aadhaar, FileField::Pan, FileField::Signature] {
            if uploads.first(field).is_none() {
                violations.push(Violation::new(field.name(), "file is required"));
            }
        }

        let education: Vec<EducationEntry> =
            parse_entries("educationDetails", &self.education_details, &mut violations);

        let status = self.employment_status.parse::<EmploymentStatus>().ok();
        let employment: Vec<EmploymentEntry> = match (status, self.employment_details.as_deref()) {
            (Some(EmploymentStatus::Experienced), Some(raw)) => {
                parse_entries("employmentDetails", raw, &mut violations)
            }
            _ => Vec::new(),
        };

        let date_of_birth = parse_date("dateOfBirth", &self.date_of_birth, &mut violations);

        let education_docs = uploads.files(FileField::EducationDocs);
        let education: Vec<NewEducation> = education
            .into_iter()
            .enumerate()
            .map(|(i, entry)| NewEducation {
                level: entry.level,
                stream: entry.stream,
                institution: entry.institution,
                year: entry.year,
                score: entry.score,
                doc_path: education_docs.get(i).map(|doc| doc.stored_path()),
            })
            .collect();

        let employment_docs = uploads.files(FileField::EmploymentDocs);
        let mut employment_history = Vec::with_capacity(employment.len());
        for (i, entry) in employment.into_iter().enumerate() {
            let prefix = format!("employmentDetails[{}]", i);
            let start_date = parse_date(
                &format!("{}.companyStartDate", prefix),
                &entry.company_start_date,
                &mut violations,
            );
            let end_date = entry.company_end_date.as_deref().and_then(|raw| {
                parse_date(&format!("{}.companyEndDate", prefix), raw, &mut violations)
            });
            if let Some(start_date) = start_date {
                employment_history.push(NewEmploymentHistory {
                    company_name: entry.company_name,
                    designation: entry.designation,
                    last_project: entry.last_project,
                    start_date,
                    end_date,
                    doc_path: employment_docs.get(i).map(|doc| doc.stored_path()),
                });
            }
        }

        let (date_of_birth, employment_status) = match (date_of_birth, status) {
            (Some(date), Some(status)) if violations.is_empty() => (date, status),
            _ => {
                violations.sort_by(|a, b| a.field.cmp(&b.field));
                violations.dedup();
                return Err(violations);
            }
        };

        Ok(NewSubmission {
            employee: NewEmployee {
                full_name: self.full_name,
                email: self.email,
                phone_no: self.phone_no,
                alternate_number: self.alternate_number,
                guardian_name: self.guardian_name,
                guardian_contact: self.guardian_contact,
                marital_status: self.marital_status,
                gender: self.gender,
                blood_group: self.blood_group,
                date_of_birth,
                employment_status,
            },
            government_ids: NewGovernmentIds {
                aadhar_no: self.aadhar_no,
                aadhar_file: uploads.first(FileField::Aadhaar).map(|f| f.stored_path()),
                pan_no: self.pan_no,
                pan_file: uploads.first(FileField::Pan).map(|f| f.stored_path()),
            },
            previous_employment: NewPreviousEmployment {
                pf_no: self.pf_no,
                uan_no: self.uan_no,
            },
            address: NewAddress {
                current_address: self.current_address,
                current_city: self.current_city,
                current_state: self.current_state,
                current_pincode: self.current_pincode,
                permanent_address: self.permanent_address,
                permanent_city: self.permanent_city,
                permanent_state: self.permanent_state,
                permanent_pincode: self.permanent_pincode,
            },
            bank_details: NewBankDetails {
                bank_name: self.bank_name_as_per_form,
                account_no: self.account_no,
                ifsc_code: self.ifsc_code,
                branch_name: self.branch_name,
            },
            education,
            employment_history,
            signature: NewSignature {
                signature_file: uploads.first(FileField::Signature).map(|f| f.stored_path()),
                consent: parse_consent(self.consent_checkbox.as_deref()),
            },
        })
    }
}

fn parse_entries<T>(field: &str, raw: &str, violations: &mut Vec<Violation>) -> Vec<T>
where
    T: DeserializeOwned + Validate,
{
    if raw.is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<Vec<T>>(raw) {
        Ok(entries) => {
            for (i, entry) in entries.iter().enumerate() {
                let prefix = format!("{}[{}]", field, i);
                violations.extend(validate_payload(Some(&prefix), entry));
            }
            entries
        }
        Err(err) => {
            violations.push(Violation::new(
                field,
                format!("must be a JSON array of records ({})", err),
            ));
            Vec::new()
        }
    }
}

fn parse_date(field: &str, raw: &str, violations: &mut Vec<Violation>) -> Option<NaiveDate> {
    if raw.is_empty() {
        return None;
    }
    match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(_) => {
            violations.push(Violation::new(field, "must be a date in YYYY-MM-DD format"));
            None
        }
    }
}
