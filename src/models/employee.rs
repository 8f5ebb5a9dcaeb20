use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmploymentStatus {
    Fresher,
    Experienced,
}

impl EmploymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmploymentStatus::Fresher => "fresher",
            EmploymentStatus::Experienced => "experienced",
        }
    }
}

impl fmt::Display for EmploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmploymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fresher" => Ok(EmploymentStatus::Fresher),
            "experienced" => Ok(EmploymentStatus::Experienced),
            other => Err(format!("unknown employment status '{}'", other)),
        }
    }
}

/// Row for `employees`; the id is generated by the insert.
#[derive(Debug, Clone)]
pub struct NewEmployee {
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
    pub employment_status: EmploymentStatus,
}

/// One employee joined with every one-to-one dependent. Dependent columns
/// are optional because the join is a LEFT JOIN.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct EmployeeRow {
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
    pub bank_name: Option<String>,
    pub account_no: Option<String>,
    pub ifsc_code: Option<String>,
    pub branch_name: Option<String>,
    pub signature_file: Option<String>,
    pub consent: Option<bool>,
    pub status: Option<String>,
}
