use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Mutex;

use super::OnboardingStore;
use crate::models::education::Education;
use crate::models::employee::EmployeeRow;
use crate::models::employment_history::EmploymentHistory;
use crate::models::signature::DEFAULT_REVIEW_STATUS;
use crate::models::submission::NewSubmission;
use crate::models::view::EmployeeSnapshot;

#[derive(Debug, Clone, Default)]
struct Tables {
    next_id: i32,
    employees: Vec<EmployeeRow>,
    education: Vec<Education>,
    employment: Vec<EmploymentHistory>,
    row_counts: BTreeMap<&'static str, usize>,
}

impl Tables {
    fn insert(&mut self, table: &'static str, fail_on: Option<&str>) -> Result<(), sqlx::Error> {
        if fail_on == Some(table) {
            return Err(sqlx::Error::Protocol(format!("insert into {} failed", table)));
        }
        *self.row_counts.entry(table).or_default() += 1;
        Ok(())
    }
}

/// Store used by handler tests. Writes go to a copy of the tables that
/// replaces the originals only when every insert succeeded.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    fail_on: Mutex<Option<&'static str>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later insert into `table` fail.
    pub fn fail_inserts_into(&self, table: &'static str) {
        *self.fail_on.lock().unwrap() = Some(table);
    }

    pub fn row_count(&self, table: &str) -> usize {
        self.tables
            .lock()
            .unwrap()
            .row_counts
            .get(table)
            .copied()
            .unwrap_or(0)
    }

    pub fn total_rows(&self) -> usize {
        self.tables.lock().unwrap().row_counts.values().sum()
    }
}

#[async_trait]
impl OnboardingStore for MemoryStore {
    async fn insert_submission(&self, submission: &NewSubmission) -> Result<i32, sqlx::Error> {
        let fail_on = *self.fail_on.lock().unwrap();
        let mut tables = self.tables.lock().unwrap();
        let mut draft = tables.clone();

        draft.next_id += 1;
        let id = draft.next_id;
        draft.insert("employees", fail_on)?;
        draft.insert("government_ids", fail_on)?;
        draft.insert("previous_employment", fail_on)?;
        draft.insert("addresses", fail_on)?;
        draft.insert("bank_details", fail_on)?;

        for education in &submission.education {
            draft.insert("education", fail_on)?;
            draft.education.push(Education {
                id: draft.education.len() as i32 + 1,
                employee_id: id,
                level: education.level.clone(),
                stream: education.stream.clone(),
                institution: education.institution.clone(),
                year: education.year.clone(),
                score: education.score.clone(),
                doc_path: education.doc_path.clone(),
            });
        }

        for job in &submission.employment_history {
            draft.insert("employment_history", fail_on)?;
            draft.employment.push(EmploymentHistory {
                id: draft.employment.len() as i32 + 1,
                employee_id: id,
                company_name: job.company_name.clone(),
                designation: job.designation.clone(),
                last_project: job.last_project.clone(),
                start_date: job.start_date,
                end_date: job.end_date,
                doc_path: job.doc_path.clone(),
            });
        }

        draft.insert("signatures", fail_on)?;

        let employee = &submission.employee;
        let ids = &submission.government_ids;
        let address = &submission.address;
        let bank = &submission.bank_details;
        draft.employees.push(EmployeeRow {
            id,
            full_name: employee.full_name.clone(),
            email: employee.email.clone(),
            phone_no: employee.phone_no.clone(),
            alternate_number: employee.alternate_number.clone(),
            guardian_name: employee.guardian_name.clone(),
            guardian_contact: employee.guardian_contact.clone(),
            marital_status: employee.marital_status.clone(),
            gender: employee.gender.clone(),
            blood_group: employee.blood_group.clone(),
            date_of_birth: employee.date_of_birth,
            employment_status: employee.employment_status.as_str().to_string(),
            aadhar_no: Some(ids.aadhar_no.clone()),
            aadhar_file: ids.aadhar_file.clone(),
            pan_no: Some(ids.pan_no.clone()),
            pan_file: ids.pan_file.clone(),
            pf_no: submission.previous_employment.pf_no.clone(),
            uan_no: submission.previous_employment.uan_no.clone(),
            current_address: Some(address.current_address.clone()),
            current_city: Some(address.current_city.clone()),
            current_state: Some(address.current_state.clone()),
            current_pincode: Some(address.current_pincode.clone()),
            permanent_address: Some(address.permanent_address.clone()),
            permanent_city: Some(address.permanent_city.clone()),
            permanent_state: Some(address.permanent_state.clone()),
            permanent_pincode: Some(address.permanent_pincode.clone()),
            bank_name: Some(bank.bank_name.clone()),
            account_no: Some(bank.account_no.clone()),
            ifsc_code: Some(bank.ifsc_code.clone()),
            branch_name: Some(bank.branch_name.clone()),
            signature_file: submission.signature.signature_file.clone(),
            consent: Some(submission.signature.consent),
            status: Some(DEFAULT_REVIEW_STATUS.to_string()),
        });

        *tables = draft;
        Ok(id)
    }

    async fn fetch_employees(&self) -> Result<EmployeeSnapshot, sqlx::Error> {
        let tables = self.tables.lock().unwrap();
        Ok(EmployeeSnapshot {
            employees: tables.employees.clone(),
            education: tables.education.clone(),
            employment: tables.employment.clone(),
        })
    }

    async fn update_status(&self, employee_id: i32, status: &str) -> Result<u64, sqlx::Error> {
        let mut tables = self.tables.lock().unwrap();
        let mut touched = 0;
        for row in tables.employees.iter_mut().filter(|row| row.id == employee_id) {
            row.status = Some(status.to_string());
            touched += 1;
        }
        Ok(touched)
    }

    async fn delete_all(&self) -> Result<(), sqlx::Error> {
        let mut tables = self.tables.lock().unwrap();
        let next_id = tables.next_id;
        *tables = Tables {
            next_id,
            ..Tables::default()
        };
        Ok(())
    }

    async fn ping(&self) -> Result<(), sqlx::Error> {
        Ok(())
    }
}
