use async_trait::async_trait;
use log::debug;
use sqlx::PgPool;

use super::OnboardingStore;
use crate::models::education::Education;
use crate::models::employee::EmployeeRow;
use crate::models::employment_history::EmploymentHistory;
use crate::models::submission::NewSubmission;
use crate::models::view::EmployeeSnapshot;

/// Child tables first so foreign keys never block the wipe.
const TABLES_IN_DELETE_ORDER: [&str; 8] = [
    "signatures",
    "employment_history",
    "education",
    "bank_details",
    "addresses",
    "previous_employment",
    "government_ids",
    "employees",
];

const SELECT_EMPLOYEES: &str = r#"
    SELECT
        e.id, e.full_name, e.email, e.phone_no, e.alternate_number, e.guardian_name,
        e.guardian_contact, e.marital_status, e.gender, e.blood_group, e.date_of_birth,
        e.employment_status,
        g.aadhar_no, g.aadhar_file, g.pan_no, g.pan_file,
        p.pf_no, p.uan_no,
        a.current_address, a.current_city, a.current_state, a.current_pincode,
        a.permanent_address, a.permanent_city, a.permanent_state, a.permanent_pincode,
        b.bank_name, b.account_no, b.ifsc_code, b.branch_name,
        s.signature_file, s.consent, s.status
    FROM employees e
    LEFT JOIN government_ids g ON e.id = g.employee_id
    LEFT JOIN previous_employment p ON e.id = p.employee_id
    LEFT JOIN addresses a ON e.id = a.employee_id
    LEFT JOIN bank_details b ON e.id = b.employee_id
    LEFT JOIN signatures s ON e.id = s.employee_id
    ORDER BY e.id
"#;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OnboardingStore for PgStore {
    async fn insert_submission(&self, submission: &NewSubmission) -> Result<i32, sqlx::Error> {
        // Dropping `tx` without commit rolls everything back, so every `?`
        // below leaves the database untouched.
        let mut tx = self.pool.begin().await?;

        let employee = &submission.employee;
        let employee_id: i32 = sqlx::query_scalar(
            "INSERT INTO employees (full_name, email, phone_no, alternate_number, guardian_name, guardian_contact, marital_status, gender, blood_group, date_of_birth, employment_status) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) RETURNING id",
        )
        .bind(&employee.full_name)
        .bind(&employee.email)
        .bind(&employee.phone_no)
        .bind(employee.alternate_number.as_deref())
        .bind(&employee.guardian_name)
        .bind(&employee.guardian_contact)
        .bind(&employee.marital_status)
        .bind(&employee.gender)
        .bind(&employee.blood_group)
        .bind(employee.date_of_birth)
        .bind(employee.employment_status.as_str())
        .fetch_one(&mut *tx)
        .await?;

        let ids = &submission.government_ids;
        sqlx::query(
            "INSERT INTO government_ids (employee_id, aadhar_no, aadhar_file, pan_no, pan_file) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(employee_id)
        .bind(&ids.aadhar_no)
        .bind(ids.aadhar_file.as_deref())
        .bind(&ids.pan_no)
        .bind(ids.pan_file.as_deref())
        .execute(&mut *tx)
        .await?;

        let previous = &submission.previous_employment;
        sqlx::query("INSERT INTO previous_employment (employee_id, pf_no, uan_no) VALUES ($1, $2, $3)")
            .bind(employee_id)
            .bind(previous.pf_no.as_deref())
            .bind(previous.uan_no.as_deref())
            .execute(&mut *tx)
            .await?;

        let address = &submission.address;
        sqlx::query(
            "INSERT INTO addresses (employee_id, current_address, current_city, current_state, current_pincode, permanent_address, permanent_city, permanent_state, permanent_pincode) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(employee_id)
        .bind(&address.current_address)
        .bind(&address.current_city)
        .bind(&address.current_state)
        .bind(&address.current_pincode)
        .bind(&address.permanent_address)
        .bind(&address.permanent_city)
        .bind(&address.permanent_state)
        .bind(&address.permanent_pincode)
        .execute(&mut *tx)
        .await?;

        let bank = &submission.bank_details;
        sqlx::query(
            "INSERT INTO bank_details (employee_id, bank_name, account_no, ifsc_code, branch_name) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(employee_id)
        .bind(&bank.bank_name)
        .bind(&bank.account_no)
        .bind(&bank.ifsc_code)
        .bind(&bank.branch_name)
        .execute(&mut *tx)
        .await?;

        for education in &submission.education {
            sqlx::query(
                "INSERT INTO education (employee_id, level, stream, institution, year, score, doc_path) VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(employee_id)
            .bind(&education.level)
            .bind(&education.stream)
            .bind(&education.institution)
            .bind(&education.year)
            .bind(&education.score)
            .bind(education.doc_path.as_deref())
            .execute(&mut *tx)
            .await?;
        }

        for job in &submission.employment_history {
            sqlx::query(
                "INSERT INTO employment_history (employee_id, company_name, designation, last_project, start_date, end_date, doc_path) VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(employee_id)
            .bind(&job.company_name)
            .bind(&job.designation)
            .bind(&job.last_project)
            .bind(job.start_date)
            .bind(job.end_date)
            .bind(job.doc_path.as_deref())
            .execute(&mut *tx)
            .await?;
        }

        let signature = &submission.signature;
        sqlx::query("INSERT INTO signatures (employee_id, signature_file, consent) VALUES ($1, $2, $3)")
            .bind(employee_id)
            .bind(signature.signature_file.as_deref())
            .bind(signature.consent)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        debug!("Committed submission for employee {}", employee_id);
        Ok(employee_id)
    }

    async fn fetch_employees(&self) -> Result<EmployeeSnapshot, sqlx::Error> {
        let employees = sqlx::query_as::<_, EmployeeRow>(SELECT_EMPLOYEES)
            .fetch_all(&self.pool)
            .await?;

        let (education, employment) = futures_util::try_join!(
            sqlx::query_as::<_, Education>("SELECT * FROM education ORDER BY id").fetch_all(&self.pool),
            sqlx::query_as::<_, EmploymentHistory>("SELECT * FROM employment_history ORDER BY id")
                .fetch_all(&self.pool),
        )?;

        Ok(EmployeeSnapshot {
            employees,
            education,
            employment,
        })
    }

    async fn update_status(&self, employee_id: i32, status: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("UPDATE signatures SET status = $1 WHERE employee_id = $2")
            .bind(status)
            .bind(employee_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn delete_all(&self) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        for table in TABLES_IN_DELETE_ORDER {
            let result = sqlx::query(&format!("DELETE FROM {}", table))
                .execute(&mut *tx)
                .await?;
            debug!("Deleted {} row(s) from {}", result.rows_affected(), table);
        }
        tx.commit().await
    }

    async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
