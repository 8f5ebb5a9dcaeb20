use chrono::NaiveDate;

#[derive(Debug, Clone)]
pub struct NewEmploymentHistory {
    pub company_name: String,
    pub designation: String,
    pub last_project: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub doc_path: Option<String>,
}

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct EmploymentHistory {
    pub id: i32,
    pub employee_id: i32,
    pub company_name: String,
    pub designation: String,
    pub last_project: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub doc_path: Option<String>,
}
