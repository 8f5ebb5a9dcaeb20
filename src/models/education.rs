#[derive(Debug, Clone)]
pub struct NewEducation {
    pub level: String,
    pub stream: String,
    pub institution: String,
    pub year: String,
    pub score: String,
    pub doc_path: Option<String>,
}

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct Education {
    pub id: i32,
    pub employee_id: i32,
    pub level: String,
    pub stream: String,
    pub institution: String,
    pub year: String,
    pub score: String,
    pub doc_path: Option<String>,
}
