use async_trait::async_trait;
use log::info;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::Config;
use crate::models::submission::NewSubmission;
use crate::models::view::EmployeeSnapshot;

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgStore;

/// Persistence operations the HTTP handlers need. Built once in `main` and
/// handed to every handler through `web::Data<dyn OnboardingStore>`.
#[async_trait]
pub trait OnboardingStore: Send + Sync {
    /// Writes every row of a submission in one transaction and returns the
    /// new employee id. Nothing is persisted on error.
    async fn insert_submission(&self, submission: &NewSubmission) -> Result<i32, sqlx::Error>;

    async fn fetch_employees(&self) -> Result<EmployeeSnapshot, sqlx::Error>;

    /// Returns the number of rows touched, which may be zero.
    async fn update_status(&self, employee_id: i32, status: &str) -> Result<u64, sqlx::Error>;

    /// Removes every row from every table in one transaction.
    async fn delete_all(&self) -> Result<(), sqlx::Error>;

    async fn ping(&self) -> Result<(), sqlx::Error>;
}

pub async fn create_pool(config: &Config) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await?;
    info!("PostgreSQL connected");
    Ok(pool)
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations applied");
    Ok(())
}
