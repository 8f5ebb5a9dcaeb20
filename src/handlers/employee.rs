use actix_web::{web, HttpResponse};
use log::{info, warn};
use serde::Deserialize;
use serde_json::json;

use crate::config::Config;
use crate::db::OnboardingStore;
use crate::errors::AppError;
use crate::models::signature::KNOWN_REVIEW_STATUSES;
use crate::utils::upload;

#[derive(Deserialize)]
pub struct StatusUpdate {
    status: String,
}

/// GET /api/employees
pub async fn get_employees(
    store: web::Data<dyn OnboardingStore>,
) -> Result<HttpResponse, AppError> {
    let employees = store.fetch_employees().await?.into_views();
    Ok(HttpResponse::Ok().json(employees))
}

/// PUT /api/employees/{id}/status
///
/// Any status string is stored. The reply is the same whether or not the
/// employee exists.
pub async fn update_status(
    store: web::Data<dyn OnboardingStore>,
    employee_id: web::Path<String>,
    update: web::Json<StatusUpdate>,
) -> Result<HttpResponse, AppError> {
    let employee_id: i32 = employee_id
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid employee ID".to_string()))?;

    if !KNOWN_REVIEW_STATUSES.contains(&update.status.as_str()) {
        warn!(
            "Storing unrecognised review status '{}' for employee {}",
            update.status, employee_id
        );
    }

    let touched = store.update_status(employee_id, &update.status).await?;
    info!(
        "Status of employee {} set to '{}' ({} row(s))",
        employee_id, update.status, touched
    );

    Ok(HttpResponse::Ok().json(json!({
        "message": "Status updated successfully",
    })))
}

/// DELETE /api/employees
///
/// Rows go first, in one transaction. Files are unlinked only after that
/// commit; an unlink failure leaves an orphan file and is logged.
pub async fn delete_employees(
    store: web::Data<dyn OnboardingStore>,
    config: web::Data<Config>,
) -> Result<HttpResponse, AppError> {
    store.delete_all().await?;

    match upload::purge_directory(&config.upload_dir).await {
        Ok(removed) => info!("Cleared all records and {} uploaded file(s)", removed),
        Err(err) => warn!(
            "Records cleared but upload directory {} could not be read: {}",
            config.upload_dir.display(),
            err
        ),
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "All records cleared successfully",
    })))
}
