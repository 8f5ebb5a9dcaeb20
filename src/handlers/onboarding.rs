use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use log::{info, warn};
use serde::Serialize;

use crate::config::Config;
use crate::db::OnboardingStore;
use crate::errors::AppError;
use crate::models::form::OnboardingForm;
use crate::utils::upload;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmissionResponse {
    message: String,
    employee_id: i32,
}

/// POST /api/submit-onboarding
///
/// Uploads are staged first, the rows are written in one transaction, and
/// only then are the staged files moved into the upload directory. Any
/// failure before the commit deletes the staged files.
pub async fn submit_onboarding(
    store: web::Data<dyn OnboardingStore>,
    config: web::Data<Config>,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let (fields, uploads) = upload::receive(
        payload,
        &config.staging_dir,
        &config.upload_dir,
        &config.upload_policy(),
    )
    .await?;

    let submission = match OnboardingForm::from_fields(fields)
        .and_then(|form| form.into_submission(&uploads))
    {
        Ok(submission) => submission,
        Err(violations) => {
            warn!("Rejected onboarding submission: {:?}", violations);
            uploads.discard().await;
            return Err(AppError::Validation(violations));
        }
    };

    let employee_id = match store.insert_submission(&submission).await {
        Ok(employee_id) => employee_id,
        Err(err) => {
            uploads.discard().await;
            return Err(AppError::DatabaseError(err));
        }
    };

    let moved = uploads.commit(&submission.file_paths()).await;
    info!(
        "Onboarding submitted for employee {} with {} file(s)",
        employee_id, moved
    );

    Ok(HttpResponse::Ok().json(SubmissionResponse {
        message: "Form submitted successfully".to_string(),
        employee_id,
    }))
}
