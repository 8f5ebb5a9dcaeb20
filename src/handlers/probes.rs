use actix_web::{web, HttpResponse};
use log::debug;
use serde_json::json;

use crate::db::OnboardingStore;
use crate::errors::AppError;

/// GET /livez
pub async fn livez() -> HttpResponse {
    debug!("service is live");
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

/// GET /healthz
pub async fn healthz(store: web::Data<dyn OnboardingStore>) -> Result<HttpResponse, AppError> {
    store.ping().await?;
    debug!("service is healthy");
    Ok(HttpResponse::Ok().json(json!({ "status": "ok" })))
}
