use actix_files::Files;
use actix_web::web;

use crate::config::Config;
use crate::errors::AppError;
use crate::models::view::UPLOADS_URL_PREFIX;

pub mod employee;
pub mod file;
pub mod onboarding;
pub mod probes;

/// Registers every route. Handlers expect `web::Data<Config>` and
/// `web::Data<dyn OnboardingStore>` to be present as app data.
pub fn configure(cfg: &mut web::ServiceConfig, config: &Config) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(format!("Invalid JSON body: {}", err)).into()
    }));

    cfg.service(web::resource("/livez").route(web::get().to(probes::livez)))
        .service(web::resource("/healthz").route(web::get().to(probes::healthz)))
        .service(
            web::resource("/api/submit-onboarding")
                .route(web::post().to(onboarding::submit_onboarding)),
        )
        .service(
            web::resource("/api/employees")
                .route(web::get().to(employee::get_employees))
                .route(web::delete().to(employee::delete_employees)),
        )
        .service(
            web::resource("/api/employees/{id}/status")
                .route(web::put().to(employee::update_status)),
        )
        .service(
            web::resource("/api/download/{filename}")
                .route(web::get().to(file::download_file)),
        );

    if config.serve_uploads {
        cfg.service(Files::new(UPLOADS_URL_PREFIX, &config.upload_dir));
    }
}
