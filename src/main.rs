mod config;
mod db;
mod errors;
mod handlers;
mod models;
mod utils;

#[cfg(test)]
mod test_support;

use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use log::info;
use std::io;
use std::sync::Arc;

use crate::config::Config;
use crate::db::{OnboardingStore, PgStore};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;

    tokio::fs::create_dir_all(&config.upload_dir).await?;
    tokio::fs::create_dir_all(&config.staging_dir).await?;

    let pool = db::create_pool(&config)
        .await
        .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
    db::run_migrations(&pool)
        .await
        .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;

    let store: Arc<dyn OnboardingStore> = Arc::new(PgStore::new(pool));
    let store = web::Data::from(store);
    let bind_address = config.bind_address.clone();

    info!("Uploads stored in {}", config.upload_dir.display());
    info!("Starting server at {}", bind_address);

    HttpServer::new(move || {
        let config = config.clone();
        App::new()
            .wrap(Logger::default())
            .app_data(store.clone())
            .app_data(web::Data::new(config.clone()))
            .configure(|cfg| handlers::configure(cfg, &config))
    })
    .bind(bind_address)?
    .run()
    .await
}
