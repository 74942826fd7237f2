use std::sync::Arc;

use actix_web::{App, HttpServer};
use dotenv::dotenv;

use crate::app::AppServices;
use crate::config::app_config::AppConfig;
use crate::logger::init_logger;
use crate::services::clock_service::{SystemClock, ThreadRandom};
use crate::services::pdf_service::{PdfService, TicketRenderer, UnavailableRenderer};
use crate::services::storage_service::SqliteKvStore;

mod app;
mod config;
mod error;
mod handlers;
mod logger;
mod models;
mod services;

#[cfg(test)]
mod tests;

async fn setup_store(config: &AppConfig) -> anyhow::Result<SqliteKvStore> {
    // Crear carpeta de datos
    std::fs::create_dir_all(&config.data_dir)?;

    let store = SqliteKvStore::connect(&config.database_path()).await?;
    store.run_migrations().await?;
    Ok(store)
}

async fn setup_renderer() -> Arc<dyn TicketRenderer> {
    match PdfService::new().await {
        Ok(pdf_service) => Arc::new(pdf_service),
        Err(e) => {
            // El resto de la app funciona; solo la exportación a PDF fallará
            log::warn!("PdfService no disponible: {:?}", e);
            Arc::new(UnavailableRenderer {
                reason: e.to_string(),
            })
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok(); // Cargar .env al inicio
    init_logger();

    let config = AppConfig::from_env();

    let store = setup_store(&config)
        .await
        .map_err(|e| std::io::Error::other(format!("No se pudo abrir el almacén: {:?}", e)))?;
    let renderer = setup_renderer().await;

    let services = AppServices::build(
        &config,
        Arc::new(store),
        Arc::new(SystemClock::default()),
        Arc::new(ThreadRandom),
        renderer,
    )
    .await
    .map_err(|e| std::io::Error::other(format!("No se pudieron cargar los servicios: {:?}", e)))?;

    log::info!("Levantando servidor en {}:{}", config.host, config.port);
    HttpServer::new(move || {
        let services = services.clone();
        App::new()
            .configure(|cfg| services.register(cfg))
            .configure(app::init_app)
    })
    .workers(1)
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
