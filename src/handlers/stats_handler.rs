//! handlers/stats_handler.rs

use actix_web::{web, HttpResponse};

use crate::{error::AppError, services::stats_service::StatsService};

/// GET /api/stats
pub async fn stats_endpoint(stats: web::Data<StatsService>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(stats.snapshot().await?))
}

/// POST /api/stats/connection/toggle
pub async fn toggle_connection_endpoint(
    stats: web::Data<StatsService>,
) -> Result<HttpResponse, AppError> {
    stats.toggle_connection();
    Ok(HttpResponse::Ok().json(stats.snapshot().await?))
}
