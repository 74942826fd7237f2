//! handlers/contact_handler.rs
//! Página de contacto (ruta raíz) y su envío.

use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::{
    error::AppError,
    models::contact_model::ContactPayload,
    services::{
        contact_service::ContactService, stats_service::StatsService,
        submission_service::SubmissionService, ticket_service::TicketService,
    },
};

/// GET /
/// Estado completo de la página: formulario, stats y panel de historial.
pub async fn contact_page(
    contact: web::Data<ContactService>,
    stats: web::Data<StatsService>,
    tickets: web::Data<TicketService>,
) -> Result<HttpResponse, AppError> {
    let stats = stats.snapshot().await?;
    Ok(HttpResponse::Ok().json(json!({
        "contact": contact.snapshot(),
        "stats": stats,
        "tickets": tickets.snapshot(),
    })))
}

/// POST /api/contact/submit
pub async fn submit_contact_endpoint(
    contact: web::Data<ContactService>,
    body: web::Json<ContactPayload>,
) -> HttpResponse {
    log::info!("Entrando a submit_contact_endpoint");

    match contact.submit(body.into_inner()).await {
        Ok(report) if report.success => HttpResponse::Ok().json(report),
        // El fallo ya quedó registrado en la bitácora
        Ok(report) => HttpResponse::BadGateway().json(report),
        Err(e) => actix_web::ResponseError::error_response(&e),
    }
}

/// GET /api/history
/// Historial que escribe el envío simulado.
pub async fn submission_history_endpoint(
    submission: web::Data<SubmissionService>,
) -> Result<HttpResponse, AppError> {
    let history = submission.history().await?;
    Ok(HttpResponse::Ok().json(history))
}
