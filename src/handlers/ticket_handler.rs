//! handlers/ticket_handler.rs
//! Panel de historial: modal, PDF y SMS simulado.

use actix_web::{web, HttpResponse};

use crate::{
    error::AppError, models::sms_model::SendSmsRequest, services::ticket_service::TicketService,
};

/// GET /api/tickets
pub async fn list_tickets_endpoint(tickets: web::Data<TicketService>) -> HttpResponse {
    HttpResponse::Ok().json(tickets.snapshot())
}

/// POST /api/tickets/{index}/open
pub async fn open_ticket_endpoint(
    tickets: web::Data<TicketService>,
    path: web::Path<usize>,
) -> Result<HttpResponse, AppError> {
    tickets.open(path.into_inner())?;
    Ok(HttpResponse::Ok().json(tickets.snapshot()))
}

/// POST /api/tickets/close
pub async fn close_ticket_endpoint(tickets: web::Data<TicketService>) -> HttpResponse {
    tickets.close();
    HttpResponse::Ok().json(tickets.snapshot())
}

/// GET /api/tickets/preview
pub async fn preview_ticket_endpoint(
    tickets: web::Data<TicketService>,
) -> Result<HttpResponse, AppError> {
    let html = tickets.preview()?;
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html))
}

/// GET /api/tickets/pdf
/// Descarga el ticket seleccionado como PDF.
pub async fn download_ticket_endpoint(
    tickets: web::Data<TicketService>,
) -> Result<HttpResponse, AppError> {
    let artifact = tickets.download_pdf().await?;

    Ok(HttpResponse::Ok()
        .append_header(("Content-Type", "application/pdf"))
        .append_header((
            "Content-Disposition",
            format!(
                "attachment; filename*=UTF-8''{}",
                urlencoding::encode(&artifact.file_name)
            ),
        ))
        .append_header(("Cache-Control", "public, must-revalidate, max-age=0"))
        .body(artifact.bytes))
}

/// POST /api/tickets/sms
pub async fn send_sms_endpoint(
    tickets: web::Data<TicketService>,
    body: web::Json<SendSmsRequest>,
) -> Result<HttpResponse, AppError> {
    let record = tickets.send_sms(&body.phone).await?;
    Ok(HttpResponse::Ok().json(record))
}

/// GET /api/tickets/sms
pub async fn list_sms_endpoint(
    tickets: web::Data<TicketService>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(tickets.sent_messages().await?))
}
