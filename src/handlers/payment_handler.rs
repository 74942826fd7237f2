//! handlers/payment_handler.rs

use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::{
    error::AppError, models::payment_model::PaymentForm,
    services::payment_service::PaymentService,
};

/// GET /payment
pub async fn payment_page(payments: web::Data<PaymentService>) -> HttpResponse {
    HttpResponse::Ok().json(payments.snapshot())
}

/// PUT /api/payment/form
pub async fn update_form_endpoint(
    payments: web::Data<PaymentService>,
    body: web::Json<PaymentForm>,
) -> HttpResponse {
    let form = payments.update_form(body.into_inner());
    HttpResponse::Ok().json(form)
}

/// POST /api/payment/submit
/// Si viene un formulario en el body, reemplaza primero al que está en edición.
pub async fn submit_payment_endpoint(
    payments: web::Data<PaymentService>,
    body: Option<web::Json<PaymentForm>>,
) -> Result<HttpResponse, AppError> {
    if let Some(form) = body {
        payments.update_form(form.into_inner());
    }

    let record = payments.submit().await?;
    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "payment": record,
        "form": payments.form(),
    })))
}
