//! error.rs
//! Errores de dominio y su traducción a respuestas HTTP.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// Error de validación de un campo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    /// Validación del lado del cliente: nunca se reintenta.
    #[error("Validación fallida")]
    Validation { errors: Vec<FieldError> },

    /// Se agotaron los intentos del envío simulado.
    #[error("❌ Error simulado: no se pudo enviar el mensaje ({attempts} intentos)")]
    SimulatedFailure { attempts: u32 },

    /// Hay un envío en curso (botón deshabilitado).
    #[error("Ya hay un envío en curso")]
    Busy,

    #[error("No encontrado: {0}")]
    NotFound(String),

    #[error("No hay ningún ticket seleccionado")]
    NoTicketSelected,

    #[error("Error generando el ticket: {0}")]
    Export(String),

    #[error("Error de almacenamiento: {0}")]
    Storage(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(field: &str, message: &str) -> Self {
        AppError::Validation {
            errors: vec![FieldError::new(field, message)],
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::SimulatedFailure { .. } => StatusCode::BAD_GATEWAY,
            AppError::Busy | AppError::NoTicketSelected => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Export(_) | AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::Validation { errors } => json!({
                "success": false,
                "error": self.to_string(),
                "fields": errors,
            }),
            AppError::Storage(e) => {
                log::error!("Error de almacenamiento: {:?}", e);
                json!({
                    "success": false,
                    "error": "Internal server error",
                })
            }
            _ => json!({
                "success": false,
                "error": self.to_string(),
            }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}
