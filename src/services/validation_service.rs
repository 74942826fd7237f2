//! services/validation_service.rs
//! Reglas de los formularios.

use std::sync::LazyLock;

use regex::Regex;

use crate::{
    error::{AppError, FieldError},
    models::contact_model::ContactPayload,
};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("regex de email"));

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?\d{8,15}$").expect("regex de teléfono"));

pub const PHONE_HINT: &str = "Número inválido. Ejemplo: +51987654321";

/// Valida el formulario de contacto y junta todos los errores por campo.
pub fn validate_contact(payload: &ContactPayload) -> Result<(), AppError> {
    let mut errors = Vec::new();

    if payload.name.trim().chars().count() < 2 {
        errors.push(FieldError::new("name", "Mínimo 2 caracteres"));
    }
    if !EMAIL_RE.is_match(payload.email.trim()) {
        errors.push(FieldError::new("email", "Correo inválido"));
    }
    if payload.subject.trim().chars().count() < 3 {
        errors.push(FieldError::new("subject", "Mínimo 3 caracteres"));
    }
    let message_len = payload.message.chars().count();
    if message_len < 10 {
        errors.push(FieldError::new("message", "Mínimo 10 caracteres"));
    } else if message_len > 2000 {
        errors.push(FieldError::new("message", "Máximo 2000 caracteres"));
    }
    if !payload.consent {
        errors.push(FieldError::new(
            "consent",
            "Debes aceptar la política de privacidad",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation { errors })
    }
}

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}
