//! models/contact_model.rs
//! Formulario de contacto y registros de envío.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const STATUS_SENT: &str = "✅ Enviado correctamente";
pub const STATUS_FAILED: &str = "❌ Error al enviar mensaje";
pub const STATUS_OFFLINE: &str = "❌ Sin conexión: mensaje no enviado";

pub const HISTORY_STATUS_SENT: &str = "✅ Enviado correctamente";
pub const HISTORY_STATUS_FAILED: &str = "❌ Error en el envío";

/// Payload del formulario de contacto.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactPayload {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<String>,
    #[serde(default)]
    pub consent: bool,
}

impl ContactPayload {
    /// Presupuesto no vacío, si lo hay.
    pub fn budget(&self) -> Option<&str> {
        self.budget.as_deref().map(str::trim).filter(|b| !b.is_empty())
    }
}

/// Un intento de envío del formulario (éxito o fallo).
/// La lista se guarda completa en `contactLogs`, más reciente primero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactLogEntry {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<String>,
    pub date: String,
    pub time: String,
    pub status: String,
}

impl ContactLogEntry {
    pub fn new(payload: &ContactPayload, at: DateTime<Local>, status: &str) -> Self {
        Self {
            name: payload.name.clone(),
            email: payload.email.clone(),
            subject: payload.subject.clone(),
            message: payload.message.clone(),
            budget: payload.budget().map(str::to_string),
            date: display_date(&at),
            time: display_time(&at),
            status: status.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.contains('✅')
    }
}

/// Registro que escribe el helper de envío en `paymentsHistory`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub date: String,
    pub time: String,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub budget: String,
    pub status: String,
}

impl HistoryEntry {
    pub fn new(payload: &ContactPayload, at: DateTime<Local>, success: bool) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            date: display_date(&at),
            time: display_time(&at),
            name: payload.name.clone(),
            email: payload.email.clone(),
            subject: payload.subject.clone(),
            message: payload.message.clone(),
            budget: payload.budget().unwrap_or("—").to_string(),
            status: if success {
                HISTORY_STATUS_SENT
            } else {
                HISTORY_STATUS_FAILED
            }
            .to_string(),
        }
    }
}

/// Resultado exitoso del envío simulado.
#[derive(Debug, Clone, Serialize)]
pub struct SendOutcome {
    pub success: bool,
    pub message: String,
    pub attempts: u32,
}

pub fn display_date(at: &DateTime<Local>) -> String {
    at.format("%d/%m/%Y").to_string()
}

pub fn display_time(at: &DateTime<Local>) -> String {
    at.format("%H:%M:%S").to_string()
}

pub fn display_datetime(at: &DateTime<Local>) -> String {
    at.format("%d/%m/%Y, %H:%M:%S").to_string()
}
