//! models/sms_model.rs

use serde::{Deserialize, Serialize};

use crate::models::contact_model::ContactLogEntry;

#[derive(Debug, Clone, Deserialize)]
pub struct SendSmsRequest {
    pub phone: String,
}

/// Envío simulado de un ticket por SMS (lista `sentSMS`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentSmsRecord {
    pub id: String,
    pub phone: String,
    pub log: ContactLogEntry,
    #[serde(rename = "sentAt")]
    pub sent_at: String,
}
