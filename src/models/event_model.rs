//! models/event_model.rs
//! Eventos que circulan por el bus de la aplicación.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum AppEvent {
    /// Un intento del envío simulado terminó.
    MetricsUpdated { ok: bool, latency: Option<f64> },
    /// El panel de estadísticas cambió el flag de conexión.
    ConnectionToggled { connected: bool },
    /// La página de contacto terminó un envío.
    MessageSent { success: bool },
}

/// Tipo de evento, para filtrar suscripciones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    MetricsUpdated,
    ConnectionToggled,
    MessageSent,
}

impl AppEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            AppEvent::MetricsUpdated { .. } => EventKind::MetricsUpdated,
            AppEvent::ConnectionToggled { .. } => EventKind::ConnectionToggled,
            AppEvent::MessageSent { .. } => EventKind::MessageSent,
        }
    }
}
