//! models/toast_model.rs
//! Notificaciones transitorias que se descartan solas.

use std::time::Duration;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Toast {
    pub kind: ToastKind,
    pub text: String,
}

/// Huella de una notificación activa. `expires_at_ms` usa el reloj
/// monotónico del `Clock` inyectado.
#[derive(Debug, Clone, Default)]
pub struct ToastSlot {
    current: Option<(Toast, f64)>,
}

impl ToastSlot {
    pub fn show(&mut self, kind: ToastKind, text: impl Into<String>, now_ms: f64, ttl: Duration) {
        let toast = Toast {
            kind,
            text: text.into(),
        };
        self.current = Some((toast, now_ms + ttl.as_secs_f64() * 1000.0));
    }

    /// La notificación visible en `now_ms`, si no expiró.
    pub fn visible(&self, now_ms: f64) -> Option<Toast> {
        match &self.current {
            Some((toast, expires_at)) if now_ms < *expires_at => Some(toast.clone()),
            _ => None,
        }
    }
}
