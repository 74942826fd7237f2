//! services/contact_service.rs
//! Página de contacto: formulario, envío y bitácora persistida.

use std::{sync::Arc, time::Duration};

use parking_lot::Mutex;
use serde::Serialize;

use crate::{
    error::AppError,
    models::{
        contact_model::{
            ContactLogEntry, ContactPayload, STATUS_FAILED, STATUS_OFFLINE, STATUS_SENT,
        },
        event_model::{AppEvent, EventKind},
        toast_model::{Toast, ToastKind, ToastSlot},
    },
    services::{
        clock_service::Clock,
        event_bus::{EventBus, Subscription},
        storage_service::{keys, Collection, KvStore},
        submission_service::SubmissionService,
        validation_service::validate_contact,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmitState {
    Idle,
    Submitting,
}

#[derive(Debug)]
struct ContactState {
    form: ContactPayload,
    logs: Vec<ContactLogEntry>,
    submit_state: SubmitState,
    connected: bool,
    toast: ToastSlot,
}

/// Vuelve la página a `Idle` si el futuro de `submit` se descarta a medias
/// (p. ej. el cliente cortó la conexión). `finish` lo desarma.
struct SubmittingGuard {
    state: Arc<Mutex<ContactState>>,
    armed: bool,
}

impl SubmittingGuard {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for SubmittingGuard {
    fn drop(&mut self) {
        if self.armed {
            log::warn!("(submit) Envío abandonado, la página vuelve a Idle");
            self.state.lock().submit_state = SubmitState::Idle;
        }
    }
}

/// Lo que la página muestra en un momento dado.
#[derive(Debug, Clone, Serialize)]
pub struct ContactSnapshot {
    pub form: ContactPayload,
    pub submitting: bool,
    pub submit_label: &'static str,
    pub connected: bool,
    pub logs: Vec<ContactLogEntry>,
    pub toast: Option<Toast>,
}

/// Resultado terminal de un envío (éxito o fallo ya manejado por la página).
#[derive(Debug, Clone, Serialize)]
pub struct SubmitReport {
    pub success: bool,
    pub attempts: u32,
    pub entry: ContactLogEntry,
    pub toast: Toast,
}

#[derive(Clone)]
pub struct ContactService {
    state: Arc<Mutex<ContactState>>,
    logs: Collection<Vec<ContactLogEntry>>,
    submission: SubmissionService,
    bus: EventBus,
    clock: Arc<dyn Clock>,
    toast_ttl: Duration,
    _connection: Arc<Subscription>,
}

impl ContactService {
    /// Carga `contactLogs` y empieza a seguir el flag de conexión del bus.
    pub async fn load(
        store: Arc<dyn KvStore>,
        submission: SubmissionService,
        bus: EventBus,
        clock: Arc<dyn Clock>,
        toast_ttl: Duration,
    ) -> anyhow::Result<Self> {
        let logs: Collection<Vec<ContactLogEntry>> = Collection::new(store, keys::CONTACT_LOGS);
        let saved = logs.load().await?;
        log::info!("(ContactService::load) {} registros de contacto", saved.len());

        let state = Arc::new(Mutex::new(ContactState {
            form: ContactPayload::default(),
            logs: saved,
            submit_state: SubmitState::Idle,
            connected: true,
            toast: ToastSlot::default(),
        }));

        let listener_state = state.clone();
        let subscription = bus.subscribe(EventKind::ConnectionToggled, move |event| {
            if let AppEvent::ConnectionToggled { connected } = event {
                listener_state.lock().connected = connected;
            }
        });

        Ok(Self {
            state,
            logs,
            submission,
            bus,
            clock,
            toast_ttl,
            _connection: Arc::new(subscription),
        })
    }

    pub fn snapshot(&self) -> ContactSnapshot {
        let now_ms = self.clock.monotonic_ms();
        let st = self.state.lock();
        let submitting = st.submit_state == SubmitState::Submitting;
        ContactSnapshot {
            form: st.form.clone(),
            submitting,
            submit_label: if submitting {
                "Enviando..."
            } else {
                "Enviar mensaje"
            },
            connected: st.connected,
            logs: st.logs.clone(),
            toast: st.toast.visible(now_ms),
        }
    }

    pub fn logs(&self) -> Vec<ContactLogEntry> {
        self.state.lock().logs.clone()
    }

    #[cfg(test)]
    pub fn is_connected(&self) -> bool {
        self.state.lock().connected
    }

    /// Valida y envía. Los errores de validación y `Busy` no tocan el estado;
    /// cualquier otro desenlace termina con una entrada en la bitácora.
    pub async fn submit(&self, payload: ContactPayload) -> Result<SubmitReport, AppError> {
        validate_contact(&payload)?;

        let connected = {
            let mut st = self.state.lock();
            if st.submit_state == SubmitState::Submitting {
                return Err(AppError::Busy);
            }
            st.form = payload.clone();
            if st.connected {
                st.submit_state = SubmitState::Submitting;
            }
            st.connected
        };

        if !connected {
            log::warn!("(submit) Sin conexión, no se invoca el envío simulado");
            return self
                .finish(
                    None,
                    &payload,
                    false,
                    0,
                    STATUS_OFFLINE,
                    "❌ Sin conexión. Activa la conexión e intenta nuevamente.",
                )
                .await;
        }

        let guard = SubmittingGuard {
            state: self.state.clone(),
            armed: true,
        };

        match self.submission.send_contact(&payload).await {
            Ok(outcome) => {
                self.finish(
                    Some(guard),
                    &payload,
                    true,
                    outcome.attempts,
                    STATUS_SENT,
                    "✅ Mensaje enviado correctamente",
                )
                .await
            }
            Err(e) => {
                let attempts = match &e {
                    AppError::SimulatedFailure { attempts } => *attempts,
                    other => {
                        log::error!("(submit) Falla inesperada en el envío: {:?}", other);
                        0
                    }
                };
                self.finish(
                    Some(guard),
                    &payload,
                    false,
                    attempts,
                    STATUS_FAILED,
                    "❌ Error al enviar mensaje. Intenta nuevamente.",
                )
                .await
            }
        }
    }

    async fn finish(
        &self,
        guard: Option<SubmittingGuard>,
        payload: &ContactPayload,
        success: bool,
        attempts: u32,
        status: &str,
        toast_text: &str,
    ) -> Result<SubmitReport, AppError> {
        let entry = ContactLogEntry::new(payload, self.clock.now(), status);
        let kind = if success {
            ToastKind::Success
        } else {
            ToastKind::Error
        };
        let now_ms = self.clock.monotonic_ms();

        let logs = {
            let mut st = self.state.lock();
            st.submit_state = SubmitState::Idle;
            st.logs.insert(0, entry.clone());
            st.toast.show(kind, toast_text, now_ms, self.toast_ttl);
            if success {
                st.form = ContactPayload::default();
            }
            st.logs.clone()
        };
        if let Some(guard) = guard {
            guard.disarm();
        }

        self.bus.publish(AppEvent::MessageSent { success });
        self.logs.save(&logs).await?;

        Ok(SubmitReport {
            success,
            attempts,
            entry,
            toast: Toast {
                kind,
                text: toast_text.to_string(),
            },
        })
    }
}
