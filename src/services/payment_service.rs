//! services/payment_service.rs
//! Página de pagos: formulario con campos obligatorios y lista persistida.

use std::{sync::Arc, time::Duration};

use parking_lot::Mutex;
use serde::Serialize;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{
        contact_model::display_datetime,
        payment_model::{PaymentForm, PaymentMethod, PaymentRecord},
        toast_model::{Toast, ToastKind, ToastSlot},
    },
    services::{
        clock_service::Clock,
        storage_service::{keys, Collection, KvStore},
    },
};

pub const REQUIRED_FIELDS_MSG: &str = "Completa todos los campos obligatorios.";
pub const PAYMENT_OK_MSG: &str = "✅ Pago registrado correctamente.";

#[derive(Debug, Default)]
struct PaymentState {
    form: PaymentForm,
    payments: Vec<PaymentRecord>,
    toast: ToastSlot,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentSnapshot {
    pub form: PaymentForm,
    pub methods: [PaymentMethod; 4],
    pub payments: Vec<PaymentRecord>,
    pub toast: Option<Toast>,
}

#[derive(Clone)]
pub struct PaymentService {
    state: Arc<Mutex<PaymentState>>,
    payments: Collection<Vec<PaymentRecord>>,
    clock: Arc<dyn Clock>,
    toast_ttl: Duration,
}

impl PaymentService {
    pub async fn load(
        store: Arc<dyn KvStore>,
        clock: Arc<dyn Clock>,
        toast_ttl: Duration,
    ) -> anyhow::Result<Self> {
        let payments: Collection<Vec<PaymentRecord>> = Collection::new(store, keys::PAYMENTS);
        let saved = payments.load().await?;
        log::info!("(PaymentService::load) {} pagos registrados", saved.len());

        Ok(Self {
            state: Arc::new(Mutex::new(PaymentState {
                payments: saved,
                ..Default::default()
            })),
            payments,
            clock,
            toast_ttl,
        })
    }

    pub fn snapshot(&self) -> PaymentSnapshot {
        let now_ms = self.clock.monotonic_ms();
        let st = self.state.lock();
        PaymentSnapshot {
            form: st.form.clone(),
            methods: PaymentMethod::ALL,
            payments: st.payments.clone(),
            toast: st.toast.visible(now_ms),
        }
    }

    /// Reemplaza el formulario en edición.
    pub fn update_form(&self, form: PaymentForm) -> PaymentForm {
        let mut st = self.state.lock();
        st.form = form;
        st.form.clone()
    }

    pub fn form(&self) -> PaymentForm {
        self.state.lock().form.clone()
    }

    /// Todos los pagos en orden de registro.
    pub fn list(&self) -> Vec<PaymentRecord> {
        self.state.lock().payments.clone()
    }

    /// Registra el formulario actual. Si faltan campos no se persiste nada
    /// y el formulario queda como estaba.
    pub async fn submit(&self) -> Result<PaymentRecord, AppError> {
        let now_ms = self.clock.monotonic_ms();
        let form = self.form();

        if !form.has_required_fields() {
            self.state
                .lock()
                .toast
                .show(ToastKind::Error, REQUIRED_FIELDS_MSG, now_ms, self.toast_ttl);
            return Err(AppError::Validation {
                errors: missing_fields(&form),
            });
        }

        let record = PaymentRecord {
            id: Uuid::new_v4().to_string(),
            name: form.name,
            email: form.email,
            amount: form.amount,
            method: form.method,
            description: form.description,
            date: display_datetime(&self.clock.now()),
        };

        // Primero se persiste; si falla, memoria y formulario quedan intactos
        let mut updated = self.list();
        updated.push(record.clone());
        self.payments.save(&updated).await?;

        {
            let mut st = self.state.lock();
            st.payments = updated;
            st.form = PaymentForm::default();
            st.toast
                .show(ToastKind::Success, PAYMENT_OK_MSG, now_ms, self.toast_ttl);
        }

        log::info!(
            "(PaymentService::submit) Pago {} registrado: S/ {} vía {:?}",
            record.id,
            record.amount,
            record.method
        );
        Ok(record)
    }
}

fn missing_fields(form: &PaymentForm) -> Vec<crate::error::FieldError> {
    [
        ("name", &form.name),
        ("email", &form.email),
        ("amount", &form.amount),
    ]
    .into_iter()
    .filter(|(_, value)| value.trim().is_empty())
    .map(|(field, _)| crate::error::FieldError::new(field, REQUIRED_FIELDS_MSG))
    .collect()
}
