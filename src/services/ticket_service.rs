//! services/ticket_service.rs
//! Panel de historial: lista de envíos, modal con el ticket imprimible,
//! exportación a PDF y envío simulado por SMS.

use std::{sync::Arc, time::Duration};

use parking_lot::Mutex;
use serde::Serialize;
use uuid::Uuid;

use crate::{
    config::pdf_config::TicketPdfConfig,
    error::AppError,
    models::{
        contact_model::{display_datetime, ContactLogEntry},
        pdf_model::{PdfArtifact, PdfRequest},
        sms_model::SentSmsRecord,
        toast_model::{Toast, ToastKind, ToastSlot},
    },
    services::{
        clock_service::Clock,
        contact_service::ContactService,
        pdf_service::TicketRenderer,
        storage_service::{keys, Collection, KvStore},
        validation_service::{is_valid_phone, PHONE_HINT},
    },
};

pub const EXPORT_OK_MSG: &str = "✅ Ticket descargado como PDF";
pub const EXPORT_ERROR_MSG: &str = "❌ Error generando el ticket";

#[derive(Debug, Default)]
struct TicketState {
    selected: Option<ContactLogEntry>,
    phone: String,
    toast: ToastSlot,
}

#[derive(Debug, Clone, Serialize)]
pub struct TicketSnapshot {
    pub logs: Vec<ContactLogEntry>,
    pub modal_open: bool,
    pub selected: Option<ContactLogEntry>,
    pub phone: String,
    pub toast: Option<Toast>,
}

#[derive(Clone)]
pub struct TicketService {
    state: Arc<Mutex<TicketState>>,
    contact: ContactService,
    sent: Collection<Vec<SentSmsRecord>>,
    renderer: Arc<dyn TicketRenderer>,
    pdf_config: TicketPdfConfig,
    clock: Arc<dyn Clock>,
    toast_ttl: Duration,
}

impl TicketService {
    pub fn new(
        store: Arc<dyn KvStore>,
        contact: ContactService,
        renderer: Arc<dyn TicketRenderer>,
        pdf_config: TicketPdfConfig,
        clock: Arc<dyn Clock>,
        toast_ttl: Duration,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(TicketState::default())),
            contact,
            sent: Collection::new(store, keys::SENT_SMS),
            renderer,
            pdf_config,
            clock,
            toast_ttl,
        }
    }

    pub fn snapshot(&self) -> TicketSnapshot {
        let now_ms = self.clock.monotonic_ms();
        let logs = self.contact.logs();
        let st = self.state.lock();
        TicketSnapshot {
            logs,
            modal_open: st.selected.is_some(),
            selected: st.selected.clone(),
            phone: st.phone.clone(),
            toast: st.toast.visible(now_ms),
        }
    }

    /// Selecciona la entrada `index` (0 = la más reciente) y abre el modal.
    pub fn open(&self, index: usize) -> Result<ContactLogEntry, AppError> {
        let entry = self
            .contact
            .logs()
            .into_iter()
            .nth(index)
            .ok_or_else(|| AppError::NotFound(format!("ticket #{}", index)))?;
        self.state.lock().selected = Some(entry.clone());
        Ok(entry)
    }

    pub fn close(&self) {
        let mut st = self.state.lock();
        st.selected = None;
        st.phone.clear();
    }

    pub fn is_open(&self) -> bool {
        self.state.lock().selected.is_some()
    }

    fn selected(&self) -> Result<ContactLogEntry, AppError> {
        self.state
            .lock()
            .selected
            .clone()
            .ok_or(AppError::NoTicketSelected)
    }

    /// HTML imprimible del ticket seleccionado.
    pub fn preview(&self) -> Result<String, AppError> {
        let entry = self.selected()?;
        Ok(render_ticket_html(&entry, &Uuid::new_v4().to_string()))
    }

    /// Exporta el ticket seleccionado. Cualquier falla del render se
    /// reporta con el mismo mensaje genérico.
    pub async fn download_pdf(&self) -> Result<PdfArtifact, AppError> {
        let entry = self.selected()?;
        let file_name = ticket_file_name(&entry);
        let html = render_ticket_html(&entry, &Uuid::new_v4().to_string());
        let req = PdfRequest::from_config(file_name.clone(), html, &self.pdf_config);

        let result = self.renderer.render(req).await;
        let now_ms = self.clock.monotonic_ms();
        match result {
            Ok(bytes) => {
                self.state
                    .lock()
                    .toast
                    .show(ToastKind::Success, EXPORT_OK_MSG, now_ms, self.toast_ttl);
                Ok(PdfArtifact { file_name, bytes })
            }
            Err(e) => {
                log::error!("(download_pdf) Error generando '{}': {:?}", file_name, e);
                self.state
                    .lock()
                    .toast
                    .show(ToastKind::Error, EXPORT_ERROR_MSG, now_ms, self.toast_ttl);
                Err(AppError::Export(EXPORT_ERROR_MSG.to_string()))
            }
        }
    }

    /// "Envía" el ticket seleccionado al número indicado.
    pub async fn send_sms(&self, phone: &str) -> Result<SentSmsRecord, AppError> {
        let entry = self.selected()?;
        let now_ms = self.clock.monotonic_ms();

        if !is_valid_phone(phone) {
            let mut st = self.state.lock();
            st.phone = phone.to_string();
            st.toast
                .show(ToastKind::Error, PHONE_HINT, now_ms, self.toast_ttl);
            return Err(AppError::validation("phone", PHONE_HINT));
        }

        let record = SentSmsRecord {
            id: Uuid::new_v4().to_string(),
            phone: phone.to_string(),
            log: entry,
            sent_at: display_datetime(&self.clock.now()),
        };
        self.sent.prepend(record.clone()).await?;

        {
            let mut st = self.state.lock();
            st.toast.show(
                ToastKind::Success,
                format!("📲 Ticket enviado (simulado) a {}", phone),
                now_ms,
                self.toast_ttl,
            );
        }
        self.close();

        log::info!("(send_sms) Ticket enviado (simulado) a {}", phone);
        Ok(record)
    }

    pub async fn sent_messages(&self) -> anyhow::Result<Vec<SentSmsRecord>> {
        self.sent.load().await
    }
}

/// `ticket-{asunto}-{fecha}.pdf`, sin separadores de ruta.
pub fn ticket_file_name(entry: &ContactLogEntry) -> String {
    let raw = format!("ticket-{}-{}.pdf", entry.subject, entry.date);
    raw.chars()
        .map(|c| if matches!(c, '/' | '\\') { '-' } else { c })
        .collect()
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn or_dash(value: &str) -> String {
    if value.is_empty() {
        "—".to_string()
    } else {
        escape_html(value)
    }
}

pub fn render_ticket_html(entry: &ContactLogEntry, ticket_id: &str) -> String {
    let status_color = if entry.is_success() { "#0a6" } else { "#d33" };
    let amount = entry
        .budget
        .as_deref()
        .map(|b| {
            format!(
                r#"<div style="margin-top:8px"><strong>Monto:</strong> <span style="color:#0a6;font-weight:700">S/ {}</span></div>"#,
                escape_html(b)
            )
        })
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="es">
<head><meta charset="utf-8"><title>Ticket {ticket_id}</title></head>
<body style="font-family: Arial, Helvetica, sans-serif">
<div style="width:320px;padding:16px;background:#fff;color:#000">
  <div style="border-bottom:1px solid #ddd;padding-bottom:6px;margin-bottom:6px">
    <div style="font-weight:700;font-size:14px">RECIBO DE PAGO (SIMULADO)</div>
    <div style="font-size:10px;color:#666">Ticket ID: {ticket_id}</div>
  </div>
  <p style="font-size:12px;margin-bottom:4px"><strong>Fecha:</strong> {date} — <strong>Hora:</strong> {time}</p>
  <p style="font-size:12px"><strong>Cliente:</strong> {name}<br><strong>Correo:</strong> {email}</p>
  <div style="border-top:1px dashed #ccc;margin:10px 0"></div>
  <p style="font-size:12px"><strong>Asunto:</strong> {subject}<br><strong>Mensaje:</strong> {message}</p>
  {amount}
  <div style="border-top:1px dashed #ccc;margin:10px 0"></div>
  <p style="font-size:12px;color:{status_color};font-weight:600">Estado: {status}</p>
  <div style="font-size:10px;color:#777;margin-top:10px">*Este comprobante es generado automáticamente y no tiene validez bancaria.</div>
</div>
</body>
</html>"#,
        ticket_id = escape_html(ticket_id),
        date = escape_html(&entry.date),
        time = escape_html(&entry.time),
        name = or_dash(&entry.name),
        email = or_dash(&entry.email),
        subject = escape_html(&entry.subject),
        message = escape_html(&entry.message),
        amount = amount,
        status_color = status_color,
        status = escape_html(&entry.status),
    )
}
