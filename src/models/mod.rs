//! models/mod.rs
//! Módulo raíz para modelos/estructuras compartidas.

pub mod contact_model;
pub mod event_model;
pub mod metrics_model;
pub mod payment_model;
pub mod pdf_model;
pub mod sms_model;
pub mod toast_model;
