//! services/mod.rs
//! Módulo que agrupa distintos "servicios" o "capas de negocio" de la app.

pub mod clock_service;
pub mod contact_service;
pub mod event_bus;
pub mod payment_service;
pub mod pdf_service;
pub mod stats_service;
pub mod storage_service;
pub mod submission_service;
pub mod ticket_service;
pub mod validation_service;
