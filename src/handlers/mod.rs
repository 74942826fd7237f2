//! handlers/mod.rs
//! Módulo que agrupa los distintos handlers (contacto, pagos, stats, tickets).

pub mod contact_handler;
pub mod payment_handler;
pub mod stats_handler;
pub mod ticket_handler;
