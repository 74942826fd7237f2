//! models/pdf_model.rs
//! Estructuras de datos para generar el PDF de un ticket.

use crate::config::pdf_config::{PdfOrientation, TicketPdfConfig};

#[derive(Debug, Clone)]
pub struct PdfRequest {
    pub file_name: String,
    /// HTML que vamos a renderizar.
    pub html: String,
    pub orientation: PdfOrientation,
    pub page_size: String,
    pub margin_mm: f64,
    pub zoom: f64,
}

impl PdfRequest {
    pub fn from_config(file_name: String, html: String, config: &TicketPdfConfig) -> Self {
        Self {
            file_name,
            html,
            orientation: config.orientation,
            page_size: config.page_size.clone(),
            margin_mm: config.margin_mm,
            zoom: config.zoom,
        }
    }
}

/// PDF ya generado, listo para descargar.
#[derive(Debug, Clone)]
pub struct PdfArtifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
}
