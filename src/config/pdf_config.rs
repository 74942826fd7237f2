//! config/pdf_config.rs
//! Parámetros de página para exportar tickets a PDF.

use serde::{Deserialize, Serialize};

/// Orientación de la página.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PdfOrientation {
    Portrait,
    Landscape,
}

/// Configuración del PDF del ticket, con valores por defecto
/// equivalentes a una hoja A4 vertical sin márgenes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketPdfConfig {
    pub orientation: PdfOrientation,
    pub page_size: String, // "A4", "Letter", ...
    pub margin_mm: f64,
    /// Equivale al `scale: 2` del rasterizado original.
    pub zoom: f64,
}

impl Default for TicketPdfConfig {
    fn default() -> Self {
        TicketPdfConfig {
            orientation: PdfOrientation::Portrait,
            page_size: "A4".to_string(),
            margin_mm: 0.0,
            zoom: 2.0,
        }
    }
}
