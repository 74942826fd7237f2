//! models/payment_model.rs

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[default]
    Tarjeta,
    Yape,
    Plin,
    Transferencia,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::Tarjeta,
        PaymentMethod::Yape,
        PaymentMethod::Plin,
        PaymentMethod::Transferencia,
    ];
}

/// Estado del formulario de pagos.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    /// Texto libre, tal cual lo escribe el usuario.
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub method: PaymentMethod,
    #[serde(default)]
    pub description: String,
}

impl PaymentForm {
    /// Nombre, correo y monto son obligatorios.
    pub fn has_required_fields(&self) -> bool {
        ![&self.name, &self.email, &self.amount]
            .iter()
            .any(|f| f.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub amount: String,
    pub method: PaymentMethod,
    pub description: String,
    pub date: String,
}
