use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::filters::Record;

/// Profit margin applied over cost when pricing a product line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Margen {
    pub id: i64,
    pub nombre: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub porcentaje: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estado: Option<bool>,
}

impl Margen {
    /// Zero when the price does not fit in a `Decimal`.
    pub fn sale_price(&self, costo: Decimal) -> Decimal {
        costo
            .checked_mul(self.porcentaje)
            .and_then(|m| m.checked_div(Decimal::ONE_HUNDRED))
            .and_then(|m| costo.checked_add(m))
            .unwrap_or_else(|| {
                log::warn!("precio de venta fuera de rango para el margen {}", self.id);
                Decimal::ZERO
            })
    }
}

impl Record for Margen {
    fn id(&self) -> i64 {
        self.id
    }

    fn estado(&self) -> Option<bool> {
        self.estado
    }
}
