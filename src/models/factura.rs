use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{documento::LineaDetalle, fecha, Totals, TIPOS_PAGO, TIPO_VENTA};
use crate::filters::Record;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Factura {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "fecha::option")]
    pub fecha: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cliente_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tipo_venta: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tipo_pago: Option<i64>,
    /// Percentage shown on the document; totals are computed from the lines only.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "rust_decimal::serde::float_option")]
    pub descuento: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detalle: Option<Vec<LineaDetalle>>,
}

impl Factura {
    pub fn totals(&self) -> Totals {
        Totals::compute(self.detalle.as_deref())
    }
}

impl Record for Factura {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Invoice row as listed and exported, with the derived amounts.
#[derive(Debug, Clone, Serialize)]
pub struct FacturaDisplay {
    pub id: i64,
    pub fecha: String,
    pub cliente: String,
    pub tipo_venta: &'static str,
    pub tipo_pago: &'static str,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub descuento: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub iva: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

impl FacturaDisplay {
    pub fn new(factura: &Factura, cliente: Option<&str>) -> Self {
        let totals = factura.totals();
        Self {
            id: factura.id,
            fecha: fecha::display(factura.fecha),
            cliente: cliente.unwrap_or_default().to_string(),
            tipo_venta: TIPO_VENTA.label_or_empty(factura.tipo_venta),
            tipo_pago: TIPOS_PAGO.label_or_empty(factura.tipo_pago),
            descuento: factura.descuento,
            subtotal: totals.subtotal,
            iva: totals.iva,
            total: totals.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_derives_totals_and_labels() {
        let factura: Factura = serde_json::from_value(serde_json::json!({
            "id": 40,
            "fecha": "2024-05-02",
            "cliente_id": 8,
            "tipo_venta": 2,
            "tipo_pago": 9,
            "detalle": [
                { "producto_id": 5, "descripcion": "Látex 20L", "cantidad": 2, "precio": 100 },
                { "producto_id": 6, "descripcion": "Rodillo", "cantidad": 1, "precio": 50 }
            ]
        }))
        .unwrap();

        let display = FacturaDisplay::new(&factura, Some("Pinturerías del Sur"));
        assert_eq!(display.tipo_venta, "Factura B");
        assert_eq!(display.tipo_pago, "");
        assert_eq!(display.subtotal, Decimal::from(250));
        assert_eq!(display.total, Decimal::new(3025, 1));
    }
}
