use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::fecha;
use crate::filters::Record;

/// One supplier's price for one product; the comparison screen lines these up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrecioProveedor {
    pub id: i64,
    pub producto_id: i64,
    pub proveedor_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "rust_decimal::serde::float_option")]
    pub precio: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "fecha::option")]
    pub actualizado: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estado: Option<bool>,
}

impl Record for PrecioProveedor {
    fn id(&self) -> i64 {
        self.id
    }

    fn estado(&self) -> Option<bool> {
        self.estado
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PrecioProveedorDisplay {
    pub id: i64,
    pub producto: String,
    pub proveedor: String,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub precio: Option<Decimal>,
    pub actualizado: String,
    /// Difference against the cheapest price in the same comparison.
    #[serde(with = "rust_decimal::serde::float_option")]
    pub diferencia: Option<Decimal>,
}

impl PrecioProveedorDisplay {
    pub fn rows(
        precios: &[PrecioProveedor],
        producto: impl Fn(i64) -> Option<String>,
        proveedor: impl Fn(i64) -> Option<String>,
    ) -> Vec<Self> {
        let minimo = precios.iter().filter_map(|p| p.precio).min();
        precios
            .iter()
            .map(|p| Self {
                id: p.id,
                producto: producto(p.producto_id).unwrap_or_default(),
                proveedor: proveedor(p.proveedor_id).unwrap_or_default(),
                precio: p.precio,
                actualizado: fecha::display(p.actualizado),
                diferencia: p.precio.zip(minimo).and_then(|(precio, min)| precio.checked_sub(min)),
            })
            .collect()
    }
}
