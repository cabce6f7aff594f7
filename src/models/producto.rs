use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::TIPOS_IVA;
use crate::filters::Record;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Producto {
    pub id: i64,
    pub nombre: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "rust_decimal::serde::float_option")]
    pub precio: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "stockminimo")]
    pub stock_minimo: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    /// 1-based index into `TiposIVA`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iva: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estado: Option<bool>,
}

impl Producto {
    /// Missing stock counts as zero; a missing minimum never triggers.
    pub fn below_minimum(&self) -> bool {
        match self.stock_minimo {
            Some(minimo) => self.stock.unwrap_or(0) < minimo,
            None => false,
        }
    }
}

impl Record for Producto {
    fn id(&self) -> i64 {
        self.id
    }

    fn estado(&self) -> Option<bool> {
        self.estado
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductoDisplay {
    pub id: i64,
    pub nombre: String,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub precio: Option<Decimal>,
    pub stock: Option<i64>,
    pub stockminimo: Option<i64>,
    pub iva: &'static str,
    pub bajo_minimo: bool,
    pub estado: bool,
}

impl From<&Producto> for ProductoDisplay {
    fn from(producto: &Producto) -> Self {
        Self {
            id: producto.id,
            nombre: producto.nombre.clone(),
            precio: producto.precio,
            stock: producto.stock,
            stockminimo: producto.stock_minimo,
            iva: TIPOS_IVA.label_or_empty(producto.iva),
            bajo_minimo: producto.below_minimum(),
            estado: producto.estado != Some(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_keeps_backend_key_order() {
        let raw = r#"{"id":5,"nombre":"Pintura 15L Mate Blanco Látex Interior","precio":1500,"stockminimo":20,"stock":0,"estado":true}"#;
        let producto: Producto = serde_json::from_str(raw).unwrap();
        assert_eq!(producto.stock_minimo, Some(20));
        assert!(producto.below_minimum());

        let keys: Vec<String> = serde_json::to_value(&producto)
            .unwrap()
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect();
        assert_eq!(keys, vec!["id", "nombre", "precio", "stockminimo", "stock", "estado"]);
    }
}
