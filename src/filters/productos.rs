use rust_decimal::Decimal;
use serde::Deserialize;

use super::{
    compare_numbers, compare_text, equals_selected, flag, in_range, lenient, matches_text,
    stock_toggle_passes, Comparator, Criteria,
};
use crate::models::Producto;

#[derive(Debug, Default, Deserialize)]
pub struct ProductoFilters {
    #[serde(default)]
    pub search: String,
    #[serde(default, deserialize_with = "lenient")]
    pub precio_min: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient")]
    pub precio_max: Option<Decimal>,
    /// Evaluated as `stock || 0 > 0`, see `stock_toggle_passes`.
    #[serde(default, deserialize_with = "flag")]
    pub con_stock: bool,
    #[serde(default, deserialize_with = "flag")]
    pub bajo_minimo: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub iva: Option<i64>,
    #[serde(default, deserialize_with = "flag")]
    pub ver_eliminados: bool,
    #[serde(default)]
    pub orden: Option<String>,
    #[serde(default, deserialize_with = "flag")]
    pub desc: bool,
}

impl Criteria<Producto> for ProductoFilters {
    fn matches(&self, p: &Producto) -> bool {
        matches_text(&self.search, &[&p.nombre])
            && in_range(p.precio, self.precio_min, self.precio_max)
            && (!self.con_stock || stock_toggle_passes(p.stock))
            && (!self.bajo_minimo || p.below_minimum())
            && equals_selected(p.iva, self.iva)
    }

    fn show_deleted(&self) -> bool {
        self.ver_eliminados
    }

    fn comparator(&self) -> Option<Comparator<Producto>> {
        let cmp: Comparator<Producto> = match self.orden.as_deref()? {
            "nombre" => |a, b| compare_text(&a.nombre, &b.nombre),
            "precio" => |a, b| compare_numbers(a.precio.unwrap_or_default(), b.precio.unwrap_or_default()),
            "stock" => |a, b| compare_numbers(a.stock.unwrap_or(0), b.stock.unwrap_or(0)),
            "stockminimo" => |a, b| compare_numbers(a.stock_minimo.unwrap_or(0), b.stock_minimo.unwrap_or(0)),
            _ => return None,
        };
        Some(cmp)
    }

    fn descending(&self) -> bool {
        self.desc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::apply_filters;

    fn producto(id: i64, nombre: &str, precio: i64, stock: Option<i64>, estado: Option<bool>) -> Producto {
        Producto {
            id,
            nombre: nombre.to_string(),
            descripcion: None,
            precio: Some(Decimal::from(precio)),
            stock_minimo: Some(20),
            stock,
            iva: Some(1),
            estado,
        }
    }

    fn catalogo() -> Vec<Producto> {
        vec![
            producto(5, "Pintura 15L Mate Blanco Látex Interior", 1500, Some(0), Some(true)),
            producto(3, "Esmalte Sintético Negro 1L", 800, Some(-4), Some(true)),
            producto(8, "Rodillo Lana 22cm", 450, Some(35), None),
            producto(1, "Thinner 5L", 600, None, Some(false)),
        ]
    }

    #[test]
    fn test_single_product_scenario() {
        let productos = vec![producto(5, "Pintura 15L Mate Blanco Látex Interior", 1500, Some(0), Some(true))];
        let result = apply_filters(&productos, &ProductoFilters::default());
        assert_eq!(result, productos);
    }

    #[test]
    fn test_search_and_price_range() {
        let criteria = ProductoFilters {
            search: "látex".into(),
            precio_min: Some(Decimal::from(1000)),
            ..Default::default()
        };
        let ids: Vec<i64> = apply_filters(&catalogo(), &criteria).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![5]);
    }

    #[test]
    fn test_con_stock_keeps_negative_stock() {
        let criteria = ProductoFilters { con_stock: true, ..Default::default() };
        let ids: Vec<i64> = apply_filters(&catalogo(), &criteria).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 8]);
    }

    #[test]
    fn test_bajo_minimo() {
        let criteria = ProductoFilters { bajo_minimo: true, ver_eliminados: true, ..Default::default() };
        let ids: Vec<i64> = apply_filters(&catalogo(), &criteria).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 3, 5]);
    }

    #[test]
    fn test_sort_by_price_descending() {
        let criteria = ProductoFilters { orden: Some("precio".into()), desc: true, ..Default::default() };
        let ids: Vec<i64> = apply_filters(&catalogo(), &criteria).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![5, 3, 8]);
    }

    #[test]
    fn test_unknown_sort_column_falls_back_to_id() {
        let criteria = ProductoFilters { orden: Some("color".into()), ..Default::default() };
        let ids: Vec<i64> = apply_filters(&catalogo(), &criteria).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 5, 8]);
    }
}
