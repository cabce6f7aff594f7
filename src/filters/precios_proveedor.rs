use serde::Deserialize;
use std::cmp::Ordering;

use super::{compare_numbers, equals_selected, flag, lenient, Comparator, Criteria};
use crate::models::PrecioProveedor;

/// Supplier comparison: rows of one product lined up cheapest first.
#[derive(Debug, Default, Deserialize)]
pub struct PrecioProveedorFilters {
    #[serde(default, deserialize_with = "lenient")]
    pub producto_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub proveedor_id: Option<i64>,
    #[serde(default, deserialize_with = "flag")]
    pub ver_eliminados: bool,
    #[serde(default, deserialize_with = "flag")]
    pub desc: bool,
}

impl Criteria<PrecioProveedor> for PrecioProveedorFilters {
    fn matches(&self, p: &PrecioProveedor) -> bool {
        equals_selected(Some(p.producto_id), self.producto_id)
            && equals_selected(Some(p.proveedor_id), self.proveedor_id)
    }

    fn show_deleted(&self) -> bool {
        self.ver_eliminados
    }

    // Rows without a price go last in both directions, so the direction is
    // applied here instead of through `descending`.
    fn comparator(&self) -> Option<Comparator<PrecioProveedor>> {
        let by_price: Comparator<PrecioProveedor> = if self.desc {
            |a, b| by_price_then_missing(a, b, true)
        } else {
            |a, b| by_price_then_missing(a, b, false)
        };
        Some(by_price)
    }
}

fn by_price_then_missing(a: &PrecioProveedor, b: &PrecioProveedor, desc: bool) -> Ordering {
    match (a.precio, b.precio) {
        (Some(x), Some(y)) if desc => compare_numbers(y, x),
        (Some(x), Some(y)) => compare_numbers(x, y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.id.cmp(&b.id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::apply_filters;

    #[test]
    fn test_cheapest_first_for_selected_product() {
        let precios: Vec<PrecioProveedor> = serde_json::from_value(serde_json::json!([
            { "id": 1, "producto_id": 5, "proveedor_id": 1, "precio": 1500 },
            { "id": 2, "producto_id": 5, "proveedor_id": 2 },
            { "id": 3, "producto_id": 5, "proveedor_id": 3, "precio": 1320.5 },
            { "id": 4, "producto_id": 6, "proveedor_id": 1, "precio": 10 }
        ]))
        .unwrap();

        let criteria = PrecioProveedorFilters { producto_id: Some(5), ..Default::default() };
        let ids: Vec<i64> = apply_filters(&precios, &criteria).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);

        let criteria = PrecioProveedorFilters { producto_id: Some(5), desc: true, ..Default::default() };
        let ids: Vec<i64> = apply_filters(&precios, &criteria).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 3, 2]);
    }
}
