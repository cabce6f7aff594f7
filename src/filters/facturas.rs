use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use super::{
    compare_numbers, equals_selected, flag, in_date_range, in_range, lenient, lenient_date,
    Comparator, Criteria,
};
use crate::models::Factura;

#[derive(Debug, Default, Deserialize)]
pub struct FacturaFilters {
    #[serde(default, deserialize_with = "lenient")]
    pub cliente_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub tipo_venta: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub tipo_pago: Option<i64>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub desde: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub hasta: Option<NaiveDate>,
    /// Bounds on the derived total, IVA included.
    #[serde(default, deserialize_with = "lenient")]
    pub total_min: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient")]
    pub total_max: Option<Decimal>,
    #[serde(default)]
    pub orden: Option<String>,
    #[serde(default, deserialize_with = "flag")]
    pub desc: bool,
}

impl Criteria<Factura> for FacturaFilters {
    fn matches(&self, f: &Factura) -> bool {
        equals_selected(f.cliente_id, self.cliente_id)
            && equals_selected(f.tipo_venta, self.tipo_venta)
            && equals_selected(f.tipo_pago, self.tipo_pago)
            && in_date_range(f.fecha, self.desde, self.hasta)
            && in_range(Some(f.totals().total), self.total_min, self.total_max)
    }

    fn comparator(&self) -> Option<Comparator<Factura>> {
        let cmp: Comparator<Factura> = match self.orden.as_deref()? {
            "fecha" => |a, b| a.fecha.cmp(&b.fecha),
            "total" => |a, b| compare_numbers(a.totals().total, b.totals().total),
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

    #[test]
    fn test_total_range_uses_iva_inclusive_total() {
        let facturas: Vec<Factura> = serde_json::from_value(serde_json::json!([
            { "id": 1, "fecha": "2024-05-02", "cliente_id": 8,
              "detalle": [{ "cantidad": 2, "precio": 100 }, { "cantidad": 1, "precio": 50 }] },
            { "id": 2, "fecha": "2024-05-03", "cliente_id": 9,
              "detalle": [{ "cantidad": 1, "precio": 260 }] },
            { "id": 3, "fecha": "2024-05-03", "cliente_id": 8 }
        ]))
        .unwrap();

        // 250 + IVA = 302.5 and 260 + IVA = 314.6
        let criteria = FacturaFilters { total_min: Some(Decimal::from(300)), total_max: Some(Decimal::from(310)), ..Default::default() };
        let ids: Vec<i64> = apply_filters(&facturas, &criteria).iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![1]);

        let criteria = FacturaFilters { cliente_id: Some(8), ..Default::default() };
        let ids: Vec<i64> = apply_filters(&facturas, &criteria).iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }
}
