use chrono::NaiveDate;
use serde::Deserialize;

use super::{
    compare_numbers, equals_selected, flag, in_date_range, lenient, lenient_date, Comparator,
    Criteria,
};
use crate::models::{EstadoNP, NotaPedido};

#[derive(Debug, Default, Deserialize)]
pub struct NotaPedidoFilters {
    #[serde(default, deserialize_with = "lenient")]
    pub proveedor_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub usuario_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub estado: Option<EstadoNP>,
    #[serde(default, deserialize_with = "lenient")]
    pub tipo_compra: Option<i64>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub desde: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub hasta: Option<NaiveDate>,
    #[serde(default)]
    pub orden: Option<String>,
    #[serde(default, deserialize_with = "flag")]
    pub desc: bool,
}

impl Criteria<NotaPedido> for NotaPedidoFilters {
    fn matches(&self, n: &NotaPedido) -> bool {
        equals_selected(n.proveedor_id, self.proveedor_id)
            && equals_selected(n.usuario_id, self.usuario_id)
            && equals_selected(Some(n.estado), self.estado)
            && equals_selected(n.tipo_compra, self.tipo_compra)
            && in_date_range(n.fecha, self.desde, self.hasta)
    }

    fn comparator(&self) -> Option<Comparator<NotaPedido>> {
        let cmp: Comparator<NotaPedido> = match self.orden.as_deref()? {
            "fecha" => |a, b| a.fecha.cmp(&b.fecha),
            "vencimiento" => |a, b| a.vencimiento.cmp(&b.vencimiento),
            "estado" => |a, b| a.estado.position().cmp(&b.estado.position()),
            "total" => |a, b| compare_numbers(a.totals().total, b.totals().total),
            _ => return None,
        };
        Some(cmp)
    }

    fn descending(&self) -> bool {
        self.desc
    }
}
