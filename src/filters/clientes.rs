use serde::Deserialize;

use super::{compare_text, equals_selected, flag, lenient, matches_text, Comparator, Criteria};
use crate::models::Cliente;

#[derive(Debug, Default, Deserialize)]
pub struct ClienteFilters {
    #[serde(default)]
    pub search: String,
    #[serde(default, deserialize_with = "lenient")]
    pub tipo_iva: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub tipo_documento: Option<i64>,
    #[serde(default, deserialize_with = "flag")]
    pub ver_eliminados: bool,
    #[serde(default)]
    pub orden: Option<String>,
    #[serde(default, deserialize_with = "flag")]
    pub desc: bool,
}

impl Criteria<Cliente> for ClienteFilters {
    fn matches(&self, c: &Cliente) -> bool {
        matches_text(&self.search, &[c.nombre.clone(), c.documento()])
            && equals_selected(c.tipo_iva, self.tipo_iva)
            && equals_selected(c.tipo_documento, self.tipo_documento)
    }

    fn show_deleted(&self) -> bool {
        self.ver_eliminados
    }

    fn comparator(&self) -> Option<Comparator<Cliente>> {
        let cmp: Comparator<Cliente> = match self.orden.as_deref()? {
            "nombre" => |a, b| compare_text(&a.nombre, &b.nombre),
            "documento" => |a, b| compare_text(&a.documento(), &b.documento()),
            _ => return None,
        };
        Some(cmp)
    }

    fn descending(&self) -> bool {
        self.desc
    }
}
