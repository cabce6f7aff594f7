use serde::Deserialize;

use super::{compare_text, equals_selected, flag, lenient, matches_text, Comparator, Criteria};
use crate::models::Proveedor;

/// Search runs over the name and over the composed "CUIT 20-..." string.
#[derive(Debug, Default, Deserialize)]
pub struct ProveedorFilters {
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

impl Criteria<Proveedor> for ProveedorFilters {
    fn matches(&self, p: &Proveedor) -> bool {
        matches_text(&self.search, &[p.nombre.clone(), p.documento()])
            && equals_selected(p.tipo_iva, self.tipo_iva)
            && equals_selected(p.tipo_documento, self.tipo_documento)
    }

    fn show_deleted(&self) -> bool {
        self.ver_eliminados
    }

    fn comparator(&self) -> Option<Comparator<Proveedor>> {
        let cmp: Comparator<Proveedor> = match self.orden.as_deref()? {
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
