use serde::Deserialize;

use super::{flag, matches_text, Criteria};
use crate::models::Margen;

#[derive(Debug, Default, Deserialize)]
pub struct MargenFilters {
    #[serde(default)]
    pub search: String,
    #[serde(default, deserialize_with = "flag")]
    pub ver_eliminados: bool,
}

impl Criteria<Margen> for MargenFilters {
    fn matches(&self, m: &Margen) -> bool {
        matches_text(&self.search, &[&m.nombre])
    }

    fn show_deleted(&self) -> bool {
        self.ver_eliminados
    }
}
