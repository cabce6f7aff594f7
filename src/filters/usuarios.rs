use serde::Deserialize;

use super::{compare_text, flag, matches_text, Comparator, Criteria};
use crate::models::Usuario;

#[derive(Debug, Default, Deserialize)]
pub struct UsuarioFilters {
    #[serde(default)]
    pub search: String,
    /// Compared exactly as stored; no case folding.
    #[serde(default)]
    pub rol: Option<String>,
    #[serde(default, deserialize_with = "flag")]
    pub ver_eliminados: bool,
    #[serde(default)]
    pub orden: Option<String>,
    #[serde(default, deserialize_with = "flag")]
    pub desc: bool,
}

impl Criteria<Usuario> for UsuarioFilters {
    fn matches(&self, u: &Usuario) -> bool {
        let email = u.email.clone().unwrap_or_default();
        let rol_ok = match self.rol.as_deref().filter(|r| !r.is_empty()) {
            Some(rol) => u.rol.as_deref() == Some(rol),
            None => true,
        };
        matches_text(&self.search, &[u.full_name(), email]) && rol_ok
    }

    fn show_deleted(&self) -> bool {
        self.ver_eliminados
    }

    fn comparator(&self) -> Option<Comparator<Usuario>> {
        let cmp: Comparator<Usuario> = match self.orden.as_deref()? {
            "nombre" => |a, b| compare_text(&a.full_name(), &b.full_name()),
            "rol" => |a, b| compare_text(a.rol.as_deref().unwrap_or_default(), b.rol.as_deref().unwrap_or_default()),
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
    fn test_role_filter_is_case_sensitive() {
        let usuarios: Vec<Usuario> = serde_json::from_value(serde_json::json!([
            { "id": 1, "nombre": "Ana", "apellido": "Paz", "email": "ana@colorcor.com.ar", "rol": "ADMINISTRADOR" },
            { "id": 2, "nombre": "Luis", "email": "luis@colorcor.com.ar", "rol": "COMPRADOR" }
        ]))
        .unwrap();

        let exact = UsuarioFilters { rol: Some("COMPRADOR".into()), ..Default::default() };
        assert_eq!(apply_filters(&usuarios, &exact).len(), 1);

        let title_case = UsuarioFilters { rol: Some("Comprador".into()), ..Default::default() };
        assert!(apply_filters(&usuarios, &title_case).is_empty());

        let by_email = UsuarioFilters { search: "ANA@".into(), ..Default::default() };
        assert_eq!(apply_filters(&usuarios, &by_email)[0].id, 1);
    }
}
