use serde::{Deserialize, Serialize};

use crate::filters::Record;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Usuario {
    pub id: i64,
    pub nombre: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apellido: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Stored exactly as the backend sends it (`ADMINISTRADOR`, `COMPRADOR`, `VENDEDOR`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estado: Option<bool>,
}

impl Usuario {
    pub fn full_name(&self) -> String {
        match &self.apellido {
            Some(apellido) => format!("{} {}", self.nombre, apellido),
            None => self.nombre.clone(),
        }
    }
}

impl Record for Usuario {
    fn id(&self) -> i64 {
        self.id
    }

    fn estado(&self) -> Option<bool> {
        self.estado
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UsuarioDisplay {
    pub id: i64,
    pub nombre: String,
    pub email: String,
    pub rol: String,
    pub estado: bool,
}

impl From<&Usuario> for UsuarioDisplay {
    fn from(usuario: &Usuario) -> Self {
        Self {
            id: usuario.id,
            nombre: usuario.full_name(),
            email: usuario.email.clone().unwrap_or_default(),
            rol: usuario.rol.clone().unwrap_or_default(),
            estado: usuario.estado != Some(false),
        }
    }
}
