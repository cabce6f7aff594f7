use serde::{Deserialize, Serialize};

use super::{documento_compuesto, TIPOS_IVA};
use crate::filters::Record;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cliente {
    pub id: i64,
    pub nombre: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tipo_documento: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numero_documento: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tipo_iva: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direccion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telefono: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estado: Option<bool>,
}

impl Cliente {
    pub fn documento(&self) -> String {
        documento_compuesto(self.tipo_documento, self.numero_documento.as_deref())
    }
}

impl Record for Cliente {
    fn id(&self) -> i64 {
        self.id
    }

    fn estado(&self) -> Option<bool> {
        self.estado
    }
}

// Template-friendly version for listing and printing
#[derive(Debug, Clone, Serialize)]
pub struct ClienteDisplay {
    pub id: i64,
    pub nombre: String,
    pub documento: String,
    pub tipo_iva: &'static str,
    pub direccion: String,
    pub telefono: String,
    pub email: String,
    pub estado: bool,
}

impl From<&Cliente> for ClienteDisplay {
    fn from(cliente: &Cliente) -> Self {
        Self {
            id: cliente.id,
            nombre: cliente.nombre.clone(),
            documento: cliente.documento(),
            tipo_iva: TIPOS_IVA.label_or_empty(cliente.tipo_iva),
            direccion: cliente.direccion.clone().unwrap_or_default(),
            telefono: cliente.telefono.clone().unwrap_or_default(),
            email: cliente.email.clone().unwrap_or_default(),
            estado: cliente.estado != Some(false),
        }
    }
}
