use serde::{Deserialize, Serialize};

use super::{documento_compuesto, TIPOS_IVA};
use crate::filters::Record;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proveedor {
    pub id: i64,
    pub nombre: String,
    /// 1-based index into `TiposDocumento`.
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

impl Proveedor {
    pub fn documento(&self) -> String {
        documento_compuesto(self.tipo_documento, self.numero_documento.as_deref())
    }
}

impl Record for Proveedor {
    fn id(&self) -> i64 {
        self.id
    }

    fn estado(&self) -> Option<bool> {
        self.estado
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProveedorDisplay {
    pub id: i64,
    pub nombre: String,
    pub documento: String,
    pub tipo_iva: &'static str,
    pub direccion: String,
    pub telefono: String,
    pub email: String,
    pub estado: bool,
}

impl From<&Proveedor> for ProveedorDisplay {
    fn from(proveedor: &Proveedor) -> Self {
        Self {
            id: proveedor.id,
            nombre: proveedor.nombre.clone(),
            documento: proveedor.documento(),
            tipo_iva: TIPOS_IVA.label_or_empty(proveedor.tipo_iva),
            direccion: proveedor.direccion.clone().unwrap_or_default(),
            telefono: proveedor.telefono.clone().unwrap_or_default(),
            email: proveedor.email.clone().unwrap_or_default(),
            estado: proveedor.estado != Some(false),
        }
    }
}
