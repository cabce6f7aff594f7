use serde::Serialize;

/// Closed list of labels referenced by records through a 1-based index.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Catalogo {
    pub nombre: &'static str,
    pub etiquetas: &'static [&'static str],
}

impl Catalogo {
    /// Label at 1-based `index`. Zero, negative and out-of-range indices have no label.
    pub fn label(&self, index: i64) -> Option<&'static str> {
        if index < 1 {
            return None;
        }
        self.etiquetas.get((index - 1) as usize).copied()
    }

    pub fn label_or_empty(&self, index: Option<i64>) -> &'static str {
        index.and_then(|i| self.label(i)).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.etiquetas.len()
    }
}

pub const TIPOS_IVA: Catalogo = Catalogo {
    nombre: "TiposIVA",
    etiquetas: &[
        "Responsable Inscripto",
        "Monotributista",
        "Exento",
        "Consumidor Final",
    ],
};

pub const TIPOS_DOCUMENTO: Catalogo = Catalogo {
    nombre: "TiposDocumento",
    etiquetas: &["DNI", "CUIT", "CUIL", "Pasaporte"],
};

pub const TIPO_COMPRA: Catalogo = Catalogo {
    nombre: "TipoCompra",
    etiquetas: &["Contado", "Cuenta Corriente"],
};

pub const TIPO_VENTA: Catalogo = Catalogo {
    nombre: "TipoVenta",
    etiquetas: &["Factura A", "Factura B", "Factura C"],
};

pub const TIPOS_PAGO: Catalogo = Catalogo {
    nombre: "TiposPago",
    etiquetas: &[
        "Efectivo",
        "Tarjeta de Débito",
        "Tarjeta de Crédito",
        "Transferencia",
        "Cheque",
    ],
};

pub fn all_catalogs() -> Vec<Catalogo> {
    vec![TIPOS_IVA, TIPOS_DOCUMENTO, TIPO_COMPRA, TIPO_VENTA, TIPOS_PAGO]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_is_one_based() {
        assert_eq!(TIPOS_DOCUMENTO.label(1), Some("DNI"));
        assert_eq!(TIPOS_DOCUMENTO.label(2), Some("CUIT"));
        assert_eq!(TIPOS_PAGO.label(TIPOS_PAGO.len() as i64), Some("Cheque"));
    }

    #[test]
    fn test_label_out_of_range_is_absent() {
        assert_eq!(TIPOS_IVA.label(0), None);
        assert_eq!(TIPOS_IVA.label(-3), None);
        assert_eq!(TIPOS_IVA.label(TIPOS_IVA.len() as i64 + 1), None);
        assert_eq!(TIPO_VENTA.label_or_empty(Some(99)), "");
        assert_eq!(TIPO_VENTA.label_or_empty(None), "");
    }
}
