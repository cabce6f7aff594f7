use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fixed IVA rate applied to every invoice and purchase order.
pub const IVA_RATE: Decimal = Decimal::from_parts(21, 0, 0, false, 2);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineaDetalle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub producto_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "rust_decimal::serde::float_option")]
    pub cantidad: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "rust_decimal::serde::float_option")]
    pub precio: Option<Decimal>,
}

impl LineaDetalle {
    /// Quantity times unit price; a missing factor counts as zero.
    /// `None` when the product does not fit in a `Decimal`.
    pub fn importe(&self) -> Option<Decimal> {
        self.cantidad
            .unwrap_or_default()
            .checked_mul(self.precio.unwrap_or_default())
    }
}

/// Derived document amounts. Never stored; recomputed from the line items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Totals {
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub iva: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

impl Totals {
    /// Unrounded totals. A missing detail list yields zeros, and so does an
    /// amount too large to represent.
    pub fn compute(lineas: Option<&[LineaDetalle]>) -> Self {
        Self::try_compute(lineas.unwrap_or_default()).unwrap_or_else(|| {
            log::warn!("totales fuera de rango; se muestran en cero");
            Self::default()
        })
    }

    fn try_compute(lineas: &[LineaDetalle]) -> Option<Self> {
        let subtotal = lineas
            .iter()
            .try_fold(Decimal::ZERO, |acc, linea| acc.checked_add(linea.importe()?))?;
        let iva = subtotal.checked_mul(IVA_RATE)?;
        Some(Self {
            subtotal,
            iva,
            total: subtotal.checked_add(iva)?,
        })
    }
}

/// Nearest whole unit, halves going up.
pub fn round_half_up(value: Decimal) -> Option<Decimal> {
    value.checked_add(Decimal::new(5, 1)).map(|v| v.floor())
}

/// One printed row: raw amounts plus the whole-unit IVA and total columns.
#[derive(Debug, Clone, Serialize)]
pub struct FilaDocumento {
    pub descripcion: String,
    pub cantidad: Decimal,
    pub precio: Decimal,
    pub importe: Decimal,
    pub iva: Decimal,
    pub total: Decimal,
}

impl From<&LineaDetalle> for FilaDocumento {
    fn from(linea: &LineaDetalle) -> Self {
        let importes = linea.importe().and_then(|importe| {
            let iva = importe.checked_mul(IVA_RATE)?;
            Some((importe, round_half_up(iva)?, round_half_up(importe.checked_add(iva)?)?))
        });
        let (importe, iva, total) = importes.unwrap_or_else(|| {
            log::warn!("importe fuera de rango en {:?}; la fila se imprime en cero", linea.descripcion);
            (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO)
        });

        Self {
            descripcion: linea.descripcion.clone().unwrap_or_default(),
            cantidad: linea.cantidad.unwrap_or_default(),
            precio: linea.precio.unwrap_or_default(),
            importe,
            iva,
            total,
        }
    }
}

/// Structured description handed to the print collaborator.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentoImpresion {
    pub titulo: String,
    pub numero: i64,
    pub fecha: String,
    pub contraparte: String,
    pub detalles: Vec<(&'static str, String)>,
    pub filas: Vec<FilaDocumento>,
    pub totales: Totals,
}

impl DocumentoImpresion {
    pub fn new(
        titulo: impl Into<String>,
        numero: i64,
        fecha: String,
        contraparte: String,
        lineas: Option<&[LineaDetalle]>,
    ) -> Self {
        Self {
            titulo: titulo.into(),
            numero,
            fecha,
            contraparte,
            detalles: Vec::new(),
            filas: lineas.unwrap_or_default().iter().map(FilaDocumento::from).collect(),
            totales: Totals::compute(lineas),
        }
    }

    pub fn with_detail(mut self, nombre: &'static str, valor: impl Into<String>) -> Self {
        let valor = valor.into();
        if !valor.is_empty() {
            self.detalles.push((nombre, valor));
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linea(cantidad: i64, precio: i64) -> LineaDetalle {
        LineaDetalle {
            cantidad: Some(Decimal::from(cantidad)),
            precio: Some(Decimal::from(precio)),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_and_missing_details_are_zero() {
        assert_eq!(Totals::compute(Some(&[])), Totals::default());
        assert_eq!(Totals::compute(None), Totals::default());
    }

    #[test]
    fn test_totals_apply_fixed_iva() {
        let totals = Totals::compute(Some(&[linea(2, 100), linea(1, 50)]));
        assert_eq!(totals.subtotal, Decimal::from(250));
        assert_eq!(totals.iva, Decimal::new(525, 1));
        assert_eq!(totals.total, Decimal::new(3025, 1));
    }

    #[test]
    fn test_missing_factor_counts_as_zero() {
        let partial = LineaDetalle {
            cantidad: Some(Decimal::from(3)),
            ..Default::default()
        };
        let totals = Totals::compute(Some(&[partial, linea(1, 10)]));
        assert_eq!(totals.subtotal, Decimal::from(10));
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(Decimal::new(525, 1)), Some(Decimal::from(53)));
        assert_eq!(round_half_up(Decimal::new(524, 1)), Some(Decimal::from(52)));
        assert_eq!(round_half_up(Decimal::new(3025, 1)), Some(Decimal::from(303)));
        assert_eq!(round_half_up(Decimal::MAX), None);
    }

    #[test]
    fn test_printed_rows_round_per_row_columns_only() {
        let doc = DocumentoImpresion::new("Factura", 7, "2024-05-02".into(), "Juan".into(), Some(&[linea(1, 250)]));
        assert_eq!(doc.filas[0].iva, Decimal::from(53));
        assert_eq!(doc.filas[0].total, Decimal::from(303));
        assert_eq!(doc.totales.iva, Decimal::new(525, 1));
    }

    #[test]
    fn test_line_items_accept_json_numbers() {
        let linea: LineaDetalle =
            serde_json::from_str(r#"{"producto_id": 5, "cantidad": 2, "precio": 1500.5}"#).unwrap();
        assert_eq!(linea.importe(), Some(Decimal::new(30010, 1)));
        assert_eq!(linea.descripcion, None);
    }

    #[test]
    fn test_overflowing_amounts_fall_back_to_zero() {
        let enorme: LineaDetalle =
            serde_json::from_str(r#"{"descripcion": "Látex", "cantidad": 1e15, "precio": 1e15}"#).unwrap();
        assert_eq!(enorme.importe(), None);
        assert_eq!(Totals::compute(Some(&[enorme.clone(), linea(1, 10)])), Totals::default());

        let fila = FilaDocumento::from(&enorme);
        assert_eq!(fila.importe, Decimal::ZERO);
        assert_eq!(fila.total, Decimal::ZERO);
        assert_eq!(fila.descripcion, "Látex");
    }
}
