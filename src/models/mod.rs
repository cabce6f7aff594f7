pub mod catalogos;
pub mod cliente;
pub mod documento;
pub mod factura;
pub mod margen;
pub mod nota_pedido;
pub mod precio_proveedor;
pub mod producto;
pub mod proveedor;
pub mod usuario;

pub use catalogos::{Catalogo, TIPOS_DOCUMENTO, TIPOS_IVA, TIPOS_PAGO, TIPO_COMPRA, TIPO_VENTA};
pub use cliente::{Cliente, ClienteDisplay};
pub use documento::{DocumentoImpresion, Totals};
pub use factura::{Factura, FacturaDisplay};
pub use margen::Margen;
pub use nota_pedido::{EstadoNP, InvalidTransition, NotaPedido, NotaPedidoDisplay};
pub use precio_proveedor::{PrecioProveedor, PrecioProveedorDisplay};
pub use producto::{Producto, ProductoDisplay};
pub use proveedor::{Proveedor, ProveedorDisplay};
pub use usuario::{Usuario, UsuarioDisplay};

/// "<document type label> <number>", the string searched and shown for
/// suppliers and clients.
pub fn documento_compuesto(tipo: Option<i64>, numero: Option<&str>) -> String {
    let etiqueta = TIPOS_DOCUMENTO.label_or_empty(tipo);
    let numero = numero.unwrap_or_default();
    format!("{} {}", etiqueta, numero).trim().to_string()
}

/// Backend dates arrive either as `YYYY-MM-DD` or as full ISO timestamps.
pub mod fecha {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    /// `dd/mm/yyyy` as shown on screens and documents; empty when unset.
    pub fn display(date: Option<NaiveDate>) -> String {
        date.map(|d| d.format("%d/%m/%Y").to_string()).unwrap_or_default()
    }

    fn parse(s: &str) -> Option<NaiveDate> {
        let day = s.get(..10).unwrap_or(s);
        NaiveDate::parse_from_str(day, FORMAT).ok()
    }

    /// Null, missing or unparseable dates decode as `None` so one bad
    /// record never sinks a whole list.
    pub mod option {
        use super::*;

        pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error> {
            match date {
                Some(d) => serializer.serialize_str(&d.format(FORMAT).to_string()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
            let raw: Option<String> = Option::deserialize(deserializer)?;
            Ok(raw.as_deref().and_then(parse))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documento_compuesto() {
        assert_eq!(documento_compuesto(Some(2), Some("20-12345678-9")), "CUIT 20-12345678-9");
        assert_eq!(documento_compuesto(Some(0), Some("123")), "123");
        assert_eq!(documento_compuesto(None, None), "");
    }

    #[test]
    fn test_fecha_display_and_lenient_decoding() {
        #[derive(serde::Deserialize)]
        struct Fila {
            #[serde(default, with = "fecha::option")]
            fecha: Option<chrono::NaiveDate>,
        }

        let filas: Vec<Fila> = serde_json::from_str(
            r#"[{ "fecha": "2024-04-10T00:00:00.000Z" }, { "fecha": null }, {}, { "fecha": "pronto" }]"#,
        )
        .unwrap();
        let mostradas: Vec<String> = filas.iter().map(|f| fecha::display(f.fecha)).collect();
        assert_eq!(mostradas, vec!["10/04/2024", "", "", ""]);
    }
}
