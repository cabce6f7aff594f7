use axum::{
    extract::{Path, Query, State},
    response::{Html, Json, Response},
};
use chrono::Utc;
use serde_json::Value;
use std::collections::HashMap;
use tower_cookies::Cookies;

use super::{
    create_and_refresh, csv_download, load_list, load_one, render_document, store, Refetch,
};
use crate::{
    error::AppError,
    filters::{apply_filters, FacturaFilters},
    middleware::require_auth,
    models::{fecha, Cliente, DocumentoImpresion, Factura, FacturaDisplay, TIPOS_PAGO, TIPO_VENTA},
    state::AppState,
};

async fn rows(state: &AppState, token: &str, facturas: &[Factura]) -> Result<Vec<FacturaDisplay>, AppError> {
    let clientes: HashMap<i64, String> = load_list::<Cliente>(state, token, false)
        .await?
        .into_iter()
        .map(|c| (c.id, c.nombre))
        .collect();

    Ok(facturas
        .iter()
        .map(|f| {
            let cliente = f.cliente_id.and_then(|id| clientes.get(&id)).map(String::as_str);
            FacturaDisplay::new(f, cliente)
        })
        .collect())
}

pub async fn list(
    State(state): State<AppState>,
    cookies: Cookies,
    Query(filters): Query<FacturaFilters>,
    Query(refetch): Query<Refetch>,
) -> Result<Json<Vec<FacturaDisplay>>, AppError> {
    let session = require_auth(&store(&cookies, &state), Utc::now())?;
    let token = session.token();
    let facturas = load_list::<Factura>(&state, token, refetch.refrescar).await?;
    Ok(Json(rows(&state, token, &apply_filters(&facturas, &filters)).await?))
}

pub async fn get(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<i64>,
) -> Result<Json<Factura>, AppError> {
    let session = require_auth(&store(&cookies, &state), Utc::now())?;
    Ok(Json(load_one::<Factura>(&state, session.token(), id).await?))
}

pub async fn export(
    State(state): State<AppState>,
    cookies: Cookies,
    Query(filters): Query<FacturaFilters>,
) -> Result<Response, AppError> {
    let session = require_auth(&store(&cookies, &state), Utc::now())?;
    let token = session.token();
    let facturas = load_list::<Factura>(&state, token, false).await?;
    let rows = rows(&state, token, &apply_filters(&facturas, &filters)).await?;
    csv_download("facturas.csv", &rows)
}

pub async fn create(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(body): Json<Value>,
) -> Result<Json<Vec<FacturaDisplay>>, AppError> {
    let session = require_auth(&store(&cookies, &state), Utc::now())?;
    let token = session.token();
    let facturas = create_and_refresh::<Factura>(&state, token, body).await?;
    Ok(Json(rows(&state, token, &apply_filters(&facturas, &FacturaFilters::default())).await?))
}

pub async fn print(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<i64>,
) -> Result<Html<String>, AppError> {
    let session = require_auth(&store(&cookies, &state), Utc::now())?;
    let token = session.token();
    let factura = load_one::<Factura>(&state, token, id).await?;

    let cliente = match factura.cliente_id {
        Some(cliente_id) => load_list::<Cliente>(&state, token, false)
            .await?
            .into_iter()
            .find(|c| c.id == cliente_id),
        None => None,
    };

    render_document(document(&factura, cliente.as_ref()))
}

/// Printable invoice. The discount is informative; totals come from the lines.
pub fn document(factura: &Factura, cliente: Option<&Cliente>) -> DocumentoImpresion {
    DocumentoImpresion::new(
        TIPO_VENTA.label(factura.tipo_venta.unwrap_or_default()).unwrap_or("Factura"),
        factura.id,
        fecha::display(factura.fecha),
        cliente.map(|c| c.nombre.clone()).unwrap_or_default(),
        factura.detalle.as_deref(),
    )
    .with_detail("Documento", cliente.map(Cliente::documento).unwrap_or_default())
    .with_detail("Forma de pago", TIPOS_PAGO.label_or_empty(factura.tipo_pago))
    .with_detail(
        "Descuento",
        factura.descuento.map(|d| format!("{}%", d.normalize())).unwrap_or_default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::{state, FakeApi};
    use rust_decimal::Decimal;
    use serde_json::json;
    use std::sync::Arc;

    fn factura() -> Value {
        json!({
            "id": 40,
            "fecha": "2024-05-02",
            "cliente_id": 8,
            "tipo_venta": 1,
            "tipo_pago": 1,
            "descuento": 10,
            "detalle": [{ "descripcion": "Látex 20L", "cantidad": 1, "precio": 250 }]
        })
    }

    #[test]
    fn test_document_ignores_discount_in_totals() {
        let factura: Factura = serde_json::from_value(factura()).unwrap();
        let doc = document(&factura, None);
        assert_eq!(doc.titulo, "Factura A");
        assert_eq!(doc.totales.total, Decimal::new(3025, 1));
        assert!(doc.detalles.contains(&("Descuento", "10%".to_string())));
        assert_eq!(doc.filas[0].total, Decimal::from(303));
    }

    #[tokio::test]
    async fn test_rows_resolve_client_names() {
        let api = FakeApi::with("facturas", vec![factura()]);
        api.insert("clientes", vec![json!({ "id": 8, "nombre": "Juan Pérez" })]);
        let state = state(Arc::new(api));

        let facturas = load_list::<Factura>(&state, "tok", false).await.unwrap();
        let rows = rows(&state, "tok", &facturas).await.unwrap();
        assert_eq!(rows[0].cliente, "Juan Pérez");
        assert_eq!(rows[0].tipo_pago, "Efectivo");
    }

    #[tokio::test]
    async fn test_invoice_without_date_keeps_list_loading() {
        let mut sin_fecha = factura();
        sin_fecha["id"] = json!(41);
        sin_fecha["fecha"] = Value::Null;
        let api = FakeApi::with("facturas", vec![factura(), sin_fecha]);
        api.insert("clientes", vec![]);
        let state = state(Arc::new(api));

        let facturas = load_list::<Factura>(&state, "tok", false).await.unwrap();
        assert_eq!(facturas.len(), 2);
        assert_eq!(facturas[1].fecha, None);

        let ordenadas = apply_filters(
            &facturas,
            &FacturaFilters { orden: Some("fecha".to_string()), ..Default::default() },
        );
        assert_eq!(ordenadas.iter().map(|f| f.id).collect::<Vec<_>>(), vec![41, 40]);

        let rows = rows(&state, "tok", &facturas).await.unwrap();
        assert_eq!(rows[1].fecha, "");
        assert_eq!(document(&facturas[1], None).fecha, "");
    }

    #[test]
    fn test_rendered_document_contains_totals() {
        let factura: Factura = serde_json::from_value(factura()).unwrap();
        let Html(html) = render_document(document(&factura, None)).unwrap();
        assert!(html.contains("Factura A"));
        assert!(html.contains("Látex 20L"));
        assert!(html.contains("302.5"));
    }
}
