pub mod auth;
pub mod clientes;
pub mod facturas;
pub mod margenes;
pub mod notas_pedido;
pub mod productos;
pub mod proveedores;
pub mod usuarios;

use axum::{
    extract::State,
    http::{
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
        StatusCode,
    },
    response::{Html, IntoResponse, Json, Response},
};
use askama::Template;
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_cookies::Cookies;

use crate::{
    api::{ApiError, Entity},
    error::AppError,
    filters::flag,
    middleware::{require_auth, CookieStore, ROL_ADMINISTRADOR, ROL_COMPRADOR, ROL_VENDEDOR},
    models::{catalogos::all_catalogs, Catalogo, DocumentoImpresion, EstadoNP, Factura, NotaPedido, Producto},
    state::AppState,
    utils::rows_to_csv,
};

/// `?refrescar=true` forces a new fetch instead of the cached list.
#[derive(Debug, Default, Deserialize)]
pub struct Refetch {
    #[serde(default, deserialize_with = "flag")]
    pub refrescar: bool,
}

#[derive(Template)]
#[template(path = "documentos/documento.html")]
struct DocumentoTemplate {
    doc: DocumentoImpresion,
}

#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub productos_activos: usize,
    pub productos_bajo_minimo: usize,
    pub notas_pendientes: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub facturado: Decimal,
}

pub async fn dashboard(
    State(state): State<AppState>,
    cookies: Cookies,
) -> Result<Json<DashboardSummary>, AppError> {
    let session = require_auth(&store(&cookies, &state), Utc::now())?;
    let token = session.token();

    let productos = load_list::<Producto>(&state, token, false).await?;
    let notas = load_list::<NotaPedido>(&state, token, false).await?;
    let facturas = load_list::<Factura>(&state, token, false).await?;

    Ok(Json(summarize(&productos, &notas, &facturas)))
}

pub fn summarize(productos: &[Producto], notas: &[NotaPedido], facturas: &[Factura]) -> DashboardSummary {
    let activos: Vec<&Producto> = productos.iter().filter(|p| p.estado != Some(false)).collect();
    DashboardSummary {
        productos_activos: activos.len(),
        productos_bajo_minimo: activos.iter().filter(|p| p.below_minimum()).count(),
        notas_pendientes: notas.iter().filter(|n| !n.estado.is_terminal()).count(),
        facturado: facturas
            .iter()
            .try_fold(Decimal::ZERO, |acc, f| acc.checked_add(f.totals().total))
            .unwrap_or_else(|| {
                log::warn!("total facturado fuera de rango; se muestra en cero");
                Decimal::ZERO
            }),
    }
}

#[derive(Debug, Serialize)]
pub struct CatalogosResponse {
    pub catalogos: Vec<Catalogo>,
    pub roles: [&'static str; 3],
    pub estados_nota_pedido: Vec<(EstadoNP, &'static str)>,
}

pub async fn catalogos(
    State(state): State<AppState>,
    cookies: Cookies,
) -> Result<Json<CatalogosResponse>, AppError> {
    require_auth(&store(&cookies, &state), Utc::now())?;
    Ok(Json(CatalogosResponse {
        catalogos: all_catalogs(),
        roles: [ROL_ADMINISTRADOR, ROL_COMPRADOR, ROL_VENDEDOR],
        estados_nota_pedido: EstadoNP::ALL.iter().map(|e| (*e, e.label())).collect(),
    }))
}

pub(crate) fn store<'a>(cookies: &'a Cookies, state: &'a AppState) -> CookieStore<'a> {
    CookieStore::new(cookies, &state.cookie_key).with_max_age_hours(state.session_hours)
}

/// Cached list of `T` for this session, fetched when absent or when `refetch` is set.
pub(crate) async fn load_list<T: Entity>(
    state: &AppState,
    token: &str,
    refetch: bool,
) -> Result<Vec<T>, AppError> {
    let values = match state.cache.get(token, T::RESOURCE) {
        Some(values) if !refetch => values,
        _ => {
            let fetched = state
                .api
                .list(token, T::RESOURCE)
                .await
                .map_err(|source| AppError::Upstream { recurso: T::RESOURCE, source })?;
            state.cache.put(token, T::RESOURCE, fetched)
        }
    };

    values
        .iter()
        .map(|v| serde_json::from_value(v.clone()))
        .collect::<Result<Vec<T>, _>>()
        .map_err(|e| AppError::Upstream {
            recurso: T::RESOURCE,
            source: ApiError::Decode(e),
        })
}

pub(crate) async fn load_one<T: Entity>(state: &AppState, token: &str, id: i64) -> Result<T, AppError> {
    match crate::api::get_one::<T>(state.api.as_ref(), token, id).await {
        Ok(record) => Ok(record),
        Err(ApiError::Status { status: 404, .. }) => Err(AppError::NotFound(format!("{} {}", T::RESOURCE, id))),
        Err(source) => Err(AppError::Upstream { recurso: T::RESOURCE, source }),
    }
}

fn mutation_error<T: Entity>(source: ApiError) -> AppError {
    AppError::Mutation { recurso: T::RESOURCE, source }
}

fn busy<T: Entity>(id: i64) -> AppError {
    AppError::Busy(format!("{} {}", T::RESOURCE, id))
}

/// Creates through the API, then drops the cached list and refetches it.
pub(crate) async fn create_and_refresh<T: Entity>(
    state: &AppState,
    token: &str,
    body: Value,
) -> Result<Vec<T>, AppError> {
    let created = state
        .api
        .create(token, T::RESOURCE, body)
        .await
        .map_err(mutation_error::<T>)?;
    log::info!("{} creado: {}", T::RESOURCE, created.get("id").unwrap_or(&Value::Null));

    state.cache.invalidate(T::RESOURCE);
    load_list::<T>(state, token, true).await
}

pub(crate) async fn update_and_refresh<T: Entity>(
    state: &AppState,
    token: &str,
    id: i64,
    body: Value,
) -> Result<Vec<T>, AppError> {
    let _guard = state.in_flight.begin(T::RESOURCE, id).ok_or_else(|| busy::<T>(id))?;
    state
        .api
        .update(token, T::RESOURCE, id, body)
        .await
        .map_err(mutation_error::<T>)?;
    log::info!("{} {} actualizado", T::RESOURCE, id);

    state.cache.invalidate(T::RESOURCE);
    load_list::<T>(state, token, true).await
}

pub(crate) async fn delete_and_refresh<T: Entity>(
    state: &AppState,
    token: &str,
    id: i64,
) -> Result<Vec<T>, AppError> {
    let _guard = state.in_flight.begin(T::RESOURCE, id).ok_or_else(|| busy::<T>(id))?;
    state
        .api
        .delete(token, T::RESOURCE, id)
        .await
        .map_err(mutation_error::<T>)?;
    log::info!("{} {} eliminado", T::RESOURCE, id);

    state.cache.invalidate(T::RESOURCE);
    load_list::<T>(state, token, true).await
}

/// CSV attachment, or 204 when there is nothing to export.
pub(crate) fn csv_download<T: Serialize>(filename: &str, rows: &[T]) -> Result<Response, AppError> {
    let csv = rows_to_csv(rows).map_err(|e| AppError::Render(e.to_string()))?;
    let Some(text) = csv else {
        return Ok(StatusCode::NO_CONTENT.into_response());
    };

    let disposition = format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        filename,
        urlencoding::encode(filename)
    );
    let headers = [
        (CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
        (CONTENT_DISPOSITION, disposition),
    ];
    Ok((headers, text).into_response())
}

pub(crate) fn render_document(doc: DocumentoImpresion) -> Result<Html<String>, AppError> {
    let template = DocumentoTemplate { doc };
    template
        .render()
        .map(Html)
        .map_err(|e| AppError::Render(e.to_string()))
}


#[cfg(test)]
mod tests {
    use super::test_support::{state, FakeApi};
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    fn producto_json() -> Value {
        json!({
            "id": 5,
            "nombre": "Pintura 15L Mate Blanco Látex Interior",
            "precio": 1500,
            "stockminimo": 20,
            "stock": 0,
            "estado": true
        })
    }

    #[tokio::test]
    async fn test_list_is_cached_until_refetch() {
        let api = Arc::new(FakeApi::with("productos", vec![producto_json()]));
        let state = state(api.clone());

        load_list::<Producto>(&state, "tok", false).await.unwrap();
        load_list::<Producto>(&state, "tok", false).await.unwrap();
        assert_eq!(api.lists(), 1);

        load_list::<Producto>(&state, "tok", true).await.unwrap();
        assert_eq!(api.lists(), 2);
    }

    #[tokio::test]
    async fn test_failed_delete_leaves_list_untouched() {
        let api = Arc::new(FakeApi::with("productos", vec![producto_json()]));
        let state = state(api.clone());

        let before = load_list::<Producto>(&state, "tok", false).await.unwrap();
        api.fail_mutations(true);
        let result = delete_and_refresh::<Producto>(&state, "tok", 5).await;
        assert!(matches!(result, Err(AppError::Mutation { recurso: "productos", .. })));

        let after = load_list::<Producto>(&state, "tok", false).await.unwrap();
        assert_eq!(before, after);
        assert_eq!(api.lists(), 1);
        assert!(state.in_flight.begin("productos", 5).is_some());
    }

    #[tokio::test]
    async fn test_successful_delete_refetches() {
        let api = Arc::new(FakeApi::with("productos", vec![producto_json()]));
        let state = state(api.clone());

        load_list::<Producto>(&state, "tok", false).await.unwrap();
        let after = delete_and_refresh::<Producto>(&state, "tok", 5).await.unwrap();
        assert!(after.is_empty());
        assert_eq!(api.lists(), 2);
    }

    #[tokio::test]
    async fn test_second_mutation_on_same_target_is_busy() {
        let api = Arc::new(FakeApi::with("productos", vec![producto_json()]));
        let state = state(api);

        let _held = state.in_flight.begin("productos", 5).unwrap();
        let result = delete_and_refresh::<Producto>(&state, "tok", 5).await;
        assert!(matches!(result, Err(AppError::Busy(_))));
    }

    #[tokio::test]
    async fn test_csv_download_headers_and_empty_set() {
        let productos: Vec<Producto> = vec![serde_json::from_value(producto_json()).unwrap()];
        let response = csv_download("productos.csv", &productos).unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()[CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .starts_with("attachment; filename=\"productos.csv\""));

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(
            String::from_utf8(body.to_vec()).unwrap(),
            "id,nombre,precio,stockminimo,stock,estado\r\n5,\"Pintura 15L Mate Blanco Látex Interior\",1500,20,0,true"
        );

        let empty: Vec<Producto> = Vec::new();
        assert_eq!(csv_download("productos.csv", &empty).unwrap().status(), StatusCode::NO_CONTENT);
    }

    #[test]
    fn test_summary_counts() {
        let productos: Vec<Producto> = serde_json::from_value(json!([
            { "id": 1, "nombre": "A", "stock": 2, "stockminimo": 5 },
            { "id": 2, "nombre": "B", "stock": 9, "stockminimo": 5 },
            { "id": 3, "nombre": "C", "stock": 0, "stockminimo": 5, "estado": false }
        ]))
        .unwrap();
        let notas: Vec<NotaPedido> = serde_json::from_value(json!([
            { "id": 1, "fecha": "2024-04-01", "estado": "PEND_ENTREGA" },
            { "id": 2, "fecha": "2024-04-01", "estado": "CERRADA" }
        ]))
        .unwrap();
        let facturas: Vec<Factura> = serde_json::from_value(json!([
            { "id": 1, "fecha": "2024-05-02", "detalle": [{ "cantidad": 2, "precio": 100 }, { "cantidad": 1, "precio": 50 }] }
        ]))
        .unwrap();

        let summary = summarize(&productos, &notas, &facturas);
        assert_eq!(summary.productos_activos, 2);
        assert_eq!(summary.productos_bajo_minimo, 1);
        assert_eq!(summary.notas_pendientes, 1);
        assert_eq!(summary.facturado, Decimal::new(3025, 1));
    }
}
