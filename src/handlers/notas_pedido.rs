use axum::{
    extract::{Path, Query, State},
    response::{Html, Json, Response},
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use tower_cookies::Cookies;

use super::{
    create_and_refresh, csv_download, load_list, load_one, render_document, store, Refetch,
};
use crate::{
    api::Entity,
    error::AppError,
    filters::{apply_filters, NotaPedidoFilters},
    middleware::require_auth,
    models::{fecha, DocumentoImpresion, EstadoNP, NotaPedido, NotaPedidoDisplay, Proveedor, TIPO_COMPRA},
    state::AppState,
};

async fn rows(state: &AppState, token: &str, notas: &[NotaPedido]) -> Result<Vec<NotaPedidoDisplay>, AppError> {
    let proveedores: HashMap<i64, String> = load_list::<Proveedor>(state, token, false)
        .await?
        .into_iter()
        .map(|p| (p.id, p.nombre))
        .collect();

    Ok(notas
        .iter()
        .map(|n| {
            let proveedor = n.proveedor_id.and_then(|id| proveedores.get(&id)).map(String::as_str);
            NotaPedidoDisplay::new(n, proveedor)
        })
        .collect())
}

pub async fn list(
    State(state): State<AppState>,
    cookies: Cookies,
    Query(filters): Query<NotaPedidoFilters>,
    Query(refetch): Query<Refetch>,
) -> Result<Json<Vec<NotaPedidoDisplay>>, AppError> {
    let session = require_auth(&store(&cookies, &state), Utc::now())?;
    let token = session.token();
    let notas = load_list::<NotaPedido>(&state, token, refetch.refrescar).await?;
    Ok(Json(rows(&state, token, &apply_filters(&notas, &filters)).await?))
}

pub async fn get(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<i64>,
) -> Result<Json<NotaPedido>, AppError> {
    let session = require_auth(&store(&cookies, &state), Utc::now())?;
    Ok(Json(load_one::<NotaPedido>(&state, session.token(), id).await?))
}

pub async fn export(
    State(state): State<AppState>,
    cookies: Cookies,
    Query(filters): Query<NotaPedidoFilters>,
) -> Result<Response, AppError> {
    let session = require_auth(&store(&cookies, &state), Utc::now())?;
    let token = session.token();
    let notas = load_list::<NotaPedido>(&state, token, false).await?;
    let rows = rows(&state, token, &apply_filters(&notas, &filters)).await?;
    csv_download("notas_pedido.csv", &rows)
}

/// New orders always start pending acceptance, whatever the body says.
pub async fn create(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(mut body): Json<Value>,
) -> Result<Json<Vec<NotaPedidoDisplay>>, AppError> {
    let session = require_auth(&store(&cookies, &state), Utc::now())?;
    let token = session.token();
    if let Some(campos) = body.as_object_mut() {
        campos.insert("estado".to_string(), Value::from(EstadoNP::PendAceptacion.to_string()));
    }

    let notas = create_and_refresh::<NotaPedido>(&state, token, body).await?;
    Ok(Json(rows(&state, token, &apply_filters(&notas, &NotaPedidoFilters::default())).await?))
}

#[derive(Debug, Deserialize)]
pub struct CambioEstado {
    pub estado: EstadoNP,
}

pub async fn change_status(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<i64>,
    Json(cambio): Json<CambioEstado>,
) -> Result<Json<Vec<NotaPedidoDisplay>>, AppError> {
    let session = require_auth(&store(&cookies, &state), Utc::now())?;
    let token = session.token();
    let notas = apply_status(&state, token, id, cambio.estado).await?;
    Ok(Json(rows(&state, token, &apply_filters(&notas, &NotaPedidoFilters::default())).await?))
}

/// Moves an order to `next`.
///
/// The transition is checked against the order's current state before the
/// API is called. A rejected call leaves the cached list as it was; a
/// successful one drops it and returns the refetched list.
pub async fn apply_status(
    state: &AppState,
    token: &str,
    id: i64,
    next: EstadoNP,
) -> Result<Vec<NotaPedido>, AppError> {
    let _guard = state
        .in_flight
        .begin(NotaPedido::RESOURCE, id)
        .ok_or_else(|| AppError::Busy(format!("{} {}", NotaPedido::RESOURCE, id)))?;

    let nota = load_one::<NotaPedido>(state, token, id).await?;
    nota.check_transition(next)?;

    state
        .api
        .set_status(token, id, next)
        .await
        .map_err(|source| AppError::Mutation {
            recurso: NotaPedido::RESOURCE,
            source,
        })?;
    log::info!("nota de pedido {} pasó de {} a {}", id, nota.estado, next);

    state.cache.invalidate(NotaPedido::RESOURCE);
    load_list::<NotaPedido>(state, token, true).await
}

pub async fn print(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<i64>,
) -> Result<Html<String>, AppError> {
    let session = require_auth(&store(&cookies, &state), Utc::now())?;
    let token = session.token();
    let nota = load_one::<NotaPedido>(&state, token, id).await?;

    let proveedor = match nota.proveedor_id {
        Some(proveedor_id) => load_list::<Proveedor>(&state, token, false)
            .await?
            .into_iter()
            .find(|p| p.id == proveedor_id),
        None => None,
    };

    render_document(document(&nota, proveedor.as_ref()))
}

pub fn document(nota: &NotaPedido, proveedor: Option<&Proveedor>) -> DocumentoImpresion {
    DocumentoImpresion::new(
        "Nota de Pedido",
        nota.id,
        fecha::display(nota.fecha),
        proveedor.map(|p| p.nombre.clone()).unwrap_or_default(),
        nota.detalle.as_deref(),
    )
    .with_detail("Documento", proveedor.map(Proveedor::documento).unwrap_or_default())
    .with_detail("Vencimiento", fecha::display(nota.vencimiento))
    .with_detail("Tipo de compra", TIPO_COMPRA.label_or_empty(nota.tipo_compra))
    .with_detail("Estado", nota.estado.label())
}
