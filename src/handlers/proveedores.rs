use axum::{
    extract::{Path, Query, State},
    response::{Json, Response},
};
use chrono::Utc;
use serde_json::Value;
use std::collections::HashMap;
use tower_cookies::Cookies;

use super::{
    create_and_refresh, csv_download, delete_and_refresh, load_list, load_one, store,
    update_and_refresh, Refetch,
};
use crate::{
    error::AppError,
    filters::{apply_filters, PrecioProveedorFilters, ProveedorFilters},
    middleware::{require_admin, require_auth, require_role, ROL_GUARDIA_COMPRAS},
    models::{PrecioProveedor, PrecioProveedorDisplay, Producto, Proveedor, ProveedorDisplay},
    state::AppState,
};

fn display(proveedores: &[Proveedor]) -> Vec<ProveedorDisplay> {
    proveedores.iter().map(ProveedorDisplay::from).collect()
}

pub async fn list(
    State(state): State<AppState>,
    cookies: Cookies,
    Query(filters): Query<ProveedorFilters>,
    Query(refetch): Query<Refetch>,
) -> Result<Json<Vec<ProveedorDisplay>>, AppError> {
    let session = require_auth(&store(&cookies, &state), Utc::now())?;
    let proveedores = load_list::<Proveedor>(&state, session.token(), refetch.refrescar).await?;
    Ok(Json(display(&apply_filters(&proveedores, &filters))))
}

pub async fn get(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<i64>,
) -> Result<Json<Proveedor>, AppError> {
    let session = require_auth(&store(&cookies, &state), Utc::now())?;
    Ok(Json(load_one::<Proveedor>(&state, session.token(), id).await?))
}

pub async fn export(
    State(state): State<AppState>,
    cookies: Cookies,
    Query(filters): Query<ProveedorFilters>,
) -> Result<Response, AppError> {
    let session = require_auth(&store(&cookies, &state), Utc::now())?;
    let proveedores = load_list::<Proveedor>(&state, session.token(), false).await?;
    csv_download("proveedores.csv", &apply_filters(&proveedores, &filters))
}

pub async fn create(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(body): Json<Value>,
) -> Result<Json<Vec<ProveedorDisplay>>, AppError> {
    let session = require_admin(&store(&cookies, &state), Utc::now())?;
    let proveedores = create_and_refresh::<Proveedor>(&state, session.token(), body).await?;
    Ok(Json(display(&apply_filters(&proveedores, &ProveedorFilters::default()))))
}

pub async fn update(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Result<Json<Vec<ProveedorDisplay>>, AppError> {
    let session = require_admin(&store(&cookies, &state), Utc::now())?;
    let proveedores = update_and_refresh::<Proveedor>(&state, session.token(), id, body).await?;
    Ok(Json(display(&apply_filters(&proveedores, &ProveedorFilters::default()))))
}

pub async fn delete(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<i64>,
) -> Result<Json<Vec<ProveedorDisplay>>, AppError> {
    let session = require_admin(&store(&cookies, &state), Utc::now())?;
    let proveedores = delete_and_refresh::<Proveedor>(&state, session.token(), id).await?;
    Ok(Json(display(&apply_filters(&proveedores, &ProveedorFilters::default()))))
}

/// Supplier price comparison. Guarded by the purchasing role literal, which
/// no stored role matches.
pub async fn comparacion(
    State(state): State<AppState>,
    cookies: Cookies,
    Query(filters): Query<PrecioProveedorFilters>,
    Query(refetch): Query<Refetch>,
) -> Result<Json<Vec<PrecioProveedorDisplay>>, AppError> {
    let session = require_role(&store(&cookies, &state), ROL_GUARDIA_COMPRAS, Utc::now())?;
    let token = session.token();

    let precios = load_list::<PrecioProveedor>(&state, token, refetch.refrescar).await?;
    let productos = load_list::<Producto>(&state, token, false).await?;
    let proveedores = load_list::<Proveedor>(&state, token, false).await?;

    let productos: HashMap<i64, String> = productos.into_iter().map(|p| (p.id, p.nombre)).collect();
    let proveedores: HashMap<i64, String> = proveedores.into_iter().map(|p| (p.id, p.nombre)).collect();

    let rows = PrecioProveedorDisplay::rows(
        &apply_filters(&precios, &filters),
        |id| productos.get(&id).cloned(),
        |id| proveedores.get(&id).cloned(),
    );
    Ok(Json(rows))
}
