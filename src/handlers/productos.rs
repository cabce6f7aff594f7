use axum::{
    extract::{Path, Query, State},
    response::{Json, Response},
};
use chrono::Utc;
use serde_json::Value;
use tower_cookies::Cookies;

use super::{
    create_and_refresh, csv_download, delete_and_refresh, load_list, load_one, store,
    update_and_refresh, Refetch,
};
use crate::{
    error::AppError,
    filters::{apply_filters, ProductoFilters},
    middleware::{require_admin, require_auth},
    models::{Producto, ProductoDisplay},
    state::AppState,
};

fn display(productos: &[Producto]) -> Vec<ProductoDisplay> {
    productos.iter().map(ProductoDisplay::from).collect()
}

pub async fn list(
    State(state): State<AppState>,
    cookies: Cookies,
    Query(filters): Query<ProductoFilters>,
    Query(refetch): Query<Refetch>,
) -> Result<Json<Vec<ProductoDisplay>>, AppError> {
    let session = require_auth(&store(&cookies, &state), Utc::now())?;
    let productos = load_list::<Producto>(&state, session.token(), refetch.refrescar).await?;
    Ok(Json(display(&apply_filters(&productos, &filters))))
}

pub async fn get(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<i64>,
) -> Result<Json<Producto>, AppError> {
    let session = require_auth(&store(&cookies, &state), Utc::now())?;
    Ok(Json(load_one::<Producto>(&state, session.token(), id).await?))
}

pub async fn export(
    State(state): State<AppState>,
    cookies: Cookies,
    Query(filters): Query<ProductoFilters>,
) -> Result<Response, AppError> {
    let session = require_auth(&store(&cookies, &state), Utc::now())?;
    let productos = load_list::<Producto>(&state, session.token(), false).await?;
    csv_download("productos.csv", &apply_filters(&productos, &filters))
}

pub async fn create(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(body): Json<Value>,
) -> Result<Json<Vec<ProductoDisplay>>, AppError> {
    let session = require_admin(&store(&cookies, &state), Utc::now())?;
    let productos = create_and_refresh::<Producto>(&state, session.token(), body).await?;
    Ok(Json(display(&apply_filters(&productos, &ProductoFilters::default()))))
}

pub async fn update(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Result<Json<Vec<ProductoDisplay>>, AppError> {
    let session = require_admin(&store(&cookies, &state), Utc::now())?;
    let productos = update_and_refresh::<Producto>(&state, session.token(), id, body).await?;
    Ok(Json(display(&apply_filters(&productos, &ProductoFilters::default()))))
}

pub async fn delete(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<i64>,
) -> Result<Json<Vec<ProductoDisplay>>, AppError> {
    let session = require_admin(&store(&cookies, &state), Utc::now())?;
    let productos = delete_and_refresh::<Producto>(&state, session.token(), id).await?;
    Ok(Json(display(&apply_filters(&productos, &ProductoFilters::default()))))
}
