use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_cookies::Cookies;

use super::{
    create_and_refresh, delete_and_refresh, load_list, load_one, store, update_and_refresh,
    Refetch,
};
use crate::{
    error::AppError,
    filters::{apply_filters, lenient, MargenFilters},
    middleware::require_admin,
    models::Margen,
    state::AppState,
};

pub async fn list(
    State(state): State<AppState>,
    cookies: Cookies,
    Query(filters): Query<MargenFilters>,
    Query(refetch): Query<Refetch>,
) -> Result<Json<Vec<Margen>>, AppError> {
    let session = require_admin(&store(&cookies, &state), Utc::now())?;
    let margenes = load_list::<Margen>(&state, session.token(), refetch.refrescar).await?;
    Ok(Json(apply_filters(&margenes, &filters)))
}

pub async fn create(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(body): Json<Value>,
) -> Result<Json<Vec<Margen>>, AppError> {
    let session = require_admin(&store(&cookies, &state), Utc::now())?;
    let margenes = create_and_refresh::<Margen>(&state, session.token(), body).await?;
    Ok(Json(apply_filters(&margenes, &MargenFilters::default())))
}

pub async fn update(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Result<Json<Vec<Margen>>, AppError> {
    let session = require_admin(&store(&cookies, &state), Utc::now())?;
    let margenes = update_and_refresh::<Margen>(&state, session.token(), id, body).await?;
    Ok(Json(apply_filters(&margenes, &MargenFilters::default())))
}

pub async fn delete(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Margen>>, AppError> {
    let session = require_admin(&store(&cookies, &state), Utc::now())?;
    let margenes = delete_and_refresh::<Margen>(&state, session.token(), id).await?;
    Ok(Json(apply_filters(&margenes, &MargenFilters::default())))
}

#[derive(Debug, Deserialize)]
pub struct Simulacion {
    #[serde(default, deserialize_with = "lenient")]
    pub costo: Option<Decimal>,
}

#[derive(Debug, Serialize)]
pub struct PrecioSimulado {
    pub margen: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub costo: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub precio_venta: Decimal,
}

/// Sale price for a cost under one margin.
pub async fn simulate(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<i64>,
    Query(simulacion): Query<Simulacion>,
) -> Result<Json<PrecioSimulado>, AppError> {
    let session = require_admin(&store(&cookies, &state), Utc::now())?;
    let margen = load_one::<Margen>(&state, session.token(), id).await?;
    let costo = simulacion.costo.unwrap_or_default();
    Ok(Json(PrecioSimulado {
        precio_venta: margen.sale_price(costo),
        margen: margen.nombre,
        costo,
    }))
}
