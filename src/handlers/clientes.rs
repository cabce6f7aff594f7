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
    filters::{apply_filters, ClienteFilters},
    middleware::require_auth,
    models::{Cliente, ClienteDisplay},
    state::AppState,
};

// Sellers manage clients, so every route here only needs a session.

fn display(clientes: &[Cliente]) -> Vec<ClienteDisplay> {
    clientes.iter().map(ClienteDisplay::from).collect()
}

pub async fn list(
    State(state): State<AppState>,
    cookies: Cookies,
    Query(filters): Query<ClienteFilters>,
    Query(refetch): Query<Refetch>,
) -> Result<Json<Vec<ClienteDisplay>>, AppError> {
    let session = require_auth(&store(&cookies, &state), Utc::now())?;
    let clientes = load_list::<Cliente>(&state, session.token(), refetch.refrescar).await?;
    Ok(Json(display(&apply_filters(&clientes, &filters))))
}

pub async fn get(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<i64>,
) -> Result<Json<Cliente>, AppError> {
    let session = require_auth(&store(&cookies, &state), Utc::now())?;
    Ok(Json(load_one::<Cliente>(&state, session.token(), id).await?))
}

pub async fn export(
    State(state): State<AppState>,
    cookies: Cookies,
    Query(filters): Query<ClienteFilters>,
) -> Result<Response, AppError> {
    let session = require_auth(&store(&cookies, &state), Utc::now())?;
    let clientes = load_list::<Cliente>(&state, session.token(), false).await?;
    csv_download("clientes.csv", &apply_filters(&clientes, &filters))
}

pub async fn create(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(body): Json<Value>,
) -> Result<Json<Vec<ClienteDisplay>>, AppError> {
    let session = require_auth(&store(&cookies, &state), Utc::now())?;
    let clientes = create_and_refresh::<Cliente>(&state, session.token(), body).await?;
    Ok(Json(display(&apply_filters(&clientes, &ClienteFilters::default()))))
}

pub async fn update(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Result<Json<Vec<ClienteDisplay>>, AppError> {
    let session = require_auth(&store(&cookies, &state), Utc::now())?;
    let clientes = update_and_refresh::<Cliente>(&state, session.token(), id, body).await?;
    Ok(Json(display(&apply_filters(&clientes, &ClienteFilters::default()))))
}

pub async fn delete(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<i64>,
) -> Result<Json<Vec<ClienteDisplay>>, AppError> {
    let session = require_auth(&store(&cookies, &state), Utc::now())?;
    let clientes = delete_and_refresh::<Cliente>(&state, session.token(), id).await?;
    Ok(Json(display(&apply_filters(&clientes, &ClienteFilters::default()))))
}
