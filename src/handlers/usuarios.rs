use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use chrono::Utc;
use serde_json::Value;
use tower_cookies::Cookies;

use super::{
    create_and_refresh, delete_and_refresh, load_list, load_one, store, update_and_refresh,
    Refetch,
};
use crate::{
    error::AppError,
    filters::{apply_filters, UsuarioFilters},
    middleware::require_admin,
    models::{Usuario, UsuarioDisplay},
    state::AppState,
};

fn display(usuarios: &[Usuario]) -> Vec<UsuarioDisplay> {
    usuarios.iter().map(UsuarioDisplay::from).collect()
}

pub async fn list(
    State(state): State<AppState>,
    cookies: Cookies,
    Query(filters): Query<UsuarioFilters>,
    Query(refetch): Query<Refetch>,
) -> Result<Json<Vec<UsuarioDisplay>>, AppError> {
    let session = require_admin(&store(&cookies, &state), Utc::now())?;
    let usuarios = load_list::<Usuario>(&state, session.token(), refetch.refrescar).await?;
    Ok(Json(display(&apply_filters(&usuarios, &filters))))
}

pub async fn get(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<i64>,
) -> Result<Json<Usuario>, AppError> {
    let session = require_admin(&store(&cookies, &state), Utc::now())?;
    Ok(Json(load_one::<Usuario>(&state, session.token(), id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(body): Json<Value>,
) -> Result<Json<Vec<UsuarioDisplay>>, AppError> {
    let session = require_admin(&store(&cookies, &state), Utc::now())?;
    let usuarios = create_and_refresh::<Usuario>(&state, session.token(), body).await?;
    Ok(Json(display(&apply_filters(&usuarios, &UsuarioFilters::default()))))
}

pub async fn update(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Result<Json<Vec<UsuarioDisplay>>, AppError> {
    let session = require_admin(&store(&cookies, &state), Utc::now())?;
    let usuarios = update_and_refresh::<Usuario>(&state, session.token(), id, body).await?;
    Ok(Json(display(&apply_filters(&usuarios, &UsuarioFilters::default()))))
}

pub async fn delete(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<i64>,
) -> Result<Json<Vec<UsuarioDisplay>>, AppError> {
    let session = require_admin(&store(&cookies, &state), Utc::now())?;
    let usuarios = delete_and_refresh::<Usuario>(&state, session.token(), id).await?;
    Ok(Json(display(&apply_filters(&usuarios, &UsuarioFilters::default()))))
}
