use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Redirect, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::{api::ApiError, models::InvalidTransition};

#[derive(Debug, Error)]
pub enum AppError {
    /// No valid session; the browser goes back to the login page.
    #[error("sesión inválida o vencida")]
    Unauthorized,

    #[error("{0} no encontrado")]
    NotFound(String),

    /// Reading from the REST API failed.
    #[error("no se pudo obtener {recurso}: {source}")]
    Upstream {
        recurso: &'static str,
        #[source]
        source: ApiError,
    },

    /// The REST API rejected a create, update, delete or status change.
    /// Nothing local was touched and the action can be retried right away.
    #[error("no se pudo guardar el cambio en {recurso}: {source}")]
    Mutation {
        recurso: &'static str,
        #[source]
        source: ApiError,
    },

    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),

    #[error("ya hay una operación en curso sobre {0}")]
    Busy(String),

    #[error("error al generar la respuesta: {0}")]
    Render(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, retryable) = match &self {
            AppError::Unauthorized => return Redirect::to("/login").into_response(),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, false),
            AppError::Upstream { source, .. } => {
                log::error!("{}", self);
                (status_for(source), true)
            }
            AppError::Mutation { .. } => {
                log::error!("{}", self);
                (StatusCode::BAD_GATEWAY, true)
            }
            AppError::InvalidTransition(_) => (StatusCode::CONFLICT, false),
            AppError::Busy(_) => (StatusCode::CONFLICT, true),
            AppError::Render(_) => {
                log::error!("{}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, false)
            }
        };

        let body = json!({
            "error": self.to_string(),
            "reintentable": retryable,
        });
        (status, Json(body)).into_response()
    }
}

fn status_for(source: &ApiError) -> StatusCode {
    match source {
        ApiError::Status { status: 404, .. } => StatusCode::NOT_FOUND,
        _ => StatusCode::BAD_GATEWAY,
    }
}
