use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect},
};
use askama::Template;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use serde_json::Value;
use tower_cookies::Cookies;

use super::store;
use crate::{
    api::{LoginRequest, LoginResponse},
    error::AppError,
    middleware::SessionContext,
    state::AppState,
    utils::token_expiration,
};

#[derive(Template)]
#[template(path = "login.html")]
struct LoginTemplate {
    error: String,
}

#[derive(Deserialize)]
pub struct LoginForm {
    email: String,
    password: String,
}

fn render_login(error: &str) -> Result<Html<String>, AppError> {
    let template = LoginTemplate {
        error: error.to_string(),
    };
    template
        .render()
        .map(Html)
        .map_err(|e| AppError::Render(e.to_string()))
}

pub async fn login_page() -> Result<Html<String>, AppError> {
    render_login("")
}

pub async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    Form(form): Form<LoginForm>,
) -> Result<impl IntoResponse, AppError> {
    let credentials = LoginRequest {
        email: form.email,
        password: form.password,
    };

    match state.api.login(&credentials).await {
        Ok(response) => {
            let session = session_from_login(response, Utc::now(), state.session_hours);
            session.save(&store(&cookies, &state));
            log::info!("inicio de sesión de {} con rol {:?}", credentials.email, session.rol);
            Ok(Redirect::to("/dashboard").into_response())
        }
        Err(err) => {
            log::warn!("inicio de sesión rechazado para {}: {}", credentials.email, err);
            Ok((StatusCode::UNAUTHORIZED, render_login("Email o contraseña incorrectos")?).into_response())
        }
    }
}

pub async fn logout(State(state): State<AppState>, cookies: Cookies) -> impl IntoResponse {
    let sesion = store(&cookies, &state);
    if let Some(token) = SessionContext::load(&sesion).token {
        state.cache.forget(&token);
    }
    SessionContext::clear(&sesion);
    Redirect::to("/login")
}

/// Builds the stored session from a login answer.
///
/// The expiration comes from the answer when present, then from the token's
/// `exp` claim, and finally defaults to `session_hours` from now. The role
/// falls back to the one carried by the user object.
pub fn session_from_login(response: LoginResponse, now: DateTime<Utc>, session_hours: i64) -> SessionContext {
    let expiracion = match response.expiracion {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => token_expiration(&response.token)
            .unwrap_or_else(|| now + Duration::hours(session_hours))
            .to_rfc3339(),
    };

    let rol = response.rol.or_else(|| {
        response
            .usuario
            .as_ref()
            .and_then(|u| u.get("rol"))
            .and_then(Value::as_str)
            .map(str::to_string)
    });

    SessionContext {
        token: Some(response.token),
        rol,
        expiracion: Some(expiracion),
        usuario: response.usuario,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::parse_expiration;
    use serde_json::json;

    fn response(expiracion: Option<Value>) -> LoginResponse {
        LoginResponse {
            token: "not-a-jwt".into(),
            rol: None,
            expiracion,
            usuario: Some(json!({ "id": 3, "nombre": "Ana", "rol": "VENDEDOR" })),
        }
    }

    #[test]
    fn test_expiration_from_response_is_kept() {
        let session = session_from_login(response(Some(json!("2030-01-01T00:00:00Z"))), Utc::now(), 24);
        assert_eq!(session.expiracion.as_deref(), Some("2030-01-01T00:00:00Z"));

        let session = session_from_login(response(Some(json!(1893456000000_i64))), Utc::now(), 24);
        assert_eq!(session.expiracion.as_deref(), Some("1893456000000"));
    }

    #[test]
    fn test_missing_expiration_defaults_to_session_hours() {
        let now = Utc::now();
        let session = session_from_login(response(None), now, 8);
        let expiracion = parse_expiration(session.expiracion.as_deref().unwrap()).unwrap();
        assert_eq!(expiracion.timestamp(), (now + Duration::hours(8)).timestamp());
    }

    #[test]
    fn test_role_falls_back_to_user_object() {
        let session = session_from_login(response(None), Utc::now(), 24);
        assert_eq!(session.rol.as_deref(), Some("VENDEDOR"));
        assert_eq!(session.token.as_deref(), Some("not-a-jwt"));
    }
}
