use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::middleware::SessionContext;

/// The part of the API's token we read. The signature belongs to the API,
/// so it is not checked here.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub exp: Option<i64>,
    #[serde(default)]
    pub iat: Option<i64>,
}

pub fn token_expiration(token: &str) -> Option<DateTime<Utc>> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation).ok()?;
    Utc.timestamp_opt(data.claims.exp?, 0).single()
}

/// Stored expirations are RFC 3339 strings; older sessions hold epoch milliseconds.
pub fn parse_expiration(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date.with_timezone(&Utc));
    }
    raw.parse::<i64>()
        .ok()
        .and_then(|millis| Utc.timestamp_millis_opt(millis).single())
}

/// Access decision for a session: non-empty token, expiration strictly in
/// the future, and, when a role is required, that exact role string.
pub fn is_authorized(session: &SessionContext, required_role: Option<&str>, now: DateTime<Utc>) -> bool {
    if session.token.as_deref().map_or(true, str::is_empty) {
        return false;
    }

    let expires_at = match session.expiracion.as_deref().and_then(parse_expiration) {
        Some(expires_at) => expires_at,
        None => return false,
    };
    if expires_at <= now {
        return false;
    }

    match required_role {
        Some(role) => session.rol.as_deref() == Some(role),
        None => true,
    }
}
