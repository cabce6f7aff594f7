use chrono::{DateTime, Utc};

use super::session::{SessionContext, SessionStore};
use crate::{error::AppError, utils::is_authorized};

pub const ROL_ADMINISTRADOR: &str = "ADMINISTRADOR";
pub const ROL_COMPRADOR: &str = "COMPRADOR";
pub const ROL_VENDEDOR: &str = "VENDEDOR";

/// Role literal the purchasing guard compares against. Stored roles are
/// upper case, so a `COMPRADOR` session does not pass this guard.
pub const ROL_GUARDIA_COMPRAS: &str = "Comprador";

/// Any valid session. Only reads the store.
pub fn require_auth(store: &impl SessionStore, now: DateTime<Utc>) -> Result<SessionContext, AppError> {
    let session = SessionContext::load(store);
    if is_authorized(&session, None, now) {
        Ok(session)
    } else {
        log::warn!("acceso denegado: sesión ausente o vencida");
        Err(AppError::Unauthorized)
    }
}

/// Administrator only. A denial wipes token, role and expiration from the
/// store before returning, so the user has to log in again.
pub fn require_admin(store: &impl SessionStore, now: DateTime<Utc>) -> Result<SessionContext, AppError> {
    let session = SessionContext::load(store);
    if is_authorized(&session, Some(ROL_ADMINISTRADOR), now) {
        Ok(session)
    } else {
        log::warn!(
            "acceso de administrador denegado para rol {:?}; se limpia la sesión",
            session.rol
        );
        SessionContext::clear_credentials(store);
        Err(AppError::Unauthorized)
    }
}

/// Exact role match. Only reads the store.
pub fn require_role(
    store: &impl SessionStore,
    role: &str,
    now: DateTime<Utc>,
) -> Result<SessionContext, AppError> {
    let session = SessionContext::load(store);
    if is_authorized(&session, Some(role), now) {
        Ok(session)
    } else {
        log::warn!("acceso denegado: se requiere rol {} y la sesión tiene {:?}", role, session.rol);
        Err(AppError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::session::{MemoryStore, EXPIRACION_KEY, ROL_KEY, TOKEN_KEY};
    use chrono::Duration;

    fn store(token: &str, rol: &str, expiracion: DateTime<Utc>) -> MemoryStore {
        let store = MemoryStore::default();
        store.write(TOKEN_KEY, token);
        store.write(ROL_KEY, rol);
        store.write(EXPIRACION_KEY, &expiracion.to_rfc3339());
        store
    }

    #[test]
    fn test_admin_gate_clears_session_on_expired_token() {
        let now = Utc::now();
        let s = store("x", ROL_ADMINISTRADOR, now - Duration::hours(1));

        assert!(matches!(require_admin(&s, now), Err(AppError::Unauthorized)));
        assert_eq!(s.read(TOKEN_KEY), None);
        assert_eq!(s.read(ROL_KEY), None);
        assert_eq!(s.read(EXPIRACION_KEY), None);
    }

    #[test]
    fn test_admin_gate_clears_session_of_other_roles() {
        let now = Utc::now();
        let s = store("x", ROL_VENDEDOR, now + Duration::hours(1));
        assert!(require_admin(&s, now).is_err());
        assert_eq!(s.read(TOKEN_KEY), None);
    }

    #[test]
    fn test_auth_gate_never_clears() {
        let now = Utc::now();
        let s = store("x", ROL_VENDEDOR, now - Duration::hours(1));

        assert!(require_auth(&s, now).is_err());
        assert!(require_auth(&s, now).is_err());
        assert_eq!(s.read(TOKEN_KEY).as_deref(), Some("x"));
        assert_eq!(s.read(ROL_KEY).as_deref(), Some(ROL_VENDEDOR));
    }

    #[test]
    fn test_admin_gate_passes_valid_admin() {
        let now = Utc::now();
        let s = store("x", ROL_ADMINISTRADOR, now + Duration::hours(1));
        let session = require_admin(&s, now).unwrap();
        assert_eq!(session.rol.as_deref(), Some(ROL_ADMINISTRADOR));
        assert_eq!(s.read(TOKEN_KEY).as_deref(), Some("x"));
    }

    #[test]
    fn test_purchasing_guard_casing_rejects_stored_comprador() {
        let now = Utc::now();
        let s = store("x", ROL_COMPRADOR, now + Duration::hours(1));

        assert_ne!(ROL_GUARDIA_COMPRAS, ROL_COMPRADOR);
        assert!(require_role(&s, ROL_GUARDIA_COMPRAS, now).is_err());
        assert!(require_role(&s, ROL_COMPRADOR, now).is_ok());
        assert_eq!(s.read(TOKEN_KEY).as_deref(), Some("x"));
    }
}
