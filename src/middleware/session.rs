use serde::{Deserialize, Serialize};
#[cfg(test)]
use std::collections::HashMap;
#[cfg(test)]
use std::sync::Mutex;
use tower_cookies::{Cookie, Cookies, Key};

pub const TOKEN_KEY: &str = "token";
pub const ROL_KEY: &str = "rol";
pub const EXPIRACION_KEY: &str = "expiracion";
pub const USUARIO_KEY: &str = "usuario";

/// Synchronous key-value storage for the session. A missing key reads as `None`.
pub trait SessionStore {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// Session kept in signed HTTP-only cookies on the browser. Cookies with a
/// missing or bad signature read as absent.
pub struct CookieStore<'a> {
    cookies: &'a Cookies,
    key: &'a Key,
    max_age: time::Duration,
}

impl<'a> CookieStore<'a> {
    pub fn new(cookies: &'a Cookies, key: &'a Key) -> Self {
        Self {
            cookies,
            key,
            max_age: time::Duration::hours(24),
        }
    }

    pub fn with_max_age_hours(mut self, hours: i64) -> Self {
        self.max_age = time::Duration::hours(hours);
        self
    }
}

impl SessionStore for CookieStore<'_> {
    fn read(&self, key: &str) -> Option<String> {
        self.cookies.signed(self.key).get(key).map(|c| c.value().to_string())
    }

    fn write(&self, key: &str, value: &str) {
        let cookie = Cookie::build((key.to_string(), value.to_string()))
            .path("/")
            .http_only(true)
            .max_age(self.max_age)
            .build();
        self.cookies.signed(self.key).add(cookie);
    }

    fn remove(&self, key: &str) {
        let mut cookie = Cookie::from(key.to_string());
        cookie.set_path("/");
        self.cookies.signed(self.key).remove(cookie);
    }
}

#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

#[cfg(test)]
impl SessionStore for MemoryStore {
    fn read(&self, key: &str) -> Option<String> {
        self.values.lock().ok()?.get(key).cloned()
    }

    fn write(&self, key: &str, value: &str) {
        if let Ok(mut values) = self.values.lock() {
            values.insert(key.to_string(), value.to_string());
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut values) = self.values.lock() {
            values.remove(key);
        }
    }
}

/// Session triple plus the opaque user object returned at login.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionContext {
    pub token: Option<String>,
    pub rol: Option<String>,
    pub expiracion: Option<String>,
    pub usuario: Option<serde_json::Value>,
}

impl SessionContext {
    pub fn load(store: &impl SessionStore) -> Self {
        Self {
            token: store.read(TOKEN_KEY),
            rol: store.read(ROL_KEY),
            expiracion: store.read(EXPIRACION_KEY),
            usuario: store
                .read(USUARIO_KEY)
                .and_then(|raw| urlencoding::decode(&raw).ok().map(|s| s.into_owned()))
                .and_then(|json| serde_json::from_str(&json).ok()),
        }
    }

    pub fn save(&self, store: &impl SessionStore) {
        let pairs = [
            (TOKEN_KEY, &self.token),
            (ROL_KEY, &self.rol),
            (EXPIRACION_KEY, &self.expiracion),
        ];
        for (key, value) in pairs {
            match value {
                Some(value) => store.write(key, value),
                None => store.remove(key),
            }
        }
        match &self.usuario {
            Some(usuario) => store.write(USUARIO_KEY, &urlencoding::encode(&usuario.to_string())),
            None => store.remove(USUARIO_KEY),
        }
    }

    /// Drops the token, role and expiration. The user object stays.
    pub fn clear_credentials(store: &impl SessionStore) {
        store.remove(TOKEN_KEY);
        store.remove(ROL_KEY);
        store.remove(EXPIRACION_KEY);
    }

    pub fn clear(store: &impl SessionStore) {
        Self::clear_credentials(store);
        store.remove(USUARIO_KEY);
    }

    pub fn token(&self) -> &str {
        self.token.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_round_trip_user_object() {
        let store = MemoryStore::default();
        let session = SessionContext {
            token: Some("abc.def.ghi".into()),
            rol: Some("VENDEDOR".into()),
            expiracion: Some("2030-01-01T00:00:00+00:00".into()),
            usuario: Some(serde_json::json!({ "id": 3, "nombre": "Lucía, ventas" })),
        };
        session.save(&store);
        assert_eq!(SessionContext::load(&store), session);
    }

    #[test]
    fn test_clear_credentials_keeps_user() {
        let store = MemoryStore::default();
        store.write(TOKEN_KEY, "t");
        store.write(ROL_KEY, "ADMINISTRADOR");
        store.write(EXPIRACION_KEY, "2030-01-01T00:00:00+00:00");
        store.write(USUARIO_KEY, "%7B%7D");

        SessionContext::clear_credentials(&store);
        let session = SessionContext::load(&store);
        assert_eq!(session.token, None);
        assert_eq!(session.rol, None);
        assert_eq!(session.expiracion, None);
        assert_eq!(session.usuario, Some(serde_json::json!({})));
    }
}
