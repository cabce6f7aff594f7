use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, RwLock};
use tower_cookies::Key;

use crate::{api::RestApi, config::Config};

#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn RestApi>,
    pub cache: Arc<ListCache>,
    pub in_flight: Arc<InFlight>,
    pub session_hours: i64,
    /// Signs the session cookies so the browser cannot forge them.
    pub cookie_key: Key,
}

impl AppState {
    pub fn new(api: Arc<dyn RestApi>, config: &Config) -> Self {
        Self {
            api,
            cache: Arc::new(ListCache::default()),
            in_flight: Arc::new(InFlight::default()),
            session_hours: config.session_hours,
            cookie_key: cookie_key(config.session_secret.as_deref()),
        }
    }
}

fn cookie_key(secret: Option<&str>) -> Key {
    match secret.map(|s| Key::try_from(s.as_bytes())) {
        Some(Ok(key)) => key,
        Some(Err(e)) => {
            log::warn!("SESSION_SECRET inválido ({:?}); se usa una clave aleatoria", e);
            Key::generate()
        }
        None => {
            log::warn!("SESSION_SECRET no definido; las sesiones no sobreviven a un reinicio");
            Key::generate()
        }
    }
}

/// Latest list fetched per session token and resource. Entries change only
/// on an explicit refetch or when a successful mutation invalidates them.
#[derive(Default)]
pub struct ListCache {
    entries: RwLock<HashMap<String, HashMap<&'static str, Arc<Vec<Value>>>>>,
}

impl ListCache {
    pub fn get(&self, token: &str, resource: &'static str) -> Option<Arc<Vec<Value>>> {
        self.entries.read().ok()?.get(token)?.get(resource).cloned()
    }

    pub fn put(&self, token: &str, resource: &'static str, values: Vec<Value>) -> Arc<Vec<Value>> {
        let values = Arc::new(values);
        if let Ok(mut entries) = self.entries.write() {
            entries
                .entry(token.to_string())
                .or_default()
                .insert(resource, Arc::clone(&values));
        }
        values
    }

    /// Drops `resource` for every session; the backend data changed for all of them.
    pub fn invalidate(&self, resource: &'static str) {
        if let Ok(mut entries) = self.entries.write() {
            for lists in entries.values_mut() {
                lists.remove(resource);
            }
        }
    }

    /// Forgets everything cached for a session that ended.
    pub fn forget(&self, token: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.remove(token);
        }
    }
}

/// Mutations currently waiting on the API, keyed by resource and id.
#[derive(Default)]
pub struct InFlight {
    keys: Mutex<HashSet<(&'static str, i64)>>,
}

impl InFlight {
    /// `None` when the same target already has a mutation outstanding.
    pub fn begin(self: &Arc<Self>, resource: &'static str, id: i64) -> Option<InFlightGuard> {
        let mut keys = self.keys.lock().ok()?;
        if !keys.insert((resource, id)) {
            return None;
        }
        Some(InFlightGuard {
            owner: Arc::clone(self),
            key: (resource, id),
        })
    }
}

/// Releases the key when the request finishes, success or not.
pub struct InFlightGuard {
    owner: Arc<InFlight>,
    key: (&'static str, i64),
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if let Ok(mut keys) = self.owner.keys.lock() {
            keys.remove(&self.key);
        }
    }
}
