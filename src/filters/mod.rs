//! Record filter engine shared by every list screen.
//!
//! Each screen owns a criteria struct deserialized from the list request's
//! query string. A criteria value only decides whether a single record passes
//! and, optionally, which column comparator orders the result; visibility of
//! soft-deleted records and the default id ordering are applied here.

pub mod clientes;
pub mod facturas;
pub mod margenes;
pub mod notas_pedido;
pub mod precios_proveedor;
pub mod productos;
pub mod proveedores;
pub mod usuarios;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use std::cmp::Ordering;
use std::str::FromStr;

pub use clientes::ClienteFilters;
pub use facturas::FacturaFilters;
pub use margenes::MargenFilters;
pub use notas_pedido::NotaPedidoFilters;
pub use precios_proveedor::PrecioProveedorFilters;
pub use productos::ProductoFilters;
pub use proveedores::ProveedorFilters;
pub use usuarios::UsuarioFilters;

/// What the engine needs to know about any entity record.
pub trait Record: Clone {
    fn id(&self) -> i64;

    /// Soft-delete flag. `None` means the backend did not send one.
    fn estado(&self) -> Option<bool> {
        None
    }
}

pub type Comparator<R> = fn(&R, &R) -> Ordering;

pub trait Criteria<R: Record> {
    /// Every active predicate of the screen. Inactive ones must return true.
    fn matches(&self, record: &R) -> bool;

    fn show_deleted(&self) -> bool {
        false
    }

    /// Column comparator picked by the screen, if any.
    fn comparator(&self) -> Option<Comparator<R>> {
        None
    }

    fn descending(&self) -> bool {
        false
    }
}

/// Filters and orders `records` without touching the input.
pub fn apply_filters<R, C>(records: &[R], criteria: &C) -> Vec<R>
where
    R: Record,
    C: Criteria<R>,
{
    let mut visibles: Vec<R> = records
        .iter()
        .filter(|r| is_visible(r.estado(), criteria.show_deleted()))
        .filter(|r| criteria.matches(r))
        .cloned()
        .collect();

    match criteria.comparator() {
        Some(cmp) if criteria.descending() => visibles.sort_by(|a, b| cmp(b, a)),
        Some(cmp) => visibles.sort_by(cmp),
        None => visibles.sort_by_key(|r| r.id()),
    }

    visibles
}

pub fn is_visible(estado: Option<bool>, show_deleted: bool) -> bool {
    show_deleted || estado != Some(false)
}

/// Case-insensitive substring search over several fields.
pub fn matches_text<S: AsRef<str>>(search: &str, fields: &[S]) -> bool {
    let needle = search.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    fields
        .iter()
        .any(|field| field.as_ref().to_lowercase().contains(&needle))
}

/// A bound only applies when it is set and non-zero.
pub fn in_range(value: Option<Decimal>, min: Option<Decimal>, max: Option<Decimal>) -> bool {
    let value = value.unwrap_or_default();
    if let Some(min) = min.filter(|m| !m.is_zero()) {
        if value < min {
            return false;
        }
    }
    if let Some(max) = max.filter(|m| !m.is_zero()) {
        if value > max {
            return false;
        }
    }
    true
}

/// Stock toggle as the list screens evaluate `stock || 0 > 0`.
///
/// Operator precedence turns that expression into `stock || false`, so any
/// truthy stock passes, negative stock included, and no comparison is made.
pub fn stock_toggle_passes(stock: Option<i64>) -> bool {
    matches!(stock, Some(s) if s != 0)
}

pub fn equals_selected<T: PartialEq>(value: Option<T>, selected: Option<T>) -> bool {
    match selected {
        None => true,
        Some(selected) => value == Some(selected),
    }
}

/// Inclusive date window. A record without a date fails an active window.
pub fn in_date_range(date: Option<NaiveDate>, from: Option<NaiveDate>, to: Option<NaiveDate>) -> bool {
    if from.is_none() && to.is_none() {
        return true;
    }
    let Some(date) = date else {
        return false;
    };
    from.map_or(true, |f| date >= f) && to.map_or(true, |t| date <= t)
}

pub fn compare_numbers<T: PartialOrd>(a: T, b: T) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Locale-aware text ordering: case and Spanish accents are ignored first,
/// the raw text breaks ties.
pub fn compare_text(a: &str, b: &str) -> Ordering {
    fold(a).cmp(&fold(b)).then_with(|| a.cmp(b))
}

fn fold(s: &str) -> String {
    s.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'ä' | 'â' => 'a',
            'é' | 'è' | 'ë' | 'ê' => 'e',
            'í' | 'ì' | 'ï' | 'î' => 'i',
            'ó' | 'ò' | 'ö' | 'ô' => 'o',
            'ú' | 'ù' | 'ü' | 'û' => 'u',
            other => other,
        })
        .collect()
}

// Query-string helpers. Empty or malformed values become "unset" so a bad
// criterion never turns into a request error.

pub fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| {
        let s = s.trim();
        if s.is_empty() {
            None
        } else {
            s.parse().ok()
        }
    }))
}

pub fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()))
}

/// HTML checkboxes send "on"; the SPA sends "true" or "1".
pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(matches!(
        raw.as_deref().map(str::trim),
        Some("true") | Some("on") | Some("1")
    ))
}
