use serde::Serialize;
use serde_json::{Map, Value};

/// Builds the CSV text of an export.
///
/// The header is the key order of the first record. Every cell is the JSON
/// text of the value, with `null` written as `""`. A header key missing from
/// a later record is written as `undefined`, since the row is built by
/// looking up every header key on every record. Returns `None` for an empty
/// set so nothing gets downloaded.
pub fn to_csv(records: &[Map<String, Value>]) -> Option<String> {
    let header: Vec<&String> = records.first()?.keys().collect();

    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(header.iter().map(|k| k.as_str()).collect::<Vec<_>>().join(","));

    for record in records {
        let row: Vec<String> = header
            .iter()
            .map(|key| match record.get(key.as_str()) {
                Some(value) => cell(value),
                None => "undefined".to_string(),
            })
            .collect();
        lines.push(row.join(","));
    }

    Some(lines.join("\r\n"))
}

/// Serializes typed rows first, keeping their field order.
pub fn rows_to_csv<T: Serialize>(rows: &[T]) -> Result<Option<String>, serde_json::Error> {
    let records = rows
        .iter()
        .map(|row| match serde_json::to_value(row)? {
            Value::Object(map) => Ok(map),
            other => {
                let mut map = Map::new();
                map.insert("valor".to_string(), other);
                Ok(map)
            }
        })
        .collect::<Result<Vec<_>, serde_json::Error>>()?;
    Ok(to_csv(&records))
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => "\"\"".to_string(),
        Value::Number(n) => js_number(n),
        Value::String(_) | Value::Bool(_) | Value::Array(_) | Value::Object(_) => {
            serde_json::to_string(value).unwrap_or_default()
        }
    }
}

// Numbers print as a browser's `String(n)`: integral floats without a
// fractional part, and exponent notation from 1e21 up and below 1e-6.
fn js_number(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    n.as_f64().map(js_float).unwrap_or_default()
}

fn js_float(f: f64) -> String {
    if f == 0.0 {
        return "0".to_string();
    }
    let abs = f.abs();
    if abs < 1e21 && abs >= 1e-6 {
        return f.to_string();
    }

    let exp = format!("{:e}", f);
    match exp.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => format!("{}e+{}", mantissa, exponent),
        _ => exp,
    }
}
