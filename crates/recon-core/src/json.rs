//! Conversion between RECON values and `serde_json` values.
//!
//! Every RECON value has a JSON form (finite floats only). The reverse does not
//! hold: `null` and booleans have no RECON variant and are rejected rather
//! than silently turned into strings.
//!
//! Objects keep their key order in both directions (`serde_json` is built with
//! `preserve_order`).

use serde_json::{Map, Number};

use crate::error::{ReconError, Result};
use crate::value::{Record, Value};

/// Convert a RECON value into a JSON value.
///
/// # Examples
///
/// ```
/// use recon_core::{json::to_json, Record, Value};
/// let record = Record::new().field("name", "Abjurer").field("meleeRes", 1);
/// let json = to_json(&Value::Record(record)).unwrap();
/// assert_eq!(json, serde_json::json!({"name": "Abjurer", "meleeRes": 1}));
/// ```
pub fn to_json(value: &Value) -> Result<serde_json::Value> {
    Ok(match value {
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Integer(n) => serde_json::Value::Number((*n).into()),
        Value::Float(f) => Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .ok_or_else(|| {
                ReconError::UnsupportedValue(format!("non-finite float {f} has no JSON form"))
            })?,
        Value::List(items) => {
            serde_json::Value::Array(items.iter().map(to_json).collect::<Result<_>>()?)
        }
        Value::Record(record) => {
            let mut map = Map::new();
            for (name, field) in record.iter() {
                map.insert(name.to_string(), to_json(field)?);
            }
            serde_json::Value::Object(map)
        }
    })
}

/// Convert a JSON value into a RECON value.
///
/// Integral numbers that fit in `i64` become [`Value::Integer`], every other
/// number becomes [`Value::Float`].
pub fn from_json(json: &serde_json::Value) -> Result<Value> {
    Ok(match json {
        serde_json::Value::Null => {
            return Err(ReconError::UnsupportedValue(
                "JSON null has no RECON form".to_string(),
            ));
        }
        serde_json::Value::Bool(b) => {
            return Err(ReconError::UnsupportedValue(format!(
                "JSON boolean `{b}` has no RECON form"
            )));
        }
        serde_json::Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => Value::Integer(i),
            (None, Some(f)) => Value::Float(f),
            (None, None) => {
                return Err(ReconError::UnsupportedValue(format!(
                    "JSON number {n} has no RECON form"
                )));
            }
        },
        serde_json::Value::String(s) => Value::String(s.clone()),
        serde_json::Value::Array(items) => {
            Value::List(items.iter().map(from_json).collect::<Result<_>>()?)
        }
        serde_json::Value::Object(map) => {
            let mut record = Record::new();
            for (name, field) in map {
                record.insert(name.clone(), from_json(field)?);
            }
            Value::Record(record)
        }
    })
}

/// Parse JSON text into a RECON value.
pub fn from_json_str(json: &str) -> Result<Value> {
    let parsed: serde_json::Value = serde_json::from_str(json)?;
    from_json(&parsed)
}

/// Render a RECON value as pretty-printed JSON text.
pub fn to_json_string(value: &Value) -> Result<String> {
    Ok(serde_json::to_string_pretty(&to_json(value)?)?)
}
