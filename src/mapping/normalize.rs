//! Value normalization for mapped fields
//!
//! RetroTector writes the same logical value in several JSON shapes
//! (`"Yes"` vs `true`, `"12"` vs `12`, `12.0` vs `12`). The functions here
//! turn whatever is present into the column type, and [`Fields`] applies
//! them to one JSON object with per-column default substitution.

use super::{Entity, MappingError, MappingResult};
use chrono::{DateTime, NaiveDateTime, Utc, Weekday};
use serde_json::{Map, Value};

/// Footer timestamp layout after the leading weekday name, e.g.
/// `Mon Aug 04 04:51:37 GMT 2025`
const DATE_TIME_FORMAT: &str = "%b %d %H:%M:%S GMT %Y";

/// Normalize a flag.
///
/// Strings are true only for exactly `yes`, `true` or `1` (any case, no
/// surrounding whitespace). Other values
/// follow truthiness: non-zero numbers and non-empty containers are true.
pub fn normalize_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => matches!(s.to_ascii_lowercase().as_str(), "yes" | "true" | "1"),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Null => false,
    }
}

/// Parse a footer timestamp as UTC. Anything else yields `None`.
///
/// The weekday must be a weekday name but is not checked against the date;
/// RetroTector output is trusted for the calendar part.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let (weekday, rest) = text.trim().split_once(' ')?;
    weekday.parse::<Weekday>().ok()?;
    NaiveDateTime::parse_from_str(rest.trim_start(), DATE_TIME_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Coerce to an integer. Floats are truncated toward zero.
pub fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(truncate)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(truncate))
        }
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

/// Coerce to a float.
pub fn coerce_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// Text form of a value: strings verbatim, everything else as JSON.
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn truncate(f: f64) -> Option<i64> {
    if f.is_finite() && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        Some(f.trunc() as i64)
    } else {
        None
    }
}

/// Typed access to the fields of one source object.
///
/// An absent object (a missing `header`, say) behaves like an empty one, so
/// every lookup falls through to its default. JSON `null` counts as absent.
#[derive(Debug, Clone, Copy)]
pub struct Fields<'a> {
    entity: Entity,
    map: Option<&'a Map<String, Value>>,
}

impl<'a> Fields<'a> {
    /// View `value` as the fields of `entity`. `null` is an empty view.
    pub fn of(entity: Entity, value: &'a Value) -> MappingResult<Self> {
        match value {
            Value::Object(map) => Ok(Self { entity, map: Some(map) }),
            Value::Null => Ok(Self::empty(entity)),
            _ => Err(MappingError::NotAnObject { entity }),
        }
    }

    /// View an optional object; `None` is an empty view.
    pub fn of_map(entity: Entity, map: Option<&'a Map<String, Value>>) -> Self {
        Self { entity, map }
    }

    pub fn empty(entity: Entity) -> Self {
        Self { entity, map: None }
    }

    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.map?.get(key).filter(|v| !v.is_null())
    }

    fn invalid(&self, key: &str, value: &Value) -> MappingError {
        MappingError::InvalidValue {
            entity: self.entity,
            field: key.to_string(),
            value: value.to_string(),
        }
    }

    fn missing(&self, key: &str) -> MappingError {
        MappingError::MissingField {
            entity: self.entity,
            field: key.to_string(),
        }
    }

    // === Integers ===

    pub fn opt_int(&self, key: &str) -> MappingResult<Option<i64>> {
        self.get(key)
            .map(|v| coerce_int(v).ok_or_else(|| self.invalid(key, v)))
            .transpose()
    }

    pub fn int_or_zero(&self, key: &str) -> MappingResult<i64> {
        Ok(self.opt_int(key)?.unwrap_or(0))
    }

    pub fn req_int(&self, key: &str) -> MappingResult<i64> {
        self.opt_int(key)?.ok_or_else(|| self.missing(key))
    }

    // === Floats ===

    pub fn opt_float(&self, key: &str) -> MappingResult<Option<f64>> {
        self.get(key)
            .map(|v| coerce_float(v).ok_or_else(|| self.invalid(key, v)))
            .transpose()
    }

    pub fn float_or_zero(&self, key: &str) -> MappingResult<f64> {
        Ok(self.opt_float(key)?.unwrap_or(0.0))
    }

    // === Text ===

    pub fn opt_text(&self, key: &str) -> Option<String> {
        self.get(key).and_then(value_text)
    }

    pub fn text_or_empty(&self, key: &str) -> String {
        self.opt_text(key).unwrap_or_default()
    }

    pub fn req_text(&self, key: &str) -> MappingResult<String> {
        self.opt_text(key).ok_or_else(|| self.missing(key))
    }

    // === Flags and timestamps ===

    pub fn flag(&self, key: &str) -> bool {
        self.get(key).is_some_and(normalize_bool)
    }

    pub fn timestamp(&self, key: &str) -> Option<DateTime<Utc>> {
        let raw = self.get(key)?;
        let parsed = raw.as_str().and_then(parse_timestamp);
        if parsed.is_none() {
            tracing::warn!(entity = %self.entity, field = key, value = %raw, "unparseable timestamp, storing NULL");
        }
        parsed
    }

    /// A nested sequence; absent means empty.
    pub fn list(&self, key: &str) -> MappingResult<&'a [Value]> {
        match self.get(key) {
            None => Ok(&[]),
            Some(Value::Array(items)) => Ok(items.as_slice()),
            Some(other) => Err(self.invalid(key, other)),
        }
    }
}
