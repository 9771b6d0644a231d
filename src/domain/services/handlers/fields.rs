use serde_json::{Map, Value};

use crate::domain::errors::HandlerError;

/// Typed access to the fields of a decoded action document
pub(crate) struct Fields<'a> {
    action: &'static str,
    map: Option<&'a Map<String, Value>>,
}

impl<'a> Fields<'a> {
    pub(crate) fn of_value(action: &'static str, value: &'a Value) -> Self {
        Self {
            action,
            map: value.as_object(),
        }
    }

    pub(crate) fn of_map(action: &'static str, map: &'a Map<String, Value>) -> Self {
        Self {
            action,
            map: Some(map),
        }
    }

    fn get(&self, field: &str) -> Option<&'a Value> {
        self.map
            .and_then(|m| m.get(field))
            .filter(|v| !v.is_null())
    }

    fn missing(&self, field: &'static str) -> HandlerError {
        HandlerError::MissingField {
            action: self.action,
            field,
        }
    }

    fn invalid(&self, field: &'static str, reason: impl Into<String>) -> HandlerError {
        HandlerError::InvalidField {
            action: self.action,
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn require_str(&self, field: &'static str) -> Result<&'a str, HandlerError> {
        match self.get(field) {
            None => Err(self.missing(field)),
            Some(Value::String(s)) if !s.is_empty() => Ok(s.as_str()),
            Some(Value::String(_)) => Err(self.invalid(field, "empty string")),
            Some(other) => Err(self.invalid(field, format!("expected a string, got {}", other))),
        }
    }

    pub(crate) fn require_u64(&self, field: &'static str) -> Result<u64, HandlerError> {
        let value = self.get(field).ok_or_else(|| self.missing(field))?;
        self.to_u64(field, value)
    }

    /// Same as `require_u64`, narrowed to the signed column range
    pub(crate) fn require_i64(&self, field: &'static str) -> Result<i64, HandlerError> {
        let value = self.require_u64(field)?;
        i64::try_from(value).map_err(|_| self.invalid(field, "out of range"))
    }

    pub(crate) fn optional_str(&self, field: &'static str) -> Result<Option<String>, HandlerError> {
        match self.get(field) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(self.invalid(field, format!("expected a string, got {}", other))),
        }
    }

    pub(crate) fn optional_i64(&self, field: &'static str) -> Result<Option<i64>, HandlerError> {
        match self.get(field) {
            None => Ok(None),
            Some(value) => {
                let value = self.to_u64(field, value)?;
                i64::try_from(value)
                    .map(Some)
                    .map_err(|_| self.invalid(field, "out of range"))
            }
        }
    }

    fn to_u64(&self, field: &'static str, value: &Value) -> Result<u64, HandlerError> {
        match value {
            Value::Number(n) => n
                .as_u64()
                .or_else(|| {
                    // Decoders that go through floats emit whole numbers as 1.0
                    n.as_f64()
                        .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= u64::MAX as f64)
                        .map(|f| f as u64)
                })
                .ok_or_else(|| self.invalid(field, format!("not an unsigned integer: {}", n))),
            Value::String(s) => s
                .parse::<u64>()
                .map_err(|e| self.invalid(field, e.to_string())),
            other => Err(self.invalid(field, format!("expected a number, got {}", other))),
        }
    }
}
