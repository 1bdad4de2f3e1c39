//! `KEY=VALUE` override parsing

use crate::error::{Error, Result};
use serde_yaml::Value;

/// A single parsed `dotted.key=value` override
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment<'a> {
    /// Dotted key path, e.g. `Global.epochs`
    pub key: &'a str,
    /// Parsed value
    pub value: Value,
}

impl<'a> Assignment<'a> {
    /// Split `KEY=VALUE` at the first `=` and parse the value as a YAML scalar.
    pub fn parse(item: &'a str) -> Result<Self> {
        let (key, raw) = item
            .split_once('=')
            .ok_or_else(|| Error::InvalidOverride(item.to_string()))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(Error::InvalidOverride(item.to_string()));
        }
        Ok(Self {
            key,
            value: parse_value(raw.trim()),
        })
    }

    /// Key path split on `.`
    pub fn segments(&self) -> impl Iterator<Item = &'a str> {
        self.key.split('.')
    }
}

/// Interpret an override value the way a YAML loader would.
///
/// Booleans, numbers and flow sequences keep their YAML type, `null`/`~`
/// become null, and everything else (mappings, unparsable text, the empty
/// string) is kept verbatim as a string.
pub fn parse_value(raw: &str) -> Value {
    if raw.is_empty() {
        return Value::String(String::new());
    }
    match serde_yaml::from_str::<Value>(raw) {
        Ok(value @ (Value::Bool(_) | Value::Number(_) | Value::Sequence(_))) => value,
        Ok(Value::Null) if matches!(raw, "null" | "Null" | "NULL" | "~") => Value::Null,
        _ => Value::String(raw.to_string()),
    }
}
