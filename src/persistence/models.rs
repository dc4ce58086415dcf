//! Document, filter and sort types shared by the record store backends.

use std::cmp::Ordering;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::domain::{Record, RecordId};
use crate::error::GatewayError;

/// A stored JSON document: identifier plus top-level fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Store-assigned identifier.
    pub id: RecordId,
    /// Document fields, without the identifier.
    pub body: Map<String, Value>,
}

impl Document {
    /// Converts the document into a typed record.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Serialization`] if the body does not match `T`.
    pub fn into_record<T: DeserializeOwned>(self) -> Result<Record<T>, GatewayError> {
        let fields = serde_json::from_value(Value::Object(self.body))?;
        Ok(Record {
            id: self.id,
            fields,
        })
    }
}

/// Serializes `fields` into a document body.
///
/// # Errors
///
/// Returns [`GatewayError::Serialization`] if `fields` does not serialize to
/// a JSON object.
pub fn to_body<T: Serialize>(fields: &T) -> Result<Map<String, Value>, GatewayError> {
    match serde_json::to_value(fields)? {
        Value::Object(map) => Ok(map),
        other => Err(GatewayError::Internal(format!(
            "document body must be an object, got {other}"
        ))),
    }
}

/// Conjunction of top-level field equalities. Empty matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    fields: Map<String, Value>,
}

impl Filter {
    /// Matches every document.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Adds the condition `field == value`.
    #[must_use]
    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(field.to_string(), value.into());
        self
    }

    /// Returns the conditions as a JSON object, usable for containment.
    #[must_use]
    pub fn as_object(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Returns `true` if `body` satisfies every condition.
    #[must_use]
    pub fn matches(&self, body: &Map<String, Value>) -> bool {
        self.fields
            .iter()
            .all(|(field, expected)| body.get(field) == Some(expected))
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Smallest first.
    Ascending,
    /// Largest first.
    Descending,
}

/// Single-field ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    /// Top-level field to order by.
    pub field: String,
    /// Order direction.
    pub direction: Direction,
}

impl Sort {
    /// Orders by `field`, largest first.
    #[must_use]
    pub fn descending(field: &str) -> Self {
        Self {
            field: field.to_string(),
            direction: Direction::Descending,
        }
    }

    /// Orders by `field`, smallest first.
    #[must_use]
    pub fn ascending(field: &str) -> Self {
        Self {
            field: field.to_string(),
            direction: Direction::Ascending,
        }
    }

    /// Compares two documents on the sort field, honoring the direction.
    #[must_use]
    pub fn compare(&self, a: &Map<String, Value>, b: &Map<String, Value>) -> Ordering {
        let ord = compare_values(a.get(&self.field), b.get(&self.field));
        match self.direction {
            Direction::Ascending => ord,
            Direction::Descending => ord.reverse(),
        }
    }
}

/// Missing and null sort first; numbers, strings and booleans compare
/// naturally; anything else is treated as equal.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        (None | Some(Value::Null), Some(_)) => Ordering::Less,
        (Some(_), None | Some(Value::Null)) => Ordering::Greater,
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        _ => Ordering::Equal,
    }
}
