//! Declarative conditions over subject fields.
//!
//! Conditions are data rather than closures so that an ability can be
//! serialized for client-side gating. They are evaluated only against
//! concrete instances.

use core::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::{AbilityError, Resource};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Eq { field: String, value: Value },
    Ne { field: String, value: Value },
    In { field: String, values: Vec<Value> },
    Nin { field: String, values: Vec<Value> },
    Lt { field: String, value: Value },
    Lte { field: String, value: Value },
    Gt { field: String, value: Value },
    Gte { field: String, value: Value },
    /// Tests presence of the field itself, not its value.
    Exists { field: String, present: bool },
    And(Vec<Condition>),
    Or(Vec<Condition>),
    Not(Box<Condition>),
}

impl Condition {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Eq { field: field.into(), value: value.into() }
    }

    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Ne { field: field.into(), value: value.into() }
    }

    pub fn is_in<V: Into<Value>>(field: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        Self::In {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn not_in<V: Into<Value>>(field: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        Self::Nin {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Lt { field: field.into(), value: value.into() }
    }

    pub fn lte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Lte { field: field.into(), value: value.into() }
    }

    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Gt { field: field.into(), value: value.into() }
    }

    pub fn gte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Gte { field: field.into(), value: value.into() }
    }

    pub fn exists(field: impl Into<String>) -> Self {
        Self::Exists { field: field.into(), present: true }
    }

    pub fn and(self, other: Condition) -> Self {
        match self {
            Condition::And(mut all) => {
                all.push(other);
                Condition::And(all)
            }
            first => Condition::And(vec![first, other]),
        }
    }

    pub fn or(self, other: Condition) -> Self {
        match self {
            Condition::Or(mut any) => {
                any.push(other);
                Condition::Or(any)
            }
            first => Condition::Or(vec![first, other]),
        }
    }

    pub fn negate(self) -> Self {
        Condition::Not(Box::new(self))
    }

    /// Evaluate against one instance.
    ///
    /// An absent field makes a comparison false. Ordering a field against a
    /// value of an incomparable type is a malformed condition and is returned
    /// as an error rather than read as `false`.
    pub fn evaluate(&self, resource: &dyn Resource) -> Result<bool, AbilityError> {
        match self {
            Condition::Eq { field, value } => {
                Ok(resource.field(field).is_some_and(|v| same_value(&v, value)))
            }
            Condition::Ne { field, value } => {
                Ok(resource.field(field).is_some_and(|v| !same_value(&v, value)))
            }
            Condition::In { field, values } => Ok(resource
                .field(field)
                .is_some_and(|v| values.iter().any(|candidate| same_value(&v, candidate)))),
            Condition::Nin { field, values } => Ok(resource
                .field(field)
                .is_some_and(|v| !values.iter().any(|candidate| same_value(&v, candidate)))),
            Condition::Lt { field, value } => ordered(resource, field, value, Ordering::is_lt),
            Condition::Lte { field, value } => ordered(resource, field, value, Ordering::is_le),
            Condition::Gt { field, value } => ordered(resource, field, value, Ordering::is_gt),
            Condition::Gte { field, value } => ordered(resource, field, value, Ordering::is_ge),
            Condition::Exists { field, present } => Ok(resource.field(field).is_some() == *present),
            Condition::And(all) => {
                for condition in all {
                    if !condition.evaluate(resource)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Condition::Or(any) => {
                for condition in any {
                    if condition.evaluate(resource)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Condition::Not(inner) => Ok(!inner.evaluate(resource)?),
        }
    }
}

fn ordered(
    resource: &dyn Resource,
    field: &str,
    expected: &Value,
    accept: fn(Ordering) -> bool,
) -> Result<bool, AbilityError> {
    let Some(actual) = resource.field(field) else {
        return Ok(false);
    };

    let ordering = match (&actual, expected) {
        (Value::Number(a), Value::Number(b)) => compare_numbers(a, b),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => None,
    };

    ordering.map(accept).ok_or_else(|| AbilityError::MalformedCondition {
        field: field.to_string(),
        reason: format!(
            "cannot order {} against {}",
            json_type(&actual),
            json_type(expected)
        ),
    })
}

/// Equality that treats numbers by value, so `3` equals `3.0`.
fn same_value(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Number(a), Value::Number(b)) => compare_numbers(a, b) == Some(Ordering::Equal),
        _ => actual == expected,
    }
}

/// Exact for integer pairs (including beyond 2^53); floats only when either
/// side is one.
fn compare_numbers(a: &Number, b: &Number) -> Option<Ordering> {
    match (integer(a), integer(b)) {
        (Some(a), Some(b)) => Some(a.cmp(&b)),
        _ => a.as_f64()?.partial_cmp(&b.as_f64()?),
    }
}

fn integer(n: &Number) -> Option<i128> {
    n.as_i64()
        .map(i128::from)
        .or_else(|| n.as_u64().map(i128::from))
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
