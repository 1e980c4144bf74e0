//! Submitted answer values.
//!
//! Answers arrive as arbitrary JSON and are stored as submitted. For
//! aggregation each one is narrowed into an [`AnswerValue`], so every strategy
//! works on a closed set of variants and treats the ones it does not
//! understand as absent.

use serde_json::Value;

/// A single answer to a single field.
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    /// A submitted array: its string items, plus the length it was submitted
    /// with (non-string items are dropped from `items` but still counted).
    List { items: Vec<String>, submitted_len: usize },
    /// Any other JSON shape (objects, numbers outside `f64`).
    Other,
}

impl AnswerValue {
    /// Generic presence rule: neither null nor the empty string.
    ///
    /// Looser than every kind-specific rule: an out-of-range rating or an
    /// empty list still counts as answered here.
    pub fn is_answered(&self) -> bool {
        !matches!(self, AnswerValue::Null) && !matches!(self, AnswerValue::Text(s) if s.is_empty())
    }

    pub fn as_non_empty_str(&self) -> Option<&str> {
        match self {
            AnswerValue::Text(s) if !s.is_empty() => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            AnswerValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// String items and submitted length of an array answer.
    pub fn as_list(&self) -> Option<(&[String], usize)> {
        match self {
            AnswerValue::List {
                items,
                submitted_len,
            } => Some((items, *submitted_len)),
            _ => None,
        }
    }
}

impl From<&Value> for AnswerValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => AnswerValue::Null,
            Value::Bool(b) => AnswerValue::Bool(*b),
            Value::Number(n) => n.as_f64().map_or(AnswerValue::Other, AnswerValue::Number),
            Value::String(s) => AnswerValue::Text(s.clone()),
            Value::Array(items) => AnswerValue::List {
                items: items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect(),
                submitted_len: items.len(),
            },
            Value::Object(_) => AnswerValue::Other,
        }
    }
}
