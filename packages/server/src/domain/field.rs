//! Form field schema.

use std::fmt;

/// Declared type of a form field, as named on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Textarea,
    Email,
    Number,
    Select,
    Radio,
    Checkbox,
    Rating,
    /// A type this server does not know how to aggregate; kept verbatim.
    Unknown(String),
}

/// Aggregation strategy selected by a field's type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldStrategy {
    Text,
    Numeric,
    SingleChoice,
    MultiChoice,
    Rating,
    None,
}

impl FieldType {
    pub fn parse(value: &str) -> Self {
        match value {
            "text" => FieldType::Text,
            "textarea" => FieldType::Textarea,
            "email" => FieldType::Email,
            "number" => FieldType::Number,
            "select" => FieldType::Select,
            "radio" => FieldType::Radio,
            "checkbox" => FieldType::Checkbox,
            "rating" => FieldType::Rating,
            other => FieldType::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FieldType::Text => "text",
            FieldType::Textarea => "textarea",
            FieldType::Email => "email",
            FieldType::Number => "number",
            FieldType::Select => "select",
            FieldType::Radio => "radio",
            FieldType::Checkbox => "checkbox",
            FieldType::Rating => "rating",
            FieldType::Unknown(other) => other,
        }
    }

    pub fn strategy(&self) -> FieldStrategy {
        match self {
            FieldType::Text | FieldType::Textarea | FieldType::Email => FieldStrategy::Text,
            FieldType::Number => FieldStrategy::Numeric,
            FieldType::Select | FieldType::Radio => FieldStrategy::SingleChoice,
            FieldType::Checkbox => FieldStrategy::MultiChoice,
            FieldType::Rating => FieldStrategy::Rating,
            FieldType::Unknown(_) => FieldStrategy::None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One field of a form.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchema {
    /// Unique within its form; the key of the answer in a response record
    pub id: String,
    pub field_type: FieldType,
    pub label: String,
    pub placeholder: Option<String>,
    pub required: bool,
    /// Choices offered by select, radio and checkbox fields
    pub options: Vec<String>,
    pub order: i32,
}

impl FieldSchema {
    pub fn new(id: impl Into<String>, field_type: FieldType, label: impl Into<String>, order: i32) -> Self {
        Self {
            id: id.into(),
            field_type,
            label: label.into(),
            placeholder: None,
            required: false,
            options: Vec::new(),
            order,
        }
    }
}
