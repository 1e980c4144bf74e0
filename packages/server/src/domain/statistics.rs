//! Aggregated statistics produced by the aggregator.

use std::collections::BTreeMap;

use super::{FieldType, FormId, Timestamp};

/// Kind-specific statistics payload of one field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldData {
    Text {
        average_length: f64,
        response_count: u64,
    },
    Numeric {
        average: f64,
        min: f64,
        max: f64,
        response_count: u64,
    },
    /// Shared by single-choice and multi-choice fields
    Choice {
        distribution: BTreeMap<String, u64>,
        response_count: u64,
    },
    Rating {
        average_rating: f64,
        distribution: BTreeMap<String, u64>,
        response_count: u64,
    },
    /// Field types without an aggregation strategy
    Empty,
}

impl FieldData {
    /// Count of values the kind-specific strategy accepted.
    pub fn response_count(&self) -> u64 {
        match self {
            FieldData::Text { response_count, .. }
            | FieldData::Numeric { response_count, .. }
            | FieldData::Choice { response_count, .. }
            | FieldData::Rating { response_count, .. } => *response_count,
            FieldData::Empty => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldStatistics {
    pub field_id: String,
    pub field_label: String,
    pub field_type: FieldType,
    /// Responses in which the field is present and neither null nor "".
    /// May exceed `data.response_count()`.
    pub response_count: u64,
    pub data: FieldData,
}

/// Full analytics snapshot of a form, recomputed on every submission.
#[derive(Debug, Clone, PartialEq)]
pub struct FormStatistics {
    pub form_id: FormId,
    pub form_title: String,
    pub total_responses: u64,
    pub fields: Vec<FieldStatistics>,
    pub computed_at: Timestamp,
}
