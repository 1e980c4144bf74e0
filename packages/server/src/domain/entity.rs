//! Domain entities owned by the storage collaborator.

use std::collections::HashMap;

use serde_json::{Map, Value};

use super::{AnswerValue, FieldSchema, FormId, ResponseId, ShareUrl, Timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormStatus {
    #[default]
    Draft,
    Published,
}

impl FormStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "draft" => Some(FormStatus::Draft),
            "published" => Some(FormStatus::Published),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FormStatus::Draft => "draft",
            FormStatus::Published => "published",
        }
    }
}

/// A form: its title and the schema its responses are aggregated against.
#[derive(Debug, Clone, PartialEq)]
pub struct Form {
    pub id: FormId,
    pub title: String,
    pub description: String,
    pub fields: Vec<FieldSchema>,
    pub status: FormStatus,
    /// Assigned the first time the form is published, then kept for good
    pub share_url: Option<ShareUrl>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Form {
    pub fn is_published(&self) -> bool {
        self.status == FormStatus::Published
    }

    /// Give a published form its share URL if it has none yet.
    pub fn ensure_share_url(&mut self) {
        if self.is_published() && self.share_url.is_none() {
            self.share_url = Some(ShareUrl::generate());
        }
    }

    /// Fields in schema order (by order index, ties keep declaration order).
    pub fn ordered_fields(&self) -> Vec<FieldSchema> {
        let mut fields = self.fields.clone();
        fields.sort_by_key(|field| field.order);
        fields
    }
}

/// Origin information captured by the HTTP layer for a submission.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RequestMetadata {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// One submitted set of answers. Immutable once stored.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseRecord {
    pub id: ResponseId,
    pub form_id: FormId,
    /// field id -> answer, exactly as submitted
    pub document: Map<String, Value>,
    /// The same answers narrowed for aggregation
    pub answers: HashMap<String, AnswerValue>,
    pub submitted_at: Timestamp,
    pub metadata: Option<RequestMetadata>,
}

impl ResponseRecord {
    pub fn new(
        form_id: FormId,
        document: Map<String, Value>,
        submitted_at: Timestamp,
        metadata: Option<RequestMetadata>,
    ) -> Self {
        let answers = document
            .iter()
            .map(|(field_id, value)| (field_id.clone(), AnswerValue::from(value)))
            .collect();
        Self {
            id: ResponseId::generate(),
            form_id,
            document,
            answers,
            submitted_at,
            metadata,
        }
    }

    pub fn answer(&self, field_id: &str) -> Option<&AnswerValue> {
        self.answers.get(field_id)
    }
}
