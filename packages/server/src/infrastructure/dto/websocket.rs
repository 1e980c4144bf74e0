//! WebSocket message DTOs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::http::FormSummaryDto;

/// Outbound message types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MessageType {
    Connected,
    AnalyticsUpdate,
    FormUpdate,
}

/// Inbound control messages.
///
/// The dashboard historically sent `form_id`; both spellings are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientMessage {
    JoinAnalytics {
        #[serde(rename = "formId", alias = "form_id")]
        form_id: String,
    },
    LeaveAnalytics {
        #[serde(rename = "formId", alias = "form_id")]
        form_id: String,
    },
}

/// A text frame that cannot be read as a JSON object at all.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed JSON frame: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("frame is not a JSON object")]
    NotAnObject,
}

/// Decode one inbound text frame.
///
/// * `Err(_)` - the frame is unreadable; the connection should be closed
/// * `Ok(None)` - a JSON object this server does not understand; ignore it
/// * `Ok(Some(_))` - a recognized control message
pub fn decode_client_message(text: &str) -> Result<Option<ClientMessage>, DecodeError> {
    let value: Value = serde_json::from_str(text)?;
    if !value.is_object() {
        return Err(DecodeError::NotAnObject);
    }
    Ok(serde_json::from_value(value).ok())
}

/// Sent once right after the upgrade
#[derive(Debug, Clone, Serialize)]
pub struct ConnectedMessage {
    pub r#type: MessageType,
    pub client_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsUpdateMessage {
    pub r#type: MessageType,
    pub form_id: String,
    pub analytics: FormAnalyticsDto,
    /// RFC 3339
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FormUpdateMessage {
    pub r#type: MessageType,
    pub form_id: String,
    pub form: FormSummaryDto,
}

/// Analytics snapshot of a form; also the body of `GET /api/forms/{id}/analytics`
#[derive(Debug, Clone, Serialize)]
pub struct FormAnalyticsDto {
    pub form_id: String,
    pub form_title: String,
    pub total_responses: u64,
    pub field_analytics: Vec<FieldAnalyticsDto>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldAnalyticsDto {
    pub field_id: String,
    pub field_label: String,
    pub field_type: String,
    pub response_count: u64,
    pub data: FieldDataDto,
}

/// Kind-specific payload, serialized as a flat object
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum FieldDataDto {
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
    Choice {
        distribution: BTreeMap<String, u64>,
        response_count: u64,
    },
    Rating {
        average_rating: f64,
        distribution: BTreeMap<String, u64>,
        response_count: u64,
    },
    Empty {},
}
