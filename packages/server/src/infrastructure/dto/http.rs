//! HTTP API request / response DTOs.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field definition as exchanged over HTTP
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDto {
    pub id: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default)]
    pub order: i32,
}

/// Body of `POST /api/forms` and `PUT /api/forms/{form_id}`
#[derive(Debug, Clone, Deserialize)]
pub struct FormRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub fields: Vec<FieldDto>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Public view of a form; also the `form` of a `form-update` event
#[derive(Debug, Clone, Serialize)]
pub struct FormSummaryDto {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub fields: Vec<FieldDto>,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Query of `GET /api/forms`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormListQuery {
    #[serde(default)]
    pub status: Option<String>,
}

/// Body of `GET /api/forms`
#[derive(Debug, Clone, Serialize)]
pub struct FormListDto {
    pub forms: Vec<FormSummaryDto>,
    pub count: usize,
}

/// Body of `POST /api/forms/{form_id}/responses`
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitResponseRequest {
    pub responses: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitResponseDto {
    pub message: String,
    pub response_id: String,
    pub form_id: String,
}

/// A stored response as listed by `GET /api/forms/{form_id}/responses`
#[derive(Debug, Clone, Serialize)]
pub struct ResponseRecordDto {
    pub id: String,
    pub form_id: String,
    pub responses: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    pub submitted_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthDto {
    pub status: String,
    pub connections: usize,
    pub rooms: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorDto {
    pub error: String,
}
