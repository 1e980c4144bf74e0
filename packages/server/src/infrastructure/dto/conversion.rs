//! Conversion logic between DTOs and domain entities.

use formpulse_shared::time::timestamp_to_rfc3339;

use crate::domain::{
    ClientId, FieldData, FieldSchema, FieldStatistics, FieldType, Form, FormStatistics,
    ResponseRecord,
};
use crate::infrastructure::dto::{http, websocket as ws};

// ========================================
// DTO → Domain Entity
// ========================================

impl From<http::FieldDto> for FieldSchema {
    fn from(dto: http::FieldDto) -> Self {
        Self {
            id: dto.id,
            field_type: FieldType::parse(&dto.field_type),
            label: dto.label,
            placeholder: dto.placeholder,
            required: dto.required,
            options: dto.options,
            order: dto.order,
        }
    }
}

// ========================================
// Domain Entity → DTO
// ========================================

impl From<&FieldSchema> for http::FieldDto {
    fn from(model: &FieldSchema) -> Self {
        Self {
            id: model.id.clone(),
            field_type: model.field_type.as_str().to_string(),
            label: model.label.clone(),
            placeholder: model.placeholder.clone(),
            required: model.required,
            options: model.options.clone(),
            order: model.order,
        }
    }
}

impl From<&Form> for http::FormSummaryDto {
    fn from(model: &Form) -> Self {
        Self {
            id: model.id.as_str().to_string(),
            title: model.title.clone(),
            description: model.description.clone(),
            fields: model.ordered_fields().iter().map(http::FieldDto::from).collect(),
            status: model.status.as_str().to_string(),
            share_url: model.share_url.as_ref().map(|url| url.as_str().to_string()),
            created_at: timestamp_to_rfc3339(model.created_at.value()),
            updated_at: timestamp_to_rfc3339(model.updated_at.value()),
        }
    }
}

impl From<&ResponseRecord> for http::ResponseRecordDto {
    fn from(model: &ResponseRecord) -> Self {
        let metadata = model.metadata.clone().unwrap_or_default();
        Self {
            id: model.id.as_str().to_string(),
            form_id: model.form_id.as_str().to_string(),
            responses: model.document.clone(),
            ip_address: metadata.ip_address,
            user_agent: metadata.user_agent,
            submitted_at: timestamp_to_rfc3339(model.submitted_at.value()),
        }
    }
}

impl From<&FieldData> for ws::FieldDataDto {
    fn from(model: &FieldData) -> Self {
        match model {
            FieldData::Text {
                average_length,
                response_count,
            } => Self::Text {
                average_length: *average_length,
                response_count: *response_count,
            },
            FieldData::Numeric {
                average,
                min,
                max,
                response_count,
            } => Self::Numeric {
                average: *average,
                min: *min,
                max: *max,
                response_count: *response_count,
            },
            FieldData::Choice {
                distribution,
                response_count,
            } => Self::Choice {
                distribution: distribution.clone(),
                response_count: *response_count,
            },
            FieldData::Rating {
                average_rating,
                distribution,
                response_count,
            } => Self::Rating {
                average_rating: *average_rating,
                distribution: distribution.clone(),
                response_count: *response_count,
            },
            FieldData::Empty => Self::Empty {},
        }
    }
}

impl From<&FieldStatistics> for ws::FieldAnalyticsDto {
    fn from(model: &FieldStatistics) -> Self {
        Self {
            field_id: model.field_id.clone(),
            field_label: model.field_label.clone(),
            field_type: model.field_type.as_str().to_string(),
            response_count: model.response_count,
            data: (&model.data).into(),
        }
    }
}

impl From<&FormStatistics> for ws::FormAnalyticsDto {
    fn from(model: &FormStatistics) -> Self {
        Self {
            form_id: model.form_id.as_str().to_string(),
            form_title: model.form_title.clone(),
            total_responses: model.total_responses,
            field_analytics: model.fields.iter().map(ws::FieldAnalyticsDto::from).collect(),
            created_at: timestamp_to_rfc3339(model.computed_at.value()),
        }
    }
}

impl ws::ConnectedMessage {
    pub fn new(client_id: &ClientId) -> Self {
        Self {
            r#type: ws::MessageType::Connected,
            client_id: client_id.as_str().to_string(),
        }
    }
}

impl ws::AnalyticsUpdateMessage {
    pub fn new(statistics: &FormStatistics) -> Self {
        Self {
            r#type: ws::MessageType::AnalyticsUpdate,
            form_id: statistics.form_id.as_str().to_string(),
            analytics: statistics.into(),
            timestamp: timestamp_to_rfc3339(statistics.computed_at.value()),
        }
    }
}

impl ws::FormUpdateMessage {
    pub fn new(form: &Form) -> Self {
        Self {
            r#type: ws::MessageType::FormUpdate,
            form_id: form.id.as_str().to_string(),
            form: form.into(),
        }
    }
}
