//! HTTP API endpoint handlers.

use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json,
    extract::{ConnectInfo, Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::{
    domain::{FieldSchema, FormId, FormStatus, RequestMetadata, ResponseRecord, ShareUrl},
    infrastructure::dto::{
        http::{
            ErrorDto, FormListDto, FormListQuery, FormRequest, FormSummaryDto, HealthDto,
            ResponseRecordDto, SubmitResponseDto, SubmitResponseRequest,
        },
        websocket::FormAnalyticsDto,
    },
    ui::state::AppState,
    usecase::{AnalyticsError, FormDraft, FormError, SubmitResponseError},
};

/// Error returned by the HTTP handlers, rendered as `{"error": "..."}`
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ApiError::BadRequest(error) => (StatusCode::BAD_REQUEST, error),
            ApiError::NotFound(error) => (StatusCode::NOT_FOUND, error),
            ApiError::Internal(error) => {
                tracing::error!("Internal error: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };
        (status, Json(ErrorDto { error })).into_response()
    }
}

impl From<FormError> for ApiError {
    fn from(e: FormError) -> Self {
        match e {
            FormError::Validation(_) => ApiError::BadRequest(e.to_string()),
            FormError::NotFound(_) => ApiError::NotFound(e.to_string()),
            FormError::Repository(_) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<SubmitResponseError> for ApiError {
    fn from(e: SubmitResponseError) -> Self {
        match e {
            SubmitResponseError::FormNotFound(_) | SubmitResponseError::FormNotPublished(_) => {
                ApiError::NotFound(e.to_string())
            }
            SubmitResponseError::Repository(_) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<AnalyticsError> for ApiError {
    fn from(e: AnalyticsError) -> Self {
        match e {
            AnalyticsError::FormNotFound(_) => ApiError::NotFound(e.to_string()),
            AnalyticsError::Repository(_) | AnalyticsError::Encode(_) => {
                ApiError::Internal(e.to_string())
            }
        }
    }
}

/// An unparsable id can never name a stored form.
fn parse_form_id(form_id: String) -> Result<FormId, ApiError> {
    FormId::try_from(form_id.clone())
        .map_err(|_| ApiError::NotFound(format!("Form '{}' not found", form_id)))
}

fn parse_share_url(share_url: String) -> Result<ShareUrl, ApiError> {
    ShareUrl::try_from(share_url).map_err(|_| ApiError::NotFound("Form not found".to_string()))
}

fn parse_status(status: Option<&str>) -> Result<Option<FormStatus>, ApiError> {
    status
        .map(|value| {
            FormStatus::parse(value)
                .ok_or_else(|| ApiError::BadRequest(format!("Unknown status '{}'", value)))
        })
        .transpose()
}

fn into_draft(request: FormRequest) -> Result<FormDraft, ApiError> {
    let status = parse_status(request.status.as_deref())?;
    Ok(FormDraft {
        title: request.title,
        description: request.description,
        fields: request.fields.into_iter().map(FieldSchema::from).collect(),
        status,
    })
}

/// Client address: first `X-Forwarded-For` hop when behind a proxy, else the peer.
fn client_ip(headers: &HeaderMap, peer: SocketAddr) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| peer.ip().to_string())
}

fn request_metadata(headers: &HeaderMap, peer: SocketAddr) -> RequestMetadata {
    RequestMetadata {
        ip_address: Some(client_ip(headers, peer)),
        user_agent: headers
            .get(header::USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string),
    }
}

fn submitted(record: ResponseRecord) -> (StatusCode, Json<SubmitResponseDto>) {
    (
        StatusCode::CREATED,
        Json(SubmitResponseDto {
            message: "Response submitted successfully".to_string(),
            response_id: record.id.as_str().to_string(),
            form_id: record.form_id.into_string(),
        }),
    )
}

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthDto> {
    Json(HealthDto {
        status: "ok".to_string(),
        connections: state.connect_client_usecase.count_connections().await,
        rooms: state.room_subscription_usecase.count_rooms().await,
    })
}

pub async fn create_form(
    State(state): State<Arc<AppState>>,
    Json(request): Json<FormRequest>,
) -> Result<(StatusCode, Json<FormSummaryDto>), ApiError> {
    let form = state
        .manage_form_usecase
        .create(into_draft(request)?)
        .await?;
    Ok((StatusCode::CREATED, Json(FormSummaryDto::from(&form))))
}

/// `GET /api/forms?status=` newest update first
pub async fn list_forms(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FormListQuery>,
) -> Result<Json<FormListDto>, ApiError> {
    let status = parse_status(query.status.as_deref().filter(|s| !s.is_empty()))?;
    let forms: Vec<FormSummaryDto> = state
        .manage_form_usecase
        .list(status)
        .await?
        .iter()
        .map(FormSummaryDto::from)
        .collect();
    Ok(Json(FormListDto {
        count: forms.len(),
        forms,
    }))
}

pub async fn get_form(
    State(state): State<Arc<AppState>>,
    Path(form_id): Path<String>,
) -> Result<Json<FormSummaryDto>, ApiError> {
    let form_id = parse_form_id(form_id)?;
    let form = state.manage_form_usecase.get(&form_id).await?;
    Ok(Json(FormSummaryDto::from(&form)))
}

pub async fn update_form(
    State(state): State<Arc<AppState>>,
    Path(form_id): Path<String>,
    Json(request): Json<FormRequest>,
) -> Result<Json<FormSummaryDto>, ApiError> {
    let form_id = parse_form_id(form_id)?;
    let form = state
        .manage_form_usecase
        .update(&form_id, into_draft(request)?)
        .await?;
    Ok(Json(FormSummaryDto::from(&form)))
}

pub async fn submit_response(
    State(state): State<Arc<AppState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    Path(form_id): Path<String>,
    headers: HeaderMap,
    Json(request): Json<SubmitResponseRequest>,
) -> Result<(StatusCode, Json<SubmitResponseDto>), ApiError> {
    let form_id = parse_form_id(form_id)?;
    let record = state
        .submit_response_usecase
        .execute(&form_id, request.responses, request_metadata(&headers, peer))
        .await?;
    Ok(submitted(record))
}

/// Published form reached through its share URL
pub async fn get_public_form(
    State(state): State<Arc<AppState>>,
    Path(share_url): Path<String>,
) -> Result<Json<FormSummaryDto>, ApiError> {
    let share_url = parse_share_url(share_url)?;
    let form = state.manage_form_usecase.get_public(&share_url).await?;
    Ok(Json(FormSummaryDto::from(&form)))
}

pub async fn submit_public_response(
    State(state): State<Arc<AppState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    Path(share_url): Path<String>,
    headers: HeaderMap,
    Json(request): Json<SubmitResponseRequest>,
) -> Result<(StatusCode, Json<SubmitResponseDto>), ApiError> {
    let share_url = parse_share_url(share_url)?;
    let record = state
        .submit_response_usecase
        .execute_public(&share_url, request.responses, request_metadata(&headers, peer))
        .await?;
    Ok(submitted(record))
}

pub async fn list_responses(
    State(state): State<Arc<AppState>>,
    Path(form_id): Path<String>,
) -> Result<Json<Vec<ResponseRecordDto>>, ApiError> {
    let form_id = parse_form_id(form_id)?;
    let responses = state.submit_response_usecase.list(&form_id).await?;
    Ok(Json(responses.iter().map(ResponseRecordDto::from).collect()))
}

pub async fn get_analytics(
    State(state): State<Arc<AppState>>,
    Path(form_id): Path<String>,
) -> Result<Json<FormAnalyticsDto>, ApiError> {
    let form_id = parse_form_id(form_id)?;
    let statistics = state.publish_analytics_usecase.compute(&form_id).await?;
    Ok(Json(FormAnalyticsDto::from(&statistics)))
}
