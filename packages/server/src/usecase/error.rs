//! UseCase 層のエラー型

use thiserror::Error;

use crate::domain::RepositoryError;

/// フォーム作成・更新・取得のエラー
#[derive(Debug, Error)]
pub enum FormError {
    #[error("Invalid form: {0}")]
    Validation(String),

    #[error("Form '{0}' not found")]
    NotFound(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// 回答送信のエラー
#[derive(Debug, Error)]
pub enum SubmitResponseError {
    #[error("Form '{0}' not found")]
    FormNotFound(String),

    #[error("Form '{0}' is not accepting responses")]
    FormNotPublished(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// 集計・配信のエラー
#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("Form '{0}' not found")]
    FormNotFound(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("Failed to encode event: {0}")]
    Encode(#[from] serde_json::Error),
}
