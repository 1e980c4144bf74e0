//! UseCase: 回答の送信と一覧取得
//!
//! 回答を保存したあと、集計の再計算と配信をバックグラウンドで開始します。
//! 配信の成否は送信リクエストの結果に影響しません。

use std::sync::Arc;

use formpulse_shared::time::Clock;
use serde_json::{Map, Value};

use crate::domain::{
    Form, FormId, FormRepository, RequestMetadata, ResponseRecord, ShareUrl, Timestamp,
};

use super::{PublishAnalyticsUseCase, SubmitResponseError};

/// 回答送信のユースケース
pub struct SubmitResponseUseCase {
    repository: Arc<dyn FormRepository>,
    publisher: Arc<PublishAnalyticsUseCase>,
    clock: Arc<dyn Clock>,
}

impl SubmitResponseUseCase {
    /// 新しい SubmitResponseUseCase を作成
    pub fn new(
        repository: Arc<dyn FormRepository>,
        publisher: Arc<PublishAnalyticsUseCase>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            publisher,
            clock,
        }
    }

    /// 回答を保存し、集計の配信を開始
    ///
    /// 公開されていないフォームへの回答は受け付けません。
    pub async fn execute(
        &self,
        form_id: &FormId,
        document: Map<String, Value>,
        metadata: RequestMetadata,
    ) -> Result<ResponseRecord, SubmitResponseError> {
        let form = self
            .repository
            .find_form(form_id)
            .await?
            .ok_or_else(|| SubmitResponseError::FormNotFound(form_id.to_string()))?;
        if !form.is_published() {
            return Err(SubmitResponseError::FormNotPublished(form_id.to_string()));
        }
        self.store(form, document, metadata).await
    }

    /// 共有 URL で指定された公開フォームへ回答
    ///
    /// 共有 URL が未知、またはフォームが公開されていない場合はどちらも
    /// `FormNotFound` を返します。
    pub async fn execute_public(
        &self,
        share_url: &ShareUrl,
        document: Map<String, Value>,
        metadata: RequestMetadata,
    ) -> Result<ResponseRecord, SubmitResponseError> {
        let form = self
            .repository
            .find_form_by_share_url(share_url)
            .await?
            .filter(Form::is_published)
            .ok_or_else(|| SubmitResponseError::FormNotFound(share_url.to_string()))?;
        self.store(form, document, metadata).await
    }

    async fn store(
        &self,
        form: Form,
        document: Map<String, Value>,
        metadata: RequestMetadata,
    ) -> Result<ResponseRecord, SubmitResponseError> {
        let record = ResponseRecord::new(
            form.id,
            document,
            Timestamp::new(self.clock.now_millis()),
            Some(metadata),
        );
        self.repository.insert_response(record.clone()).await?;
        tracing::info!(
            "Response '{}' stored for form '{}'",
            record.id.as_str(),
            record.form_id
        );

        self.publisher
            .spawn_on_new_response(record.form_id.clone(), record.clone());
        Ok(record)
    }

    /// フォームの回答を新しい順に取得
    pub async fn list(&self, form_id: &FormId) -> Result<Vec<ResponseRecord>, SubmitResponseError> {
        if self.repository.find_form(form_id).await?.is_none() {
            return Err(SubmitResponseError::FormNotFound(form_id.to_string()));
        }
        let mut responses = self.repository.fetch_responses(form_id).await?;
        responses.reverse();
        Ok(responses)
    }
}
