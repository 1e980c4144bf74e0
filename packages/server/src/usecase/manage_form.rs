//! UseCase: フォームの作成・更新・取得
//!
//! 検証は最小限（タイトルが空でないこと、フィールド ID が空でなく重複しないこと）です。
//! 更新時はルームの購読者に `form-update` を配信します。
//! 共有 URL は初めて公開されたときに発行され、以後は変わりません。

use std::{collections::HashSet, sync::Arc};

use formpulse_shared::time::Clock;

use crate::domain::{
    FieldSchema, Form, FormId, FormRepository, FormStatus, ShareUrl, Timestamp,
};

use super::{FormError, PublishAnalyticsUseCase};

/// 作成・更新リクエストの内容
#[derive(Debug, Clone, PartialEq)]
pub struct FormDraft {
    pub title: String,
    pub description: String,
    pub fields: Vec<FieldSchema>,
    /// `None` の場合は作成時・更新時とも draft
    pub status: Option<FormStatus>,
}

impl FormDraft {
    fn validate(&self) -> Result<(), FormError> {
        if self.title.trim().is_empty() {
            return Err(FormError::Validation("title must not be empty".to_string()));
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.id.trim().is_empty() {
                return Err(FormError::Validation(
                    "field id must not be empty".to_string(),
                ));
            }
            if !seen.insert(field.id.as_str()) {
                return Err(FormError::Validation(format!(
                    "duplicate field id '{}'",
                    field.id
                )));
            }
        }
        Ok(())
    }
}

/// フォーム管理のユースケース
pub struct ManageFormUseCase {
    repository: Arc<dyn FormRepository>,
    publisher: Arc<PublishAnalyticsUseCase>,
    clock: Arc<dyn Clock>,
}

impl ManageFormUseCase {
    /// 新しい ManageFormUseCase を作成
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

    /// フォームを作成
    pub async fn create(&self, draft: FormDraft) -> Result<Form, FormError> {
        draft.validate()?;

        let now = Timestamp::new(self.clock.now_millis());
        let mut form = Form {
            id: FormId::generate(),
            title: draft.title,
            description: draft.description,
            fields: draft.fields,
            status: draft.status.unwrap_or_default(),
            share_url: None,
            created_at: now,
            updated_at: now,
        };
        form.ensure_share_url();
        self.repository.insert_form(form.clone()).await?;

        tracing::info!("Form '{}' created ({})", form.id, form.status.as_str());
        Ok(form)
    }

    /// フォームを取得
    pub async fn get(&self, form_id: &FormId) -> Result<Form, FormError> {
        self.repository
            .find_form(form_id)
            .await?
            .ok_or_else(|| FormError::NotFound(form_id.to_string()))
    }

    /// フォーム一覧を更新の新しい順に取得
    pub async fn list(&self, status: Option<FormStatus>) -> Result<Vec<Form>, FormError> {
        Ok(self.repository.list_forms(status).await?)
    }

    /// 共有 URL から公開中のフォームを取得
    ///
    /// 下書きのフォームは存在しないものとして扱います。
    pub async fn get_public(&self, share_url: &ShareUrl) -> Result<Form, FormError> {
        self.repository
            .find_form_by_share_url(share_url)
            .await?
            .filter(Form::is_published)
            .ok_or_else(|| FormError::NotFound(share_url.to_string()))
    }

    /// フォームを更新し、購読者に `form-update` を配信
    ///
    /// 状態を省略した更新は draft に戻します。
    pub async fn update(&self, form_id: &FormId, draft: FormDraft) -> Result<Form, FormError> {
        draft.validate()?;

        let current = self.get(form_id).await?;
        let mut form = Form {
            id: current.id,
            title: draft.title,
            description: draft.description,
            fields: draft.fields,
            status: draft.status.unwrap_or_default(),
            share_url: current.share_url,
            created_at: current.created_at,
            updated_at: Timestamp::new(self.clock.now_millis()),
        };
        form.ensure_share_url();
        self.repository.update_form(form.clone()).await?;
        tracing::info!("Form '{}' updated", form.id);

        if let Err(e) = self.publisher.publish_form_update(&form).await {
            tracing::warn!("Failed to publish form update for '{}': {}", form.id, e);
        }
        Ok(form)
    }
}
