//! InMemory Form Repository 実装
//!
//! ドメイン層が定義する FormRepository trait の具体的な実装。
//! HashMap / Vec をインメモリ DB として使用します。
//!
//! 回答は登録順の Vec に保持するため、送信時刻でソートする際に
//! 安定ソートを使えば「同時刻は登録順」がそのまま満たされます。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{
    FieldSchema, Form, FormId, FormRepository, FormStatus, RepositoryError, ResponseRecord,
    ShareUrl,
};

/// インメモリ Form Repository 実装
#[derive(Default)]
pub struct InMemoryFormRepository {
    forms: RwLock<HashMap<FormId, Form>>,
    /// 登録順の回答
    responses: RwLock<Vec<ResponseRecord>>,
}

impl InMemoryFormRepository {
    /// 新しい InMemoryFormRepository を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FormRepository for InMemoryFormRepository {
    async fn insert_form(&self, form: Form) -> Result<(), RepositoryError> {
        let mut forms = self.forms.write().await;
        if forms.contains_key(&form.id) {
            return Err(RepositoryError::DuplicateForm(form.id.into_string()));
        }
        forms.insert(form.id.clone(), form);
        Ok(())
    }

    async fn find_form(&self, form_id: &FormId) -> Result<Option<Form>, RepositoryError> {
        Ok(self.forms.read().await.get(form_id).cloned())
    }

    async fn find_form_by_share_url(
        &self,
        share_url: &ShareUrl,
    ) -> Result<Option<Form>, RepositoryError> {
        let forms = self.forms.read().await;
        Ok(forms
            .values()
            .find(|form| form.share_url.as_ref() == Some(share_url))
            .cloned())
    }

    async fn list_forms(&self, status: Option<FormStatus>) -> Result<Vec<Form>, RepositoryError> {
        let mut forms: Vec<Form> = self
            .forms
            .read()
            .await
            .values()
            .filter(|form| status.is_none_or(|status| form.status == status))
            .cloned()
            .collect();
        forms.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(forms)
    }

    async fn update_form(&self, form: Form) -> Result<(), RepositoryError> {
        let mut forms = self.forms.write().await;
        match forms.get_mut(&form.id) {
            Some(existing) => {
                *existing = form;
                Ok(())
            }
            None => Err(RepositoryError::FormNotFound(form.id.into_string())),
        }
    }

    async fn insert_response(&self, response: ResponseRecord) -> Result<(), RepositoryError> {
        if !self.forms.read().await.contains_key(&response.form_id) {
            return Err(RepositoryError::FormNotFound(
                response.form_id.into_string(),
            ));
        }
        self.responses.write().await.push(response);
        Ok(())
    }

    async fn fetch_responses(
        &self,
        form_id: &FormId,
    ) -> Result<Vec<ResponseRecord>, RepositoryError> {
        let mut responses: Vec<ResponseRecord> = self
            .responses
            .read()
            .await
            .iter()
            .filter(|r| &r.form_id == form_id)
            .cloned()
            .collect();
        responses.sort_by_key(|r| r.submitted_at);
        Ok(responses)
    }

    async fn fetch_schema(&self, form_id: &FormId) -> Result<Vec<FieldSchema>, RepositoryError> {
        self.forms
            .read()
            .await
            .get(form_id)
            .map(Form::ordered_fields)
            .ok_or_else(|| RepositoryError::FormNotFound(form_id.to_string()))
    }
}
