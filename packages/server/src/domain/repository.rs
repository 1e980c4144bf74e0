//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{FieldSchema, Form, FormId, FormStatus, RepositoryError, ResponseRecord, ShareUrl};

/// Form Repository trait
///
/// フォームと回答を保持するデータストアへのインターフェース。
/// 集計処理が必要とするのは `fetch_schema` と `fetch_responses` の 2 つだけで、
/// 残りは HTTP 層のための単純な CRUD 操作です。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FormRepository: Send + Sync {
    /// フォームを新規登録
    async fn insert_form(&self, form: Form) -> Result<(), RepositoryError>;

    /// フォームを取得（存在しない場合は `None`）
    async fn find_form(&self, form_id: &FormId) -> Result<Option<Form>, RepositoryError>;

    /// 共有 URL からフォームを取得（存在しない場合は `None`）
    async fn find_form_by_share_url(
        &self,
        share_url: &ShareUrl,
    ) -> Result<Option<Form>, RepositoryError>;

    /// フォーム一覧を更新時刻の新しい順で取得（`status` 指定時はその状態のみ）
    async fn list_forms(&self, status: Option<FormStatus>) -> Result<Vec<Form>, RepositoryError>;

    /// 既存のフォームを置き換え
    async fn update_form(&self, form: Form) -> Result<(), RepositoryError>;

    /// 回答を追加
    async fn insert_response(&self, response: ResponseRecord) -> Result<(), RepositoryError>;

    /// フォームの全回答を送信時刻の昇順で取得（同時刻は登録順）
    async fn fetch_responses(
        &self,
        form_id: &FormId,
    ) -> Result<Vec<ResponseRecord>, RepositoryError>;

    /// フォームのフィールド定義を order 順で取得
    async fn fetch_schema(&self, form_id: &FormId) -> Result<Vec<FieldSchema>, RepositoryError>;
}
