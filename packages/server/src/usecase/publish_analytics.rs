//! UseCase: 集計結果の再計算と配信
//!
//! HTTP 層から回答が保存されるたびに呼ばれ、フォームの全回答から
//! 統計を再計算して `analytics-update` としてルームに配信します。
//! 差分は保持せず、毎回すべて計算し直します。

use std::sync::Arc;

use formpulse_shared::time::Clock;
use tokio::task::JoinHandle;

use crate::{
    domain::{Form, FormId, FormRepository, FormStatistics, ResponseRecord, Timestamp, compute_statistics},
    infrastructure::dto::websocket::{AnalyticsUpdateMessage, FormUpdateMessage},
};

use super::{AnalyticsError, BroadcastReport, BroadcastUseCase};

/// 集計・配信のユースケース
pub struct PublishAnalyticsUseCase {
    repository: Arc<dyn FormRepository>,
    broadcast: Arc<BroadcastUseCase>,
    clock: Arc<dyn Clock>,
}

impl PublishAnalyticsUseCase {
    /// 新しい PublishAnalyticsUseCase を作成
    pub fn new(
        repository: Arc<dyn FormRepository>,
        broadcast: Arc<BroadcastUseCase>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            broadcast,
            clock,
        }
    }

    /// フォームの統計を計算
    pub async fn compute(&self, form_id: &FormId) -> Result<FormStatistics, AnalyticsError> {
        let form = self
            .repository
            .find_form(form_id)
            .await?
            .ok_or_else(|| AnalyticsError::FormNotFound(form_id.to_string()))?;
        let schema = self.repository.fetch_schema(form_id).await?;
        let responses = self.repository.fetch_responses(form_id).await?;

        Ok(compute_statistics(
            form_id,
            &form.title,
            &schema,
            &responses,
            Timestamp::new(self.clock.now_millis()),
        ))
    }

    /// 新しい回答が保存されたときに統計を再計算して配信
    ///
    /// 購読者がいない場合は計算自体を省略します。
    pub async fn on_new_response(
        &self,
        form_id: &FormId,
        record: &ResponseRecord,
    ) -> Result<BroadcastReport, AnalyticsError> {
        if !self.broadcast.has_subscribers(form_id).await {
            tracing::debug!(
                "Response '{}' stored; no analytics subscribers for form '{}'",
                record.id.as_str(),
                form_id
            );
            return Ok(BroadcastReport::default());
        }

        let statistics = self.compute(form_id).await?;
        let payload = serde_json::to_string(&AnalyticsUpdateMessage::new(&statistics))?;
        tracing::info!(
            "Broadcasting analytics update for form '{}' ({} responses)",
            form_id,
            statistics.total_responses
        );
        Ok(self.broadcast.execute(form_id, &payload).await)
    }

    /// `on_new_response` をバックグラウンドで実行（呼び出し元は完了を待たない）
    ///
    /// 失敗はログに記録されるだけで、元のリクエストには影響しません。
    pub fn spawn_on_new_response(
        self: &Arc<Self>,
        form_id: FormId,
        record: ResponseRecord,
    ) -> JoinHandle<()> {
        let this = Arc::clone(self);
        tokio::spawn(async move {
            match this.on_new_response(&form_id, &record).await {
                Ok(report) if !report.evicted.is_empty() => {
                    tracing::info!(
                        "Analytics update for form '{}' evicted {} client(s)",
                        form_id,
                        report.evicted.len()
                    );
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!("Failed to publish analytics for form '{}': {}", form_id, e);
                }
            }
        })
    }

    /// フォーム構造の変更を `form-update` として配信
    pub async fn publish_form_update(&self, form: &Form) -> Result<BroadcastReport, AnalyticsError> {
        let payload = serde_json::to_string(&FormUpdateMessage::new(form))?;
        tracing::info!("Broadcasting form update for form '{}'", form.id);
        Ok(self.broadcast.execute(&form.id, &payload).await)
    }
}
