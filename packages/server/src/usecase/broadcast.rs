//! UseCase: ルームへのブロードキャスト
//!
//! ## 処理の流れ
//!
//! 1. ルームのメンバーをスナップショットとして取得（ここでロックは解放される）
//! 2. 全メンバーへ並行に送信（1 メンバーの遅延が他のメンバーを待たせない）
//! 3. 送信に失敗したメンバーを退去させる（ルームとレジストリの両方から削除）
//!
//! 配信は at-most-once のベストエフォートで、失敗が呼び出し元に
//! エラーとして返ることはありません。

use std::sync::Arc;

use futures_util::future::join_all;

use crate::domain::{ClientId, ConnectionRegistry, FormId, RoomIndex};

use super::DisconnectClientUseCase;

/// 1 回のブロードキャストの結果
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BroadcastReport {
    /// 送信に成功したクライアント
    pub delivered: Vec<ClientId>,
    /// 送信に失敗し退去させたクライアント
    pub evicted: Vec<ClientId>,
}

/// ブロードキャストのユースケース
pub struct BroadcastUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    rooms: Arc<dyn RoomIndex>,
    disconnect: DisconnectClientUseCase,
}

impl BroadcastUseCase {
    /// 新しい BroadcastUseCase を作成
    pub fn new(registry: Arc<dyn ConnectionRegistry>, rooms: Arc<dyn RoomIndex>) -> Self {
        let disconnect = DisconnectClientUseCase::new(registry.clone(), rooms.clone());
        Self {
            registry,
            rooms,
            disconnect,
        }
    }

    /// ルームに購読者がいるかどうか
    pub async fn has_subscribers(&self, form_id: &FormId) -> bool {
        self.rooms.contains_room(form_id).await
    }

    /// ルームの全メンバーにペイロードを送信
    ///
    /// # Arguments
    ///
    /// * `form_id` - 送信先ルームのフォーム ID
    /// * `payload` - 送信するメッセージ（JSON）
    pub async fn execute(&self, form_id: &FormId, payload: &str) -> BroadcastReport {
        let members = self.rooms.members_of(form_id).await;
        if members.is_empty() {
            tracing::debug!("No subscribers in room '{}', skipping broadcast", form_id);
            return BroadcastReport::default();
        }

        tracing::debug!(
            "Broadcasting to {} subscriber(s) of room '{}'",
            members.len(),
            form_id
        );

        let results = join_all(members.into_iter().map(|client_id| async move {
            let result = self.registry.send(&client_id, payload).await;
            (client_id, result)
        }))
        .await;

        let mut report = BroadcastReport::default();
        for (client_id, result) in results {
            match result {
                Ok(()) => report.delivered.push(client_id),
                Err(e) => {
                    tracing::warn!("Failed to push message to client '{}': {}", client_id, e);
                    self.disconnect.execute(&client_id).await;
                    report.evicted.push(client_id);
                }
            }
        }
        report
    }
}
