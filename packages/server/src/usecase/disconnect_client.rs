//! UseCase: クライアント切断処理
//!
//! 接続の読み取りループ終了時と、ブロードキャストの送信失敗時（退去）の
//! 両方から呼ばれます。どちらが先に、あるいは同時に呼んでも、
//! 実際の後始末が行われるのは 1 回だけです。

use std::sync::Arc;

use crate::domain::{ClientId, ConnectionRegistry, RoomIndex};

/// クライアント切断のユースケース
pub struct DisconnectClientUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    rooms: Arc<dyn RoomIndex>,
}

impl DisconnectClientUseCase {
    /// 新しい DisconnectClientUseCase を作成
    pub fn new(registry: Arc<dyn ConnectionRegistry>, rooms: Arc<dyn RoomIndex>) -> Self {
        Self { registry, rooms }
    }

    /// 全てのルームから抜けさせ、レジストリから登録解除する
    ///
    /// # Returns
    ///
    /// * `true` - この呼び出しでクライアントが登録解除された
    /// * `false` - 既に登録解除済み（何もしていない）
    pub async fn execute(&self, client_id: &ClientId) -> bool {
        let left = self.rooms.leave_all(client_id).await;
        let removed = self.registry.unregister(client_id).await;
        if removed {
            tracing::info!(
                "Client '{}' removed from registry and {} room(s)",
                client_id,
                left.len()
            );
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{FormId, Timestamp},
        infrastructure::{registry::WebSocketConnectionRegistry, room::InMemoryRoomIndex},
    };
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn create_test_usecase() -> (
        Arc<DisconnectClientUseCase>,
        Arc<WebSocketConnectionRegistry>,
        Arc<InMemoryRoomIndex>,
    ) {
        let registry = Arc::new(WebSocketConnectionRegistry::new(Duration::from_millis(50)));
        let rooms = Arc::new(InMemoryRoomIndex::new());
        let usecase = Arc::new(DisconnectClientUseCase::new(registry.clone(), rooms.clone()));
        (usecase, registry, rooms)
    }

    #[tokio::test]
    async fn test_disconnect_removes_client_everywhere() {
        // テスト項目: 切断するとレジストリと全てのルームから削除され、空ルームも消える
        // given (前提条件):
        let (usecase, registry, rooms) = create_test_usecase();
        let (tx, _rx) = mpsc::channel(8);
        let client_id = registry.register(tx, Timestamp::new(0)).await;
        let survey = FormId::new("survey".to_string()).unwrap();
        let poll = FormId::new("poll".to_string()).unwrap();
        rooms.join(&client_id, &survey).await;
        rooms.join(&client_id, &poll).await;

        // when (操作):
        let removed = usecase.execute(&client_id).await;

        // then (期待する結果):
        assert!(removed);
        assert!(registry.get(&client_id).await.is_none());
        assert!(!rooms.contains_room(&survey).await);
        assert!(!rooms.contains_room(&poll).await);
    }

    #[tokio::test]
    async fn test_concurrent_disconnect_tears_down_once() {
        // テスト項目: 同じクライアントの切断が同時に起きても後始末は 1 回だけ
        // given (前提条件):
        let (usecase, registry, rooms) = create_test_usecase();
        let (tx, _rx) = mpsc::channel(8);
        let client_id = registry.register(tx, Timestamp::new(0)).await;
        rooms
            .join(&client_id, &FormId::new("survey".to_string()).unwrap())
            .await;

        // when (操作):
        let first = {
            let usecase = usecase.clone();
            let client_id = client_id.clone();
            tokio::spawn(async move { usecase.execute(&client_id).await })
        };
        let second = {
            let usecase = usecase.clone();
            let client_id = client_id.clone();
            tokio::spawn(async move { usecase.execute(&client_id).await })
        };
        let results = [first.await.unwrap(), second.await.unwrap()];

        // then (期待する結果):
        assert_eq!(results.iter().filter(|removed| **removed).count(), 1);
        assert_eq!(registry.count().await, 0);
        assert_eq!(rooms.room_count().await, 0);
    }

    #[tokio::test]
    async fn test_disconnect_unknown_client_is_noop() {
        // テスト項目: 登録されていないクライアントの切断は何もしない
        // given (前提条件):
        let (usecase, _registry, _rooms) = create_test_usecase();
        let unknown = ClientId::new("unknown".to_string()).unwrap();

        // when (操作):
        let removed = usecase.execute(&unknown).await;

        // then (期待する結果):
        assert!(!removed);
    }
}
