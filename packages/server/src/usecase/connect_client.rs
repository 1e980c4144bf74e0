//! UseCase: クライアント接続処理

use std::sync::Arc;

use formpulse_shared::time::Clock;

use crate::domain::{ClientId, ConnectionRegistry, PushError, PusherChannel, Timestamp};

/// クライアント接続のユースケース
pub struct ConnectClientUseCase {
    /// ConnectionRegistry（接続管理の抽象化）
    registry: Arc<dyn ConnectionRegistry>,
    clock: Arc<dyn Clock>,
}

impl ConnectClientUseCase {
    /// 新しい ConnectClientUseCase を作成
    pub fn new(registry: Arc<dyn ConnectionRegistry>, clock: Arc<dyn Clock>) -> Self {
        Self { registry, clock }
    }

    /// 接続を登録し、払い出した client_id を返す
    pub async fn execute(&self, sender: PusherChannel) -> ClientId {
        let connected_at = Timestamp::new(self.clock.now_millis());
        self.registry.register(sender, connected_at).await
    }

    /// 接続直後の `connected` 通知を送信
    pub async fn acknowledge(&self, client_id: &ClientId, message: &str) -> Result<(), PushError> {
        self.registry.send(client_id, message).await
    }

    /// 接続中のクライアント数を取得
    pub async fn count_connections(&self) -> usize {
        self.registry.count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::registry::WebSocketConnectionRegistry;
    use formpulse_shared::time::FixedClock;
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn create_test_usecase() -> (ConnectClientUseCase, Arc<WebSocketConnectionRegistry>) {
        let registry = Arc::new(WebSocketConnectionRegistry::new(Duration::from_millis(50)));
        let usecase = ConnectClientUseCase::new(registry.clone(), Arc::new(FixedClock::new(1000)));
        (usecase, registry)
    }

    #[tokio::test]
    async fn test_connect_registers_client() {
        // テスト項目: 接続するとレジストリに登録され、払い出された client_id で参照できる
        // given (前提条件):
        let (usecase, registry) = create_test_usecase();
        let (tx, _rx) = mpsc::channel(8);

        // when (操作):
        let client_id = usecase.execute(tx).await;

        // then (期待する結果):
        assert_eq!(usecase.count_connections().await, 1);
        assert!(registry.get(&client_id).await.is_some());
    }

    #[tokio::test]
    async fn test_acknowledge_sends_to_the_new_client() {
        // テスト項目: connected 通知が接続したクライアントに届く
        // given (前提条件):
        let (usecase, _registry) = create_test_usecase();
        let (tx, mut rx) = mpsc::channel(8);
        let client_id = usecase.execute(tx).await;

        // when (操作):
        let result = usecase.acknowledge(&client_id, "{\"type\":\"connected\"}").await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(rx.recv().await.as_deref(), Some("{\"type\":\"connected\"}"));
    }
}
