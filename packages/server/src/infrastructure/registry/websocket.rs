//! WebSocket を使った ConnectionRegistry 実装
//!
//! ## 責務
//!
//! - 接続ごとの送信チャンネル（`mpsc::Sender`）を client_id で管理
//! - client_id の払い出し、登録解除、単一クライアントへの送信
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は生成された送信チャンネルを受け取り、メッセージ送信に使用します。
//!
//! 送信時はロックを保持しません。読み取りロックの中でチャンネルを複製し、
//! ロックを解放してから `send_timeout` で書き込みます。

use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;
use formpulse_shared::time::timestamp_to_rfc3339;
use tokio::sync::{RwLock, mpsc::error::SendTimeoutError};

use crate::domain::{
    ClientId, ClientIdFactory, ConnectionRegistry, PushError, PusherChannel, Timestamp,
};

/// 接続中のクライアント情報
struct ClientConnection {
    /// 書き込みタスクへの送信チャンネル
    sender: PusherChannel,
    /// 接続時刻
    connected_at: Timestamp,
}

/// WebSocket を使った ConnectionRegistry 実装
///
/// ## 使用例
///
/// ```ignore
/// let registry = WebSocketConnectionRegistry::new(Duration::from_secs(5));
/// let (tx, rx) = mpsc::channel(64);
/// let client_id = registry.register(tx, Timestamp::new(now)).await;
/// registry.send(&client_id, "{\"type\":\"connected\"}").await?;
/// ```
pub struct WebSocketConnectionRegistry {
    /// Key: client_id, Value: 接続情報
    clients: RwLock<HashMap<ClientId, ClientConnection>>,
    /// 1 回の送信に許容する最大待ち時間
    send_timeout: Duration,
}

impl WebSocketConnectionRegistry {
    /// 新しい WebSocketConnectionRegistry を作成
    pub fn new(send_timeout: Duration) -> Self {
        Self {
            clients: RwLock::new(HashMap::new()),
            send_timeout,
        }
    }
}

#[async_trait]
impl ConnectionRegistry for WebSocketConnectionRegistry {
    async fn register(&self, sender: PusherChannel, connected_at: Timestamp) -> ClientId {
        let mut clients = self.clients.write().await;
        // never overwrite a live connection on an id collision
        let client_id = loop {
            let candidate = ClientIdFactory::generate();
            if !clients.contains_key(&candidate) {
                break candidate;
            }
        };
        clients.insert(
            client_id.clone(),
            ClientConnection {
                sender,
                connected_at,
            },
        );
        tracing::debug!("Client '{}' registered", client_id);
        client_id
    }

    async fn unregister(&self, client_id: &ClientId) -> bool {
        let mut clients = self.clients.write().await;
        match clients.remove(client_id) {
            Some(connection) => {
                tracing::debug!(
                    "Client '{}' unregistered (connected at {})",
                    client_id,
                    timestamp_to_rfc3339(connection.connected_at.value())
                );
                true
            }
            None => false,
        }
    }

    async fn get(&self, client_id: &ClientId) -> Option<PusherChannel> {
        let clients = self.clients.read().await;
        clients.get(client_id).map(|c| c.sender.clone())
    }

    async fn send(&self, client_id: &ClientId, payload: &str) -> Result<(), PushError> {
        let sender = self
            .get(client_id)
            .await
            .ok_or_else(|| PushError::ClientNotFound(client_id.to_string()))?;

        sender
            .send_timeout(payload.to_string(), self.send_timeout)
            .await
            .map_err(|e| match e {
                SendTimeoutError::Timeout(_) => PushError::Timeout(client_id.to_string()),
                SendTimeoutError::Closed(_) => PushError::ChannelClosed(client_id.to_string()),
            })?;

        tracing::trace!("Pushed message to client '{}'", client_id);
        Ok(())
    }

    async fn count(&self) -> usize {
        self.clients.read().await.len()
    }
}
