//! UseCase: 集計ルームへの参加・退出

use std::sync::Arc;

use crate::domain::{ClientId, FormId, RoomIndex};

/// `join-analytics` / `leave-analytics` のユースケース
pub struct RoomSubscriptionUseCase {
    rooms: Arc<dyn RoomIndex>,
}

impl RoomSubscriptionUseCase {
    pub fn new(rooms: Arc<dyn RoomIndex>) -> Self {
        Self { rooms }
    }

    /// ルームに参加（既に参加済みなら何もしない）
    pub async fn join(&self, client_id: &ClientId, form_id: &FormId) {
        if self.rooms.join(client_id, form_id).await {
            tracing::info!("Client '{}' joined analytics room '{}'", client_id, form_id);
        } else {
            tracing::debug!("Client '{}' already in analytics room '{}'", client_id, form_id);
        }
    }

    /// ルームから退出（参加していなければ何もしない）
    pub async fn leave(&self, client_id: &ClientId, form_id: &FormId) {
        if self.rooms.leave(client_id, form_id).await {
            tracing::info!("Client '{}' left analytics room '{}'", client_id, form_id);
        }
    }

    /// 存在するルーム数を取得
    pub async fn count_rooms(&self) -> usize {
        self.rooms.room_count().await
    }
}
