//! InMemory Room Index 実装
//!
//! ドメイン層が定義する RoomIndex trait の具体的な実装。
//! form_id → client_id 集合の正引きと、client_id → form_id 集合の逆引きを
//! 1 つの RwLock で保護し、常に整合した状態に保ちます。
//!
//! 最後のメンバーが抜けたルームは即座に削除されます（空ルームを残さない）。

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{ClientId, FormId, RoomIndex};

#[derive(Default)]
struct Rooms {
    /// form_id → 購読中の client_id
    members: HashMap<FormId, HashSet<ClientId>>,
    /// client_id → 購読中の form_id（leave_all 用の逆引き）
    subscriptions: HashMap<ClientId, HashSet<FormId>>,
}

impl Rooms {
    fn remove_member(&mut self, client_id: &ClientId, form_id: &FormId) -> bool {
        let Some(room) = self.members.get_mut(form_id) else {
            return false;
        };
        let removed = room.remove(client_id);
        if room.is_empty() {
            self.members.remove(form_id);
        }
        removed
    }
}

/// インメモリ Room Index 実装
#[derive(Default)]
pub struct InMemoryRoomIndex {
    rooms: RwLock<Rooms>,
}

impl InMemoryRoomIndex {
    /// 新しい InMemoryRoomIndex を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoomIndex for InMemoryRoomIndex {
    async fn join(&self, client_id: &ClientId, form_id: &FormId) -> bool {
        let mut rooms = self.rooms.write().await;
        let joined = rooms
            .members
            .entry(form_id.clone())
            .or_default()
            .insert(client_id.clone());
        rooms
            .subscriptions
            .entry(client_id.clone())
            .or_default()
            .insert(form_id.clone());
        joined
    }

    async fn leave(&self, client_id: &ClientId, form_id: &FormId) -> bool {
        let mut rooms = self.rooms.write().await;
        if let Some(forms) = rooms.subscriptions.get_mut(client_id) {
            forms.remove(form_id);
            if forms.is_empty() {
                rooms.subscriptions.remove(client_id);
            }
        }
        rooms.remove_member(client_id, form_id)
    }

    async fn leave_all(&self, client_id: &ClientId) -> Vec<FormId> {
        let mut rooms = self.rooms.write().await;
        let Some(forms) = rooms.subscriptions.remove(client_id) else {
            return Vec::new();
        };
        for form_id in &forms {
            rooms.remove_member(client_id, form_id);
        }
        forms.into_iter().collect()
    }

    async fn members_of(&self, form_id: &FormId) -> Vec<ClientId> {
        let rooms = self.rooms.read().await;
        rooms
            .members
            .get(form_id)
            .map(|room| room.iter().cloned().collect())
            .unwrap_or_default()
    }

    async fn contains_room(&self, form_id: &FormId) -> bool {
        self.rooms.read().await.members.contains_key(form_id)
    }

    async fn room_count(&self) -> usize {
        self.rooms.read().await.members.len()
    }
}
