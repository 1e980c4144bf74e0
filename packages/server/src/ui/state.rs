//! Server state shared by every handler.

use std::sync::Arc;

use formpulse_shared::time::{Clock, SystemClock};

use crate::{
    config::ServerConfig,
    infrastructure::{
        registry::WebSocketConnectionRegistry, repository::InMemoryFormRepository,
        room::InMemoryRoomIndex,
    },
    usecase::{
        BroadcastUseCase, ConnectClientUseCase, DisconnectClientUseCase, ManageFormUseCase,
        PublishAnalyticsUseCase, RoomSubscriptionUseCase, SubmitResponseUseCase,
    },
};

/// Shared application state
pub struct AppState {
    /// ConnectClientUseCase（接続登録のユースケース）
    pub connect_client_usecase: Arc<ConnectClientUseCase>,
    /// DisconnectClientUseCase（切断処理のユースケース）
    pub disconnect_client_usecase: Arc<DisconnectClientUseCase>,
    /// RoomSubscriptionUseCase（ルーム参加・退出のユースケース）
    pub room_subscription_usecase: Arc<RoomSubscriptionUseCase>,
    /// ManageFormUseCase（フォーム管理のユースケース）
    pub manage_form_usecase: Arc<ManageFormUseCase>,
    /// SubmitResponseUseCase（回答送信のユースケース）
    pub submit_response_usecase: Arc<SubmitResponseUseCase>,
    /// PublishAnalyticsUseCase（集計・配信のユースケース）
    pub publish_analytics_usecase: Arc<PublishAnalyticsUseCase>,
    /// 接続ごとの送信キューの容量
    pub outbound_buffer: usize,
}

impl AppState {
    /// Wire every use case against the in-memory implementations.
    ///
    /// Dependencies are created in order:
    /// 1. Repository, ConnectionRegistry, RoomIndex
    /// 2. Broadcast / analytics publishing
    /// 3. The remaining use cases
    pub fn in_memory(config: &ServerConfig) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        // 1. Storage and live connection state
        let repository = Arc::new(InMemoryFormRepository::new());
        let registry = Arc::new(WebSocketConnectionRegistry::new(config.send_timeout));
        let rooms = Arc::new(InMemoryRoomIndex::new());

        // 2. Fan-out
        let broadcast = Arc::new(BroadcastUseCase::new(registry.clone(), rooms.clone()));
        let publish_analytics_usecase = Arc::new(PublishAnalyticsUseCase::new(
            repository.clone(),
            broadcast,
            clock.clone(),
        ));

        // 3. UseCases
        Self {
            connect_client_usecase: Arc::new(ConnectClientUseCase::new(
                registry.clone(),
                clock.clone(),
            )),
            disconnect_client_usecase: Arc::new(DisconnectClientUseCase::new(
                registry,
                rooms.clone(),
            )),
            room_subscription_usecase: Arc::new(RoomSubscriptionUseCase::new(rooms)),
            manage_form_usecase: Arc::new(ManageFormUseCase::new(
                repository.clone(),
                publish_analytics_usecase.clone(),
                clock.clone(),
            )),
            submit_response_usecase: Arc::new(SubmitResponseUseCase::new(
                repository,
                publish_analytics_usecase.clone(),
                clock,
            )),
            publish_analytics_usecase,
            outbound_buffer: config.outbound_buffer.max(1),
        }
    }
}
