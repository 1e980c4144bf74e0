//! UseCase layer: application operations composed from the domain traits.

mod broadcast;
mod connect_client;
mod disconnect_client;
mod error;
mod manage_form;
mod publish_analytics;
mod room_subscription;
mod submit_response;

pub use broadcast::{BroadcastReport, BroadcastUseCase};
pub use connect_client::ConnectClientUseCase;
pub use disconnect_client::DisconnectClientUseCase;
pub use error::{AnalyticsError, FormError, SubmitResponseError};
pub use manage_form::{FormDraft, ManageFormUseCase};
pub use publish_analytics::PublishAnalyticsUseCase;
pub use room_subscription::RoomSubscriptionUseCase;
pub use submit_response::SubmitResponseUseCase;
