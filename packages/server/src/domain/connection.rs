//! Live connection state: the connection registry and the room index.
//!
//! The registry is the only owner of a connection's outbound channel. The room
//! index refers to connections by `ClientId` alone, so evicting a client means
//! removing it from both structures; each keeps its own lock.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ClientId, FormId, PushError, Timestamp};

/// Outbound channel of a single connection, drained by its writer task.
pub type PusherChannel = mpsc::Sender<String>;

/// Registry of live connections keyed by client id.
#[async_trait]
pub trait ConnectionRegistry: Send + Sync {
    /// Register a connection and assign it a fresh client id.
    async fn register(&self, sender: PusherChannel, connected_at: Timestamp) -> ClientId;

    /// Remove a connection. Returns `true` only for the call that actually
    /// removed it, so concurrent evictions tear a client down once.
    async fn unregister(&self, client_id: &ClientId) -> bool;

    /// Look up a connection's outbound channel.
    async fn get(&self, client_id: &ClientId) -> Option<PusherChannel>;

    /// Send one payload to one connection. Failure means the caller should
    /// evict the client; it is never a request-level error.
    async fn send(&self, client_id: &ClientId, payload: &str) -> Result<(), PushError>;

    /// Number of live connections.
    async fn count(&self) -> usize;
}

/// Room membership: form id -> subscribed client ids.
#[async_trait]
pub trait RoomIndex: Send + Sync {
    /// Subscribe a client. Returns `false` when it was already a member.
    async fn join(&self, client_id: &ClientId, form_id: &FormId) -> bool;

    /// Unsubscribe a client. Returns `false` when it was not a member.
    async fn leave(&self, client_id: &ClientId, form_id: &FormId) -> bool;

    /// Remove a client from every room; returns the rooms it left.
    async fn leave_all(&self, client_id: &ClientId) -> Vec<FormId>;

    /// Point-in-time snapshot of a room's members.
    async fn members_of(&self, form_id: &FormId) -> Vec<ClientId>;

    /// Whether a room currently exists (has at least one member).
    async fn contains_room(&self, form_id: &FormId) -> bool;

    /// Number of non-empty rooms.
    async fn room_count(&self) -> usize;
}
