pub mod in_memory;

use crate::core::errors::DivvyError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Tag-only change hint. Receivers re-fetch full group state; the channel
/// carries no ordering guarantee and no payload beyond the tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GroupEvent {
    MemberJoined,
    ExpenseAdded,
    ExpenseDeleted,
}

impl GroupEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupEvent::MemberJoined => "member-joined",
            GroupEvent::ExpenseAdded => "expense-added",
            GroupEvent::ExpenseDeleted => "expense-deleted",
        }
    }
}

/// Broadcast-only fan-out per group. Delivery is advisory: a dropped or
/// lagged event only delays a peer's next refresh.
#[async_trait]
pub trait Realtime: Send + Sync {
    async fn broadcast(&self, group_id: &str, event: GroupEvent) -> Result<(), DivvyError>;
    async fn subscribe(&self, group_id: &str) -> broadcast::Receiver<GroupEvent>;
}
