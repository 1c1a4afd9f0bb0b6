use crate::core::errors::DivvyError;
use crate::infrastructure::realtime::{GroupEvent, Realtime};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};
use tracing::debug;

const CHANNEL_CAPACITY: usize = 64;

/// One broadcast channel per group, created lazily on first use. Senders
/// are kept alive here so late subscribers still attach to the same stream.
#[derive(Clone, Default)]
pub struct InMemoryBroadcast {
    channels: Arc<RwLock<HashMap<String, broadcast::Sender<GroupEvent>>>>,
}

impl InMemoryBroadcast {
    pub fn new() -> Self {
        Self::default()
    }

    async fn sender(&self, group_id: &str) -> broadcast::Sender<GroupEvent> {
        if let Some(tx) = self.channels.read().await.get(group_id) {
            return tx.clone();
        }
        let mut channels = self.channels.write().await;
        channels
            .entry(group_id.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .clone()
    }
}

#[async_trait]
impl Realtime for InMemoryBroadcast {
    async fn broadcast(&self, group_id: &str, event: GroupEvent) -> Result<(), DivvyError> {
        let tx = self.sender(group_id).await;
        // A send error just means nobody is listening right now.
        let receivers = tx.send(event).unwrap_or(0);
        debug!(group_id, event = event.as_str(), receivers, "group event broadcast");
        Ok(())
    }

    async fn subscribe(&self, group_id: &str) -> broadcast::Receiver<GroupEvent> {
        self.sender(group_id).await.subscribe()
    }
}
