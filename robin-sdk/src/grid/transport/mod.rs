pub mod bayeux;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{broadcast, mpsc};
use uuid::Uuid;

pub use bayeux::BayeuxTransport;
pub use memory::MemoryTransport;

use super::{extension::Extension, message::Message};
use crate::errors::Result;

/// Capacity of the transport state event channel
pub(crate) const EVENT_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportEvent {
    Up,
    Down,
}

/// An active subscription. Messages stop when it is unsubscribed or the
/// transport goes away.
#[derive(Debug)]
pub struct Subscription {
    pub id: Uuid,
    pub pattern: String,
    pub messages: mpsc::UnboundedReceiver<Message>,
}

/// A pub/sub client the Grid talks through
#[async_trait]
pub trait GridTransport: Send + Sync {
    fn add_extension(&self, extension: Arc<dyn Extension>);

    async fn subscribe(&self, pattern: &str) -> Result<Subscription>;

    async fn unsubscribe(&self, id: Uuid) -> Result<()>;

    async fn publish(&self, channel: &str, data: Value) -> Result<()>;

    fn events(&self) -> broadcast::Receiver<TransportEvent>;
}

pub(crate) fn apply_outgoing(extensions: &[Arc<dyn Extension>], message: Message) -> Message {
    extensions
        .iter()
        .fold(message, |message, extension| extension.outgoing(message))
}

pub(crate) fn apply_incoming(extensions: &[Arc<dyn Extension>], message: Message) -> Message {
    extensions
        .iter()
        .fold(message, |message, extension| extension.incoming(message))
}
