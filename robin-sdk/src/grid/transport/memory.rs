use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use tokio::sync::{broadcast, mpsc};
use tracing::debug;
use uuid::Uuid;

use super::{apply_incoming, apply_outgoing, GridTransport, Subscription, TransportEvent, EVENT_CAPACITY};
use crate::{
    errors::Result,
    grid::{channel::matches, extension::Extension, message::Message},
};

#[derive(Debug)]
struct MemorySubscriber {
    pattern: String,
    sender: mpsc::UnboundedSender<Message>,
}

/// In-process broker.
///
/// Published messages are recorded and routed back to matching subscribers,
/// the way a Grid server would echo them. Tests inject server-side traffic
/// with [`deliver`](Self::deliver).
pub struct MemoryTransport {
    subscribers: Arc<DashMap<Uuid, MemorySubscriber>>,
    extensions: RwLock<Vec<Arc<dyn Extension>>>,
    published: Mutex<Vec<Message>>,
    events: broadcast::Sender<TransportEvent>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            subscribers: Arc::new(DashMap::new()),
            extensions: RwLock::new(Vec::new()),
            published: Mutex::new(Vec::new()),
            events,
        }
    }

    /// Hand a server-side message to every matching subscriber.
    ///
    /// Returns how many subscribers received it.
    pub fn deliver(&self, message: Message) -> usize {
        let message = apply_incoming(&self.extensions.read(), message);

        let mut delivered = 0;
        self.subscribers.retain(|_, subscriber| {
            if !matches(&subscriber.pattern, &message.channel) {
                return true;
            }
            match subscriber.sender.send(message.clone()) {
                Ok(()) => {
                    delivered += 1;
                    true
                }
                Err(_) => false,
            }
        });
        debug!("Delivered {} to {} subscribers", message.channel, delivered);
        delivered
    }

    /// Every message published so far, after outgoing extensions
    pub fn published(&self) -> Vec<Message> {
        self.published.lock().clone()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn set_down(&self) {
        let _ = self.events.send(TransportEvent::Down);
    }

    pub fn set_up(&self) {
        let _ = self.events.send(TransportEvent::Up);
    }
}

impl Default for MemoryTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GridTransport for MemoryTransport {
    fn add_extension(&self, extension: Arc<dyn Extension>) {
        self.extensions.write().push(extension);
    }

    async fn subscribe(&self, pattern: &str) -> Result<Subscription> {
        let (sender, messages) = mpsc::unbounded_channel();
        let id = Uuid::new_v4();
        self.subscribers.insert(
            id,
            MemorySubscriber {
                pattern: pattern.to_string(),
                sender,
            },
        );
        Ok(Subscription {
            id,
            pattern: pattern.to_string(),
            messages,
        })
    }

    async fn unsubscribe(&self, id: Uuid) -> Result<()> {
        self.subscribers.remove(&id);
        Ok(())
    }

    async fn publish(&self, channel: &str, data: Value) -> Result<()> {
        let outgoing = apply_outgoing(&self.extensions.read(), Message::publish(channel, data.clone()));
        self.published.lock().push(outgoing);

        self.deliver(Message::publish(channel, data));
        Ok(())
    }

    fn events(&self) -> broadcast::Receiver<TransportEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn routes_by_pattern() {
        let transport = MemoryTransport::new();
        let mut devices = transport.subscribe("/devices/15/*").await.unwrap();
        let mut other = transport.subscribe("/devices/16/*").await.unwrap();

        assert_eq!(transport.deliver(Message::publish("/devices/15/data", json!(1))), 1);

        assert_eq!(devices.messages.recv().await.unwrap().data, Some(json!(1)));
        assert!(other.messages.try_recv().is_err());
    }

    #[tokio::test]
    async fn unsubscribed_and_dropped_subscribers_are_removed() {
        let transport = MemoryTransport::new();
        let kept = transport.subscribe("/devices/15/*").await.unwrap();
        let removed = transport.subscribe("/devices/15/*").await.unwrap();
        let dropped = transport.subscribe("/devices/15/*").await.unwrap();

        transport.unsubscribe(removed.id).await.unwrap();
        drop(dropped);

        assert_eq!(transport.deliver(Message::publish("/devices/15/data", json!(1))), 1);
        assert_eq!(transport.subscriber_count(), 1);
        drop(kept);
    }

    #[tokio::test]
    async fn publish_is_recorded_and_echoed() {
        let transport = MemoryTransport::new();
        let mut subscription = transport.subscribe("/channels/7/*").await.unwrap();

        transport.publish("/channels/7/ping", json!({"n": 1})).await.unwrap();

        assert_eq!(transport.published().len(), 1);
        let echoed = subscription.messages.recv().await.unwrap();
        assert_eq!(echoed.channel, "/channels/7/ping");
    }

    #[tokio::test]
    async fn state_events() {
        let transport = MemoryTransport::new();
        let mut events = transport.events();
        transport.set_down();
        transport.set_up();
        assert_eq!(events.recv().await.unwrap(), TransportEvent::Down);
        assert_eq!(events.recv().await.unwrap(), TransportEvent::Up);
    }
}
