//! Bayeux 1.0 client over HTTP long-polling

use std::{
    fmt,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Weak,
    },
    time::Duration,
};

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use reqwest::Client;
use serde_json::Value;
use tokio::{
    sync::{broadcast, mpsc, Mutex as AsyncMutex},
    task::JoinHandle,
};
use tracing::{debug, info, warn};
use url::Url;
use uuid::Uuid;

use super::{apply_incoming, apply_outgoing, GridTransport, Subscription, TransportEvent, EVENT_CAPACITY};
use crate::{
    errors::{Result, RobinError},
    grid::{
        channel::matches,
        extension::Extension,
        message::{
            Advice, Message, Reconnect, META_CONNECT, META_HANDSHAKE, META_SUBSCRIBE,
            META_UNSUBSCRIBE,
        },
    },
};

const BAYEUX_VERSION: &str = "1.0";
const LONG_POLLING: &str = "long-polling";
const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug)]
struct BayeuxSubscriber {
    pattern: String,
    sender: mpsc::UnboundedSender<Message>,
}

struct BayeuxInner {
    url: Url,
    http_client: Client,
    extensions: RwLock<Vec<Arc<dyn Extension>>>,
    subscribers: DashMap<Uuid, BayeuxSubscriber>,
    client_id: AsyncMutex<Option<String>>,
    advice: Mutex<Option<Advice>>,
    up: AtomicBool,
    events: broadcast::Sender<TransportEvent>,
    poller: Mutex<Option<JoinHandle<()>>>,
}

/// Long-polling Bayeux client for the Grid.
///
/// The handshake happens on first use. A background task then keeps a
/// `/meta/connect` request open and routes data messages to subscribers.
/// When a poll fails the transport reports [`TransportEvent::Down`], waits
/// for the interval the server advised and handshakes again, restoring every
/// subscription.
pub struct BayeuxTransport {
    inner: Arc<BayeuxInner>,
}

impl BayeuxTransport {
    pub fn new(url: &str, http_client: Client) -> Result<Self> {
        let url = Url::parse(url)
            .map_err(|e| RobinError::Configuration(format!("Invalid Grid URL {}: {}", url, e)))?;
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Ok(Self {
            inner: Arc::new(BayeuxInner {
                url,
                http_client,
                extensions: RwLock::new(Vec::new()),
                subscribers: DashMap::new(),
                client_id: AsyncMutex::new(None),
                advice: Mutex::new(None),
                up: AtomicBool::new(false),
                events,
                poller: Mutex::new(None),
            }),
        })
    }

    pub fn url(&self) -> &str {
        self.inner.url.as_str()
    }

    /// Handshake if needed and make sure the connect loop runs
    async fn ensure_connected(&self) -> Result<String> {
        let client_id = self.inner.client_id().await?;

        let mut poller = self.inner.poller.lock();
        if poller.as_ref().map_or(true, JoinHandle::is_finished) {
            let weak = Arc::downgrade(&self.inner);
            *poller = Some(tokio::spawn(connect_loop(weak)));
        }
        Ok(client_id)
    }
}

impl fmt::Debug for BayeuxTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BayeuxTransport")
            .field("url", &self.inner.url.as_str())
            .field("subscribers", &self.inner.subscribers.len())
            .field("up", &self.inner.up.load(Ordering::SeqCst))
            .finish()
    }
}

impl Drop for BayeuxTransport {
    fn drop(&mut self) {
        if let Some(poller) = self.inner.poller.lock().take() {
            poller.abort();
        }
    }
}

impl BayeuxInner {
    /// POST a batch of messages and return the replies, extensions applied
    /// both ways
    async fn exchange(&self, messages: Vec<Message>) -> Result<Vec<Message>> {
        let outgoing: Vec<Message> = {
            let extensions = self.extensions.read();
            messages
                .into_iter()
                .map(|message| apply_outgoing(&extensions, message))
                .collect()
        };

        let response = self
            .http_client
            .post(self.url.clone())
            .json(&outgoing)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RobinError::Transport(format!(
                "Grid responded with status {}",
                status
            )));
        }

        let replies: Vec<Message> = response.json().await?;
        let extensions = self.extensions.read();
        Ok(replies
            .into_iter()
            .map(|reply| apply_incoming(&extensions, reply))
            .collect())
    }

    /// The current client id, handshaking first when there is none
    async fn client_id(&self) -> Result<String> {
        let mut client_id = self.client_id.lock().await;
        if let Some(id) = client_id.as_ref() {
            return Ok(id.clone());
        }

        let id = self.handshake().await?;
        *client_id = Some(id.clone());
        drop(client_id);

        if !self.up.swap(true, Ordering::SeqCst) {
            let _ = self.events.send(TransportEvent::Up);
        }
        self.restore_subscriptions(&id).await;
        Ok(id)
    }

    async fn handshake(&self) -> Result<String> {
        let mut request = Message::new(META_HANDSHAKE);
        request.version = Some(BAYEUX_VERSION.to_string());
        request.supported_connection_types = Some(vec![LONG_POLLING.to_string()]);

        let replies = self.exchange(vec![request]).await?;
        let reply = replies
            .into_iter()
            .find(|reply| reply.channel == META_HANDSHAKE)
            .ok_or_else(|| RobinError::Transport("No handshake reply from the Grid".to_string()))?;

        if reply.advice.is_some() {
            *self.advice.lock() = reply.advice.clone();
        }

        match (reply.is_successful(), reply.client_id) {
            (true, Some(client_id)) => {
                info!("Grid handshake complete, client {}", client_id);
                Ok(client_id)
            }
            _ => Err(RobinError::Transport(format!(
                "Grid handshake failed: {}",
                reply.error.unwrap_or_else(|| "unknown error".to_string())
            ))),
        }
    }

    async fn send_subscribe(&self, client_id: &str, pattern: &str) -> Result<()> {
        let mut request = Message::new(META_SUBSCRIBE);
        request.client_id = Some(client_id.to_string());
        request.subscription = Some(pattern.to_string());
        self.expect_success(request).await
    }

    async fn send_unsubscribe(&self, client_id: &str, pattern: &str) -> Result<()> {
        let mut request = Message::new(META_UNSUBSCRIBE);
        request.client_id = Some(client_id.to_string());
        request.subscription = Some(pattern.to_string());
        self.expect_success(request).await
    }

    /// Send one message and fail unless its reply is successful
    async fn expect_success(&self, request: Message) -> Result<()> {
        let channel = request.channel.clone();
        let id = request.id.clone();
        let replies = self.exchange(vec![request]).await?;

        let mut acknowledged = false;
        for reply in replies {
            let is_ack = reply.channel == channel
                && match &reply.id {
                    Some(_) => reply.id == id,
                    None => reply.successful.is_some(),
                };
            if is_ack {
                if !reply.is_successful() {
                    return Err(RobinError::Transport(format!(
                        "{} was rejected: {}",
                        channel,
                        reply.error.unwrap_or_else(|| "unknown error".to_string())
                    )));
                }
                acknowledged = true;
            } else {
                self.dispatch(reply);
            }
        }

        if acknowledged {
            Ok(())
        } else {
            Err(RobinError::Transport(format!("No reply to {} from the Grid", channel)))
        }
    }

    /// Re-send `/meta/subscribe` for every pattern still in use after a new
    /// handshake
    async fn restore_subscriptions(&self, client_id: &str) {
        let mut patterns: Vec<String> = self
            .subscribers
            .iter()
            .map(|entry| entry.pattern.clone())
            .collect();
        patterns.sort();
        patterns.dedup();

        for pattern in patterns {
            if let Err(e) = self.send_subscribe(client_id, &pattern).await {
                warn!("Failed to restore subscription to {}: {}", pattern, e);
            }
        }
    }

    /// Route a data message to every matching subscriber
    fn dispatch(&self, message: Message) {
        if message.is_meta() {
            return;
        }
        self.subscribers.retain(|_, subscriber| {
            if !matches(&subscriber.pattern, &message.channel) {
                return true;
            }
            subscriber.sender.send(message.clone()).is_ok()
        });
    }

    fn retry_interval(&self) -> Duration {
        self.advice
            .lock()
            .as_ref()
            .and_then(|advice| advice.interval)
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_RETRY_INTERVAL)
    }

    async fn drop_client(&self) {
        *self.client_id.lock().await = None;
        if self.up.swap(false, Ordering::SeqCst) {
            debug!("Grid client dropped");
            let _ = self.events.send(TransportEvent::Down);
        }
    }

    /// One `/meta/connect` round trip. Returns false when the server asks
    /// the client to stop.
    async fn poll(&self) -> Result<bool> {
        let client_id = self.client_id().await?;

        let mut request = Message::new(META_CONNECT);
        request.client_id = Some(client_id);
        request.connection_type = Some(LONG_POLLING.to_string());

        for reply in self.exchange(vec![request]).await? {
            if reply.channel != META_CONNECT {
                self.dispatch(reply);
                continue;
            }

            if reply.advice.is_some() {
                *self.advice.lock() = reply.advice.clone();
            }
            let reconnect = reply.advice.as_ref().and_then(|advice| advice.reconnect);
            if reconnect == Some(Reconnect::None) {
                return Ok(false);
            }
            if !reply.is_successful() || reconnect == Some(Reconnect::Handshake) {
                debug!("Grid asked for a new handshake");
                *self.client_id.lock().await = None;
            }
        }
        Ok(true)
    }
}

async fn connect_loop(inner: Weak<BayeuxInner>) {
    loop {
        let Some(inner) = inner.upgrade() else {
            return;
        };

        match inner.poll().await {
            Ok(true) => {}
            Ok(false) => {
                info!("Grid closed the connection");
                inner.drop_client().await;
                return;
            }
            Err(e) => {
                warn!("Grid poll failed: {}", e);
                inner.drop_client().await;
                tokio::time::sleep(inner.retry_interval()).await;
            }
        }
    }
}

#[async_trait]
impl GridTransport for BayeuxTransport {
    fn add_extension(&self, extension: Arc<dyn Extension>) {
        self.inner.extensions.write().push(extension);
    }

    async fn subscribe(&self, pattern: &str) -> Result<Subscription> {
        let client_id = self.ensure_connected().await?;

        // Registered before the request so messages polled ahead of the
        // subscribe reply still find their subscriber
        let (sender, messages) = mpsc::unbounded_channel();
        let id = Uuid::new_v4();
        self.inner.subscribers.insert(
            id,
            BayeuxSubscriber {
                pattern: pattern.to_string(),
                sender,
            },
        );

        if let Err(e) = self.inner.send_subscribe(&client_id, pattern).await {
            self.inner.subscribers.remove(&id);
            return Err(e);
        }
        info!("Subscribed to {}", pattern);

        Ok(Subscription {
            id,
            pattern: pattern.to_string(),
            messages,
        })
    }

    async fn unsubscribe(&self, id: Uuid) -> Result<()> {
        let Some((_, removed)) = self.inner.subscribers.remove(&id) else {
            return Ok(());
        };
        let still_used = self
            .inner
            .subscribers
            .iter()
            .any(|entry| entry.pattern == removed.pattern);
        if still_used {
            return Ok(());
        }

        let client_id = self.inner.client_id.lock().await.clone();
        if let Some(client_id) = client_id {
            self.inner.send_unsubscribe(&client_id, &removed.pattern).await?;
            info!("Unsubscribed from {}", removed.pattern);
        }
        Ok(())
    }

    async fn publish(&self, channel: &str, data: Value) -> Result<()> {
        let client_id = self.ensure_connected().await?;
        let mut message = Message::publish(channel, data);
        message.client_id = Some(client_id);
        self.inner.expect_success(message).await
    }

    fn events(&self) -> broadcast::Receiver<TransportEvent> {
        self.inner.events.subscribe()
    }
}
