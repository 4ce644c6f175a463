use std::{fmt, sync::Arc};

use dashmap::DashMap;
use futures_util::{future, Stream, StreamExt};
use serde_json::Value;
use tokio::{
    sync::{broadcast, Mutex},
    task::JoinHandle,
};
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{channel::ChannelGrammar, message::Message, transport::GridTransport};
use crate::errors::{Result, RobinError};

/// Buffer of each per-type emitter
const EMITTER_CAPACITY: usize = 100;

type Emitters = Arc<DashMap<String, broadcast::Sender<Value>>>;

struct ActiveSubscription {
    id: Uuid,
    task: JoinHandle<()>,
}

/// A live link to one Grid entity, `/<endpoint>/<identifier>`.
///
/// After [`listen`](Self::listen), every message published under the entity
/// is re-emitted under its type. Receivers obtained from [`on`](Self::on)
/// get the original payload only.
///
/// Dropping a listening connection cancels its subscription in the
/// background when a tokio runtime is running. Call [`stop`](Self::stop) to
/// wait for the transport to confirm it.
pub struct Connection {
    endpoint: String,
    identifier: String,
    stub: String,
    transport: Arc<dyn GridTransport>,
    grammar: ChannelGrammar,
    emitters: Emitters,
    active: Mutex<Option<ActiveSubscription>>,
}

impl Connection {
    pub(crate) fn new(
        endpoint: &str,
        identifier: &str,
        transport: Arc<dyn GridTransport>,
        grammar: ChannelGrammar,
    ) -> Result<Self> {
        if endpoint.is_empty() {
            return Err(RobinError::BadRequest(
                "The supplied endpoint is invalid or malformed.".to_string(),
            ));
        }
        if identifier.is_empty() {
            return Err(RobinError::BadRequest(
                "The supplied identifier is invalid or malformed.".to_string(),
            ));
        }

        grammar.validate_segment(endpoint)?;
        grammar.validate_segment(identifier)?;
        let stub = format!("/{}/{}", endpoint, identifier);

        Ok(Self {
            endpoint: endpoint.to_string(),
            identifier: identifier.to_string(),
            stub,
            transport,
            grammar,
            emitters: Arc::new(DashMap::new()),
            active: Mutex::new(None),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// `/<endpoint>/<identifier>`
    pub fn stub(&self) -> &str {
        &self.stub
    }

    /// Subscribe to every message type of this entity.
    ///
    /// Listening again replaces the previous subscription.
    pub async fn listen(&self) -> Result<()> {
        let pattern = format!("{}/*", self.stub);
        self.grammar.validate_subscription(&pattern)?;

        let mut active = self.active.lock().await;
        if let Some(previous) = active.take() {
            previous.task.abort();
            self.transport.unsubscribe(previous.id).await?;
        }

        let mut subscription = self.transport.subscribe(&pattern).await?;
        let id = subscription.id;
        info!("Listening on {}", pattern);

        let emitters = self.emitters.clone();
        let task = tokio::spawn(async move {
            while let Some(message) = subscription.messages.recv().await {
                emit(&emitters, message);
            }
            debug!("Subscription to {} ended", subscription.pattern);
        });

        *active = Some(ActiveSubscription { id, task });
        Ok(())
    }

    /// Payloads of messages of type `kind`
    pub fn on(&self, kind: &str) -> broadcast::Receiver<Value> {
        self.emitters
            .entry(kind.to_string())
            .or_insert_with(|| broadcast::channel(EMITTER_CAPACITY).0)
            .subscribe()
    }

    /// [`on`](Self::on) as a stream. Payloads a slow consumer missed are
    /// skipped.
    pub fn stream(&self, kind: &str) -> impl Stream<Item = Value> + Send + 'static {
        BroadcastStream::new(self.on(kind)).filter_map(|item| future::ready(item.ok()))
    }

    /// Publish `payload` as a message of type `kind`
    pub async fn send(&self, kind: &str, payload: Value) -> Result<()> {
        self.grammar.validate_segment(kind)?;
        let channel = format!("{}/{}", self.stub, kind);
        self.transport.publish(&channel, payload).await
    }

    /// Cancel the active subscription
    pub async fn stop(&self) -> Result<()> {
        let previous = self
            .active
            .lock()
            .await
            .take()
            .ok_or(RobinError::NoConnection)?;
        previous.task.abort();
        self.transport.unsubscribe(previous.id).await?;
        info!("Stopped listening on {}", self.stub);
        Ok(())
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("stub", &self.stub)
            .field("grammar", &self.grammar)
            .field("emitters", &self.emitters.len())
            .finish_non_exhaustive()
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        let Some(active) = self.active.get_mut().take() else {
            return;
        };
        active.task.abort();

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            return;
        };
        let id = active.id;
        let transport = self.transport.clone();
        let stub = self.stub.clone();
        handle.spawn(async move {
            if let Err(e) = transport.unsubscribe(id).await {
                warn!("Failed to unsubscribe {} on drop: {}", stub, e);
            }
        });
    }
}

/// Re-emit an annotated message under its type
fn emit(emitters: &DashMap<String, broadcast::Sender<Value>>, message: Message) {
    if let Some(error) = message.error {
        warn!("Skipping message on {}: {}", message.channel, error);
        return;
    }

    let Some(Value::Object(mut envelope)) = message.data else {
        warn!("Skipping message on {} without annotated data", message.channel);
        return;
    };
    let kind = envelope
        .get("ext")
        .and_then(|ext| ext.get("type"))
        .and_then(Value::as_str)
        .map(str::to_string);
    let Some(kind) = kind else {
        warn!("Skipping message on {} without a type", message.channel);
        return;
    };
    let payload = envelope.remove("data").unwrap_or(Value::Null);

    if let Some(sender) = emitters.get(&kind) {
        let _ = sender.send(payload);
    }
}
