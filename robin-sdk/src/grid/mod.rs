//! Real-time messaging over the Robin Grid.
//!
//! A [`Grid`] owns one transport, authenticates every message it sends and
//! hands out [`Connection`]s to individual devices and channels.

pub mod channel;
pub mod connection;
pub mod extension;
pub mod message;
pub mod transport;

use std::{fmt, sync::Arc};

use parking_lot::Mutex;
use reqwest::Client;
use tokio::{
    sync::broadcast::{self, error::RecvError},
    task::JoinHandle,
};
use tracing::{error, info};

pub use channel::ChannelGrammar;
pub use connection::Connection;
pub use extension::{AuthExtension, Extension};
pub use message::Message;
pub use transport::{BayeuxTransport, GridTransport, MemoryTransport, Subscription, TransportEvent};

use crate::{
    credentials::Credentials,
    errors::{Result, RobinError},
};

const DEVICES: &str = "devices";
const CHANNELS: &str = "channels";

/// Construction options for a [`Grid`]
#[derive(Debug, Clone, Default)]
pub struct GridOptions {
    pub grammar: ChannelGrammar,
    /// HTTP client for the Bayeux transport; a default client when None
    pub http_client: Option<Client>,
}

impl GridOptions {
    pub fn with_grammar(mut self, grammar: ChannelGrammar) -> Self {
        self.grammar = grammar;
        self
    }

    pub fn with_http_client(mut self, http_client: Client) -> Self {
        self.http_client = Some(http_client);
        self
    }
}

pub struct Grid {
    url: Option<String>,
    transport: Arc<dyn GridTransport>,
    grammar: ChannelGrammar,
    monitor: Mutex<Option<JoinHandle<()>>>,
}

impl Grid {
    pub fn new(credentials: Arc<Credentials>, grid_url: &str) -> Result<Self> {
        Self::with_options(credentials, grid_url, GridOptions::default())
    }

    pub fn with_options(
        credentials: Arc<Credentials>,
        grid_url: &str,
        options: GridOptions,
    ) -> Result<Self> {
        if grid_url.is_empty() {
            return Err(RobinError::Configuration("A Grid url is required".to_string()));
        }
        let http_client = options.http_client.clone().unwrap_or_default();
        let transport = Arc::new(BayeuxTransport::new(grid_url, http_client)?);

        let mut grid = Self::with_transport(credentials, transport, options);
        grid.url = Some(grid_url.to_string());
        Ok(grid)
    }

    /// Build on an existing transport and register the authentication
    /// extension on it.
    ///
    /// Transport state changes are logged from a background task. It starts
    /// here when called inside a tokio runtime, otherwise on the first
    /// [`GridModule::connect`] made inside one.
    pub fn with_transport(
        credentials: Arc<Credentials>,
        transport: Arc<dyn GridTransport>,
        options: GridOptions,
    ) -> Self {
        transport.add_extension(Arc::new(AuthExtension::new(credentials)));

        let grid = Self {
            url: None,
            transport,
            grammar: options.grammar,
            monitor: Mutex::new(None),
        };
        grid.start_monitor();
        grid
    }

    /// Spawn the state logger once a runtime is available
    fn start_monitor(&self) {
        let mut monitor = self.monitor.lock();
        if monitor.is_some() {
            return;
        }
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            *monitor = Some(handle.spawn(log_transport_state(self.transport.events())));
        }
    }

    fn is_monitoring(&self) -> bool {
        self.monitor.lock().is_some()
    }

    /// The Grid URL, when built on the Bayeux transport
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn transport(&self) -> &Arc<dyn GridTransport> {
        &self.transport
    }

    pub fn grammar(&self) -> &ChannelGrammar {
        &self.grammar
    }

    /// Transport state changes
    pub fn events(&self) -> broadcast::Receiver<TransportEvent> {
        self.transport.events()
    }

    pub fn devices(&self) -> GridModule<'_> {
        GridModule {
            grid: self,
            endpoint: DEVICES,
        }
    }

    pub fn channels(&self) -> GridModule<'_> {
        GridModule {
            grid: self,
            endpoint: CHANNELS,
        }
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid")
            .field("url", &self.url)
            .field("grammar", &self.grammar)
            .field("monitoring", &self.is_monitoring())
            .finish_non_exhaustive()
    }
}

impl Drop for Grid {
    fn drop(&mut self) {
        if let Some(monitor) = self.monitor.get_mut().take() {
            monitor.abort();
        }
    }
}

/// Connection factory for one kind of Grid entity
#[derive(Debug, Clone, Copy)]
pub struct GridModule<'a> {
    grid: &'a Grid,
    endpoint: &'static str,
}

impl GridModule<'_> {
    pub fn endpoint(&self) -> &'static str {
        self.endpoint
    }

    /// A connection to the entity `identifier`. Nothing is subscribed until
    /// [`Connection::listen`] is called.
    pub fn connect(&self, identifier: &str) -> Result<Connection> {
        if identifier.is_empty() {
            return Err(RobinError::BadRequest(
                "The identifier of the entity to connect to must be supplied".to_string(),
            ));
        }
        self.grid.start_monitor();
        Connection::new(
            self.endpoint,
            identifier,
            self.grid.transport.clone(),
            self.grid.grammar.clone(),
        )
    }
}

async fn log_transport_state(mut events: broadcast::Receiver<TransportEvent>) {
    loop {
        match events.recv().await {
            Ok(TransportEvent::Down) => error!("Grid transport is down."),
            Ok(TransportEvent::Up) => info!("Grid transport is up"),
            Err(RecvError::Lagged(_)) => continue,
            Err(RecvError::Closed) => return,
        }
    }
}
