//! HTTP access to the Robin Core and Places APIs

pub mod modules;
pub mod path;
pub mod request;
pub mod response;

use std::{sync::Arc, time::Duration};

use reqwest::Client;
use serde_json::Value;
use tracing::info;
use url::Url;

pub use path::construct_path;
pub use request::RequestClient;
pub use response::{ApiResponse, Paging};

use crate::{
    credentials::Credentials,
    errors::{Result, RobinError},
};
use modules::{
    accounts::Accounts, apps::Apps, auth::Auth, channels::Channels,
    device_manifests::DeviceManifests, devices::Devices, events::Events,
    identifiers::Identifiers, locations::Locations, me::Me, organizations::Organizations,
    spaces::Spaces,
};

/// Entry point to the REST resources.
///
/// Holds one [`RequestClient`] per base URL. Both share the credentials and
/// the underlying `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct Api {
    core: RequestClient,
    places: RequestClient,
}

impl Api {
    pub fn new(credentials: Arc<Credentials>, core_url: &str, places_url: &str) -> Result<Self> {
        Self::with_http_client(credentials, core_url, places_url, Client::new())
    }

    /// Build with a request timeout applied to every call
    pub fn with_timeout(
        credentials: Arc<Credentials>,
        core_url: &str,
        places_url: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Self::with_http_client(credentials, core_url, places_url, http_client)
    }

    pub fn with_http_client(
        credentials: Arc<Credentials>,
        core_url: &str,
        places_url: &str,
        http_client: Client,
    ) -> Result<Self> {
        if credentials.access_token().is_none() {
            return Err(RobinError::Configuration(
                "An access token is required to use the Robin API".to_string(),
            ));
        }
        validate_base_url("core", core_url)?;
        validate_base_url("places", places_url)?;

        info!("Robin API ready (core: {}, places: {})", core_url, places_url);

        Ok(Self {
            core: RequestClient::new(core_url, http_client.clone(), credentials.clone()),
            places: RequestClient::new(places_url, http_client, credentials),
        })
    }

    pub fn core(&self) -> &RequestClient {
        &self.core
    }

    pub fn places(&self) -> &RequestClient {
        &self.places
    }

    pub async fn get(&self, path: &str, params: Option<Value>) -> Result<ApiResponse> {
        self.core.get(path, params).await
    }

    pub async fn head(&self, path: &str, params: Option<Value>) -> Result<ApiResponse> {
        self.core.head(path, params).await
    }

    pub async fn post(&self, path: &str, data: Option<Value>) -> Result<ApiResponse> {
        self.core.post(path, data).await
    }

    pub async fn put(&self, path: &str, data: Option<Value>) -> Result<ApiResponse> {
        self.core.put(path, data).await
    }

    pub async fn patch(&self, path: &str, data: Option<Value>) -> Result<ApiResponse> {
        self.core.patch(path, data).await
    }

    pub async fn delete(&self, path: &str, data: Option<Value>) -> Result<ApiResponse> {
        self.core.delete(path, data).await
    }

    pub async fn options(&self, path: &str, data: Option<Value>) -> Result<ApiResponse> {
        self.core.options(path, data).await
    }

    /// Every item of a Core listing; see [`RequestClient::all`]
    pub async fn all(&self, path: &str, params: Option<Value>) -> Result<Vec<Value>> {
        self.core.all(path, params).await
    }

    /// Every item starting from an already fetched page
    pub async fn collect_pages(&self, first: ApiResponse) -> Result<Vec<Value>> {
        RequestClient::collect_pages(first).await
    }

    pub fn accounts(&self) -> Accounts<'_> {
        Accounts::new(self)
    }

    pub fn apps(&self) -> Apps<'_> {
        Apps::new(self)
    }

    pub fn auth(&self) -> Auth<'_> {
        Auth::new(self)
    }

    pub fn channels(&self) -> Channels<'_> {
        Channels::new(self)
    }

    pub fn device_manifests(&self) -> DeviceManifests<'_> {
        DeviceManifests::new(self)
    }

    pub fn devices(&self) -> Devices<'_> {
        Devices::new(self)
    }

    pub fn events(&self) -> Events<'_> {
        Events::new(self)
    }

    pub fn identifiers(&self) -> Identifiers<'_> {
        Identifiers::new(self)
    }

    pub fn locations(&self) -> Locations<'_> {
        Locations::new(self)
    }

    pub fn me(&self) -> Me<'_> {
        Me::new(self)
    }

    pub fn organizations(&self) -> Organizations<'_> {
        Organizations::new(self)
    }

    pub fn spaces(&self) -> Spaces<'_> {
        Spaces::new(self)
    }
}

fn validate_base_url(service: &str, url: &str) -> Result<()> {
    if url.is_empty() {
        return Err(RobinError::Configuration(format!(
            "A {} base URL is required",
            service
        )));
    }
    Url::parse(url).map_err(|e| {
        RobinError::Configuration(format!("Invalid {} base URL {}: {}", service, url, e))
    })?;
    Ok(())
}
