use serde_json::Value;

use super::{require, require_data, DEVICES, DEVICE_MANIFESTS, FEEDS};
use crate::{
    api::{path::construct_path, response::ApiResponse},
    errors::Result,
};

resource!(
    /// `/device-manifests`
    DeviceManifests
);

impl<'a> DeviceManifests<'a> {
    pub async fn get(&self, identifier: Option<&str>, params: Option<Value>) -> Result<ApiResponse> {
        let path = construct_path(&[DEVICE_MANIFESTS, identifier.unwrap_or_default()]);
        self.api.core().get(&path, params).await
    }

    pub async fn create(&self, data: Value) -> Result<ApiResponse> {
        require_data(&data, "A data object is required")?;
        self.api
            .core()
            .post(&construct_path(&[DEVICE_MANIFESTS]), Some(data))
            .await
    }

    pub async fn update(&self, identifier: &str, data: Value) -> Result<ApiResponse> {
        let message = "A device manifest identifier and a data object are required.";
        require(&[identifier], message)?;
        require_data(&data, message)?;
        let path = construct_path(&[DEVICE_MANIFESTS, identifier]);
        self.api.core().patch(&path, Some(data)).await
    }

    pub async fn delete(&self, identifier: &str) -> Result<ApiResponse> {
        require(&[identifier], "A device manifest identifier is required.")?;
        let path = construct_path(&[DEVICE_MANIFESTS, identifier]);
        self.api.core().delete(&path, None).await
    }

    pub fn feeds(&self) -> ManifestFeeds<'a> {
        ManifestFeeds::new(self.api)
    }

    pub fn devices(&self) -> ManifestDevices<'a> {
        ManifestDevices::new(self.api)
    }
}

resource!(
    /// `/device-manifests/{manifest}/feeds`
    ManifestFeeds
);

impl ManifestFeeds<'_> {
    pub async fn get(
        &self,
        manifest: &str,
        feed: Option<&str>,
        params: Option<Value>,
    ) -> Result<ApiResponse> {
        require(&[manifest], "A device manifest identifier is required.")?;
        let path = construct_path(&[DEVICE_MANIFESTS, manifest, FEEDS, feed.unwrap_or_default()]);
        self.api.core().get(&path, params).await
    }

    pub async fn add(&self, manifest: &str, data: Value) -> Result<ApiResponse> {
        require(
            &[manifest],
            "A device manifest identifier and a data object are required.",
        )?;
        let path = construct_path(&[DEVICE_MANIFESTS, manifest, FEEDS]);
        self.api.core().post(&path, Some(data)).await
    }

    pub async fn update(&self, manifest: &str, feed: &str, data: Value) -> Result<ApiResponse> {
        let message =
            "A device manifest identifier, a feed identifier and a data object are required.";
        require(&[manifest, feed], message)?;
        require_data(&data, message)?;
        let path = construct_path(&[DEVICE_MANIFESTS, manifest, FEEDS, feed]);
        self.api.core().patch(&path, Some(data)).await
    }

    pub async fn delete(&self, manifest: &str, feed: &str) -> Result<ApiResponse> {
        require(
            &[manifest, feed],
            "A device manifest identifier and a feed identifier are required.",
        )?;
        let path = construct_path(&[DEVICE_MANIFESTS, manifest, FEEDS, feed]);
        self.api.core().delete(&path, None).await
    }
}

resource!(
    /// `/device-manifests/{manifest}/devices`
    ManifestDevices
);

impl ManifestDevices<'_> {
    /// Devices built from a manifest, or one of them
    pub async fn get(
        &self,
        manifest: &str,
        device: Option<&str>,
        params: Option<Value>,
    ) -> Result<ApiResponse> {
        require(&[manifest], "A device manifest identifier is required.")?;
        let path = construct_path(&[DEVICE_MANIFESTS, manifest, DEVICES, device.unwrap_or_default()]);
        self.api.core().get(&path, params).await
    }
}
