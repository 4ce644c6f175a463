use serde_json::Value;

use super::{require, require_data, CHANNELS, DEVICES, IDENTIFIERS, SPACES};
use crate::{
    api::{path::construct_path, response::ApiResponse},
    errors::Result,
};

resource!(
    /// `/devices`
    Devices
);

impl<'a> Devices<'a> {
    /// Get all devices, or one device
    pub async fn get(&self, identifier: Option<&str>, params: Option<Value>) -> Result<ApiResponse> {
        let path = construct_path(&[DEVICES, identifier.unwrap_or_default()]);
        self.api.core().get(&path, params).await
    }

    pub async fn create(&self, data: Value) -> Result<ApiResponse> {
        require_data(&data, "A data object is required")?;
        self.api.core().post(&construct_path(&[DEVICES]), Some(data)).await
    }

    pub async fn update(&self, identifier: &str, data: Value) -> Result<ApiResponse> {
        let message = "A device identifier and a data object are required.";
        require(&[identifier], message)?;
        require_data(&data, message)?;
        let path = construct_path(&[DEVICES, identifier]);
        self.api.core().patch(&path, Some(data)).await
    }

    pub async fn delete(&self, identifier: &str) -> Result<ApiResponse> {
        require(&[identifier], "A device identifier is required.")?;
        let path = construct_path(&[DEVICES, identifier]);
        self.api.core().delete(&path, None).await
    }

    pub fn identifiers(&self) -> DeviceIdentifiers<'a> {
        DeviceIdentifiers::new(self.api)
    }

    pub fn channels(&self) -> DeviceChannels<'a> {
        DeviceChannels::new(self.api)
    }

    pub fn spaces(&self) -> DeviceSpaces<'a> {
        DeviceSpaces::new(self.api)
    }
}

resource!(
    /// `/devices/{device}/identifiers`
    DeviceIdentifiers
);

impl DeviceIdentifiers<'_> {
    pub async fn get(
        &self,
        device: &str,
        identifier_urn: Option<&str>,
        params: Option<Value>,
    ) -> Result<ApiResponse> {
        require(&[device], "A device identifier is required.")?;
        let path = construct_path(&[DEVICES, device, IDENTIFIERS, identifier_urn.unwrap_or_default()]);
        self.api.core().get(&path, params).await
    }

    pub async fn create(&self, device: &str, data: Value) -> Result<ApiResponse> {
        require(&[device], "A device identifier and a data object are required.")?;
        let path = construct_path(&[DEVICES, device, IDENTIFIERS]);
        self.api.core().post(&path, Some(data)).await
    }

    /// Attach an existing identifier to a device
    pub async fn add(&self, device: &str, identifier_urn: &str, data: Value) -> Result<ApiResponse> {
        require(
            &[device],
            "A device identifier, an identifier id and a data object are required.",
        )?;
        let path = construct_path(&[DEVICES, device, IDENTIFIERS, identifier_urn]);
        self.api.core().patch(&path, Some(data)).await
    }

    pub async fn delete(&self, device: &str, identifier_urn: &str) -> Result<ApiResponse> {
        require(
            &[device, identifier_urn],
            "A device identifier and an identifier id are required.",
        )?;
        let path = construct_path(&[DEVICES, device, IDENTIFIERS, identifier_urn]);
        self.api.core().delete(&path, None).await
    }
}

resource!(
    /// `/devices/{device}/channels`
    DeviceChannels
);

impl DeviceChannels<'_> {
    pub async fn get(
        &self,
        device: &str,
        channel: Option<&str>,
        params: Option<Value>,
    ) -> Result<ApiResponse> {
        require(&[device], "A device identifier is required.")?;
        let path = construct_path(&[DEVICES, device, CHANNELS, channel.unwrap_or_default()]);
        self.api.core().get(&path, params).await
    }

    pub async fn create(&self, device: &str, data: Value) -> Result<ApiResponse> {
        require(&[device], "A device identifier and a data object are required.")?;
        let path = construct_path(&[DEVICES, device, CHANNELS]);
        self.api.core().post(&path, Some(data)).await
    }

    pub async fn update(&self, device: &str, channel: &str, data: Value) -> Result<ApiResponse> {
        let message = "A device identifier, a channel identifier and a data object are required.";
        require(&[device, channel], message)?;
        require_data(&data, message)?;
        let path = construct_path(&[DEVICES, device, CHANNELS, channel]);
        self.api.core().patch(&path, Some(data)).await
    }

    pub async fn delete(&self, device: &str, channel: &str) -> Result<ApiResponse> {
        require(
            &[device, channel],
            "A device identifier and a channel identifier are required.",
        )?;
        let path = construct_path(&[DEVICES, device, CHANNELS, channel]);
        self.api.core().delete(&path, None).await
    }
}

resource!(
    /// `/devices/{device}/spaces`
    DeviceSpaces
);

impl DeviceSpaces<'_> {
    pub async fn get(&self, device: &str, params: Option<Value>) -> Result<ApiResponse> {
        require(&[device], "A device identifier is required")?;
        let path = construct_path(&[DEVICES, device, SPACES]);
        self.api.core().get(&path, params).await
    }
}
