use serde_json::Value;

use super::{require, require_data, DEVICES, PRESENCE, SPACES};
use crate::{
    api::{path::construct_path, response::ApiResponse},
    errors::Result,
};

resource!(
    /// `/spaces`
    Spaces
);

impl<'a> Spaces<'a> {
    pub async fn get(&self, space: Option<&str>, params: Option<Value>) -> Result<ApiResponse> {
        let path = construct_path(&[SPACES, space.unwrap_or_default()]);
        self.api.core().get(&path, params).await
    }

    /// Update a space. Without an identifier the request targets `/spaces`.
    pub async fn update(&self, space: Option<&str>, data: Value) -> Result<ApiResponse> {
        require_data(&data, "Space data is required")?;
        let path = construct_path(&[SPACES, space.unwrap_or_default()]);
        self.api.core().patch(&path, Some(data)).await
    }

    pub async fn delete(&self, space: &str) -> Result<ApiResponse> {
        require(&[space], "A space identifier is required")?;
        let path = construct_path(&[SPACES, space]);
        self.api.core().delete(&path, None).await
    }

    pub fn devices(&self) -> SpaceDevices<'a> {
        SpaceDevices::new(self.api)
    }

    pub fn presence(&self) -> SpacePresence<'a> {
        SpacePresence::new(self.api)
    }
}

resource!(
    /// `/spaces/{space}/devices`
    SpaceDevices
);

impl SpaceDevices<'_> {
    pub async fn get(
        &self,
        space: &str,
        device: Option<&str>,
        params: Option<Value>,
    ) -> Result<ApiResponse> {
        require(&[space], "A space identifier is required.")?;
        let path = construct_path(&[SPACES, space, DEVICES, device.unwrap_or_default()]);
        self.api.core().get(&path, params).await
    }

    pub async fn create(&self, space: &str, data: Value) -> Result<ApiResponse> {
        let message = "A space identifier and device data are required";
        require(&[space], message)?;
        require_data(&data, message)?;
        let path = construct_path(&[SPACES, space, DEVICES]);
        self.api.core().post(&path, Some(data)).await
    }

    /// Move an existing device into a space
    pub async fn add(&self, space: &str, device: &str) -> Result<ApiResponse> {
        require(
            &[space, device],
            "A space identifier and device identifier are required",
        )?;
        let path = construct_path(&[SPACES, space, DEVICES, device]);
        self.api.core().put(&path, None).await
    }

    pub async fn delete(&self, space: &str, device: &str) -> Result<ApiResponse> {
        require(
            &[space, device],
            "A space identifier and device identifier are required",
        )?;
        let path = construct_path(&[SPACES, space, DEVICES, device]);
        self.api.core().delete(&path, None).await
    }
}

resource!(
    /// `/spaces/{space}/presence`
    SpacePresence
);

impl SpacePresence<'_> {
    pub async fn get(&self, space: &str, params: Option<Value>) -> Result<ApiResponse> {
        require(&[space], "A space identifier is required.")?;
        let path = construct_path(&[SPACES, space, PRESENCE]);
        self.api.core().get(&path, params).await
    }

    /// Check a user into a space
    pub async fn add(&self, space: &str, data: Value) -> Result<ApiResponse> {
        let message = "A space identifier and data object are required";
        require(&[space], message)?;
        require_data(&data, message)?;
        let path = construct_path(&[SPACES, space, PRESENCE]);
        self.api.core().post(&path, Some(data)).await
    }

    /// Check a user out of a space. The payload travels as the DELETE body.
    pub async fn delete(&self, space: &str, data: Value) -> Result<ApiResponse> {
        let message = "A space identifier and data object are required";
        require(&[space], message)?;
        require_data(&data, message)?;
        let path = construct_path(&[SPACES, space, PRESENCE]);
        self.api.core().delete(&path, Some(data)).await
    }
}
