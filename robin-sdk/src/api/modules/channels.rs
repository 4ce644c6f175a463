use serde_json::Value;

use super::{require, require_data, CHANNELS, DATA, TRIGGERS};
use crate::{
    api::{path::construct_path, response::ApiResponse},
    errors::Result,
};

resource!(
    /// `/channels`
    Channels
);

impl<'a> Channels<'a> {
    /// Get all channels, or one channel
    pub async fn get(&self, identifier: Option<&str>, params: Option<Value>) -> Result<ApiResponse> {
        let path = construct_path(&[CHANNELS, identifier.unwrap_or_default()]);
        self.api.core().get(&path, params).await
    }

    pub async fn create(&self, data: Value) -> Result<ApiResponse> {
        require_data(&data, "A data object is required.")?;
        self.api.core().post(&construct_path(&[CHANNELS]), Some(data)).await
    }

    pub async fn update(&self, identifier: &str, data: Value) -> Result<ApiResponse> {
        let message = "A channel identifier and a data object are required.";
        require(&[identifier], message)?;
        require_data(&data, message)?;
        let path = construct_path(&[CHANNELS, identifier]);
        self.api.core().patch(&path, Some(data)).await
    }

    pub async fn delete(&self, identifier: &str) -> Result<ApiResponse> {
        require(&[identifier], "A channel identifier is required.")?;
        let path = construct_path(&[CHANNELS, identifier]);
        self.api.core().delete(&path, None).await
    }

    /// Data points of a channel
    pub fn data(&self) -> ChannelData<'a> {
        ChannelData::new(self.api)
    }

    /// Triggers attached to a channel
    pub fn triggers(&self) -> ChannelTriggers<'a> {
        ChannelTriggers::new(self.api)
    }
}

resource!(
    /// `/channels/{channel}/data`
    ChannelData
);

impl ChannelData<'_> {
    /// Get all data of a channel, or one data point
    pub async fn get(
        &self,
        channel: &str,
        data_point: Option<&str>,
        params: Option<Value>,
    ) -> Result<ApiResponse> {
        require(&[channel], "A channel identifier is required.")?;
        let path = construct_path(&[CHANNELS, channel, DATA, data_point.unwrap_or_default()]);
        self.api.core().get(&path, params).await
    }

    pub async fn add(&self, channel: &str, data: Value) -> Result<ApiResponse> {
        require(&[channel], "A channel identifier is required.")?;
        let path = construct_path(&[CHANNELS, channel, DATA]);
        self.api.core().post(&path, Some(data)).await
    }

    pub async fn delete(&self, channel: &str, data_point: &str) -> Result<ApiResponse> {
        require(
            &[channel, data_point],
            "A channel identifier and a data point identifier are required.",
        )?;
        let path = construct_path(&[CHANNELS, channel, DATA, data_point]);
        self.api.core().delete(&path, None).await
    }
}

resource!(
    /// `/channels/{channel}/triggers`
    ChannelTriggers
);

impl ChannelTriggers<'_> {
    pub async fn get(
        &self,
        channel: &str,
        trigger: Option<&str>,
        params: Option<Value>,
    ) -> Result<ApiResponse> {
        require(&[channel], "A channel identifier is required.")?;
        let path = construct_path(&[CHANNELS, channel, TRIGGERS, trigger.unwrap_or_default()]);
        self.api.core().get(&path, params).await
    }

    pub async fn add(&self, channel: &str, data: Value) -> Result<ApiResponse> {
        require(&[channel], "A channel identifier and a data object are required.")?;
        let path = construct_path(&[CHANNELS, channel, TRIGGERS]);
        self.api.core().post(&path, Some(data)).await
    }

    pub async fn update(&self, channel: &str, trigger: &str, data: Value) -> Result<ApiResponse> {
        let message = "A channel identifier, a trigger identifier and a trigger object are required.";
        require(&[channel, trigger], message)?;
        require_data(&data, message)?;
        let path = construct_path(&[CHANNELS, channel, TRIGGERS, trigger]);
        self.api.core().patch(&path, Some(data)).await
    }

    pub async fn delete(&self, channel: &str, trigger: &str) -> Result<ApiResponse> {
        require(
            &[channel, trigger],
            "A channel identifier and a trigger identifier are required.",
        )?;
        let path = construct_path(&[CHANNELS, channel, TRIGGERS, trigger]);
        self.api.core().delete(&path, None).await
    }
}
